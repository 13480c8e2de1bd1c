//! Batch submission error types.
use alloy::primitives::U256;
use thiserror::Error;

mod batch;
pub use batch::BatchError;

mod client;
pub use client::{ClientError, DispatchErrorExt};

mod gas;
pub use gas::GasError;

/// The overarching error type returned by a batch submission.
///
/// Every variant is terminal: recoverable dispatch failures are retried inside the submitter and
/// only surface here once their single retry has been spent.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// The transfer list was invalid.
    #[error(transparent)]
    Batch(#[from] BatchError),
    /// The user declined a confirmation or a signature request.
    #[error("user rejected {0}")]
    UserRejected(String),
    /// Neither simulated nor heuristic gas estimation produced a plan.
    #[error("gas estimation failed: {0}")]
    GasEstimation(#[from] GasError),
    /// The account can not cover the batch value plus the worst-case fee.
    #[error("insufficient balance: required {required} wei, available {available} wei")]
    InsufficientBalance {
        /// Batch value plus `gas_limit * max_fee_per_gas`.
        required: U256,
        /// Balance of the account.
        available: U256,
    },
    /// The node kept rejecting the nonce after it was refreshed.
    #[error("nonce conflict persisted after refreshing the nonce: {0}")]
    NonceConflict(#[source] ClientError),
    /// The signer rejected the delegated transaction in both dispatch forms.
    #[error("delegated transaction rejected in every dispatch form: {0}")]
    DispatchIncompatibility(#[source] ClientError),
    /// The account nonce leaves no room for the authorization nonce after it.
    #[error("account nonce {0} is exhausted")]
    NonceExhausted(u64),
    /// Any other failure, with the original message preserved.
    #[error("submission failed: {0}")]
    Unknown(#[source] ClientError),
}

impl SubmissionError {
    /// Returns the missing amount for [`SubmissionError::InsufficientBalance`].
    pub fn shortfall(&self) -> Option<U256> {
        match self {
            Self::InsufficientBalance { required, available } => {
                Some(required.saturating_sub(*available))
            }
            _ => None,
        }
    }

    /// Maps a client failure outside of dispatch to a terminal error.
    pub(crate) fn from_client(err: ClientError) -> Self {
        if err.is_user_rejection() { Self::UserRejected(err.to_string()) } else { Self::Unknown(err) }
    }
}
