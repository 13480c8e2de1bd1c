//! Chain client errors and their classification.

use alloy::transports::{RpcError, TransportErrorKind};
use thiserror::Error;

/// Messages reporting that the transaction nonce is stale or taken.
///
/// "already known" is not listed: it means this exact transaction is already pooled and sending
/// it again under a fresh nonce would execute the batch twice.
const NONCE_CONFLICT_PATTERNS: &[&str] = &[
    "nonce too low",
    "nonce too high",
    "invalid nonce",
    "nonce has already been used",
    "replacement transaction underpriced",
];

/// Messages reporting that the signer or node mishandled the delegated transaction.
const DELEGATION_PATTERNS: &[&str] =
    &["delegation", "delegated", "authorization", "execution reverted", "reverted"];

/// Messages reporting that the user declined to sign.
const USER_REJECTION_PATTERNS: &[&str] =
    &["user rejected", "user denied", "rejected by user", "user cancelled"];

/// Errors returned by a [`ChainClient`](crate::provider::ChainClient).
#[derive(Debug, Error)]
pub enum ClientError {
    /// RPC error.
    #[error(transparent)]
    Rpc(#[from] RpcError<TransportErrorKind>),
    /// Error occurred while signing.
    #[error(transparent)]
    Sign(#[from] alloy::signers::Error),
}

impl ClientError {
    /// Lowercased error message used for classification.
    ///
    /// JSON-RPC error responses are matched on their message only so that error data can not
    /// trigger a pattern.
    fn message(&self) -> String {
        match self {
            Self::Rpc(err) => match err.as_error_resp() {
                Some(payload) => payload.message.to_lowercase(),
                None => err.to_string().to_lowercase(),
            },
            Self::Sign(err) => err.to_string().to_lowercase(),
        }
    }

    fn matches(&self, patterns: &[&str]) -> bool {
        let message = self.message();
        patterns.iter().any(|pattern| message.contains(pattern))
    }
}

/// Extension trait classifying dispatch failures.
pub trait DispatchErrorExt {
    /// Returns true if the node rejected the transaction nonce.
    fn is_nonce_conflict(&self) -> bool;

    /// Returns true if the failure points at the signer's handling of the delegated transaction,
    /// in which case the alternate dispatch form may succeed.
    fn is_delegation_incompatibility(&self) -> bool;

    /// Returns true if the user declined to sign.
    fn is_user_rejection(&self) -> bool;
}

impl DispatchErrorExt for ClientError {
    fn is_nonce_conflict(&self) -> bool {
        self.matches(NONCE_CONFLICT_PATTERNS)
    }

    fn is_delegation_incompatibility(&self) -> bool {
        self.matches(DELEGATION_PATTERNS)
    }

    fn is_user_rejection(&self) -> bool {
        self.matches(USER_REJECTION_PATTERNS)
    }
}
