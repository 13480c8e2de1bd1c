//! Bounded retry of a single batch submission.
//!
//! ```text
//! Planning -> Dispatching -> Success
//!                 |  ^
//!                 |  +-- RetryingNonce     (once, after a nonce conflict)
//!                 |  +-- RetryingStrategy  (once, after a delegation incompatibility)
//!                 +----> Failed
//! ```

use super::DispatchStrategy;
use crate::error::{ClientError, DispatchErrorExt, SubmissionError};
use alloy::primitives::TxHash;

/// Class of a dispatch failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The user declined the signature request.
    UserRejected,
    /// The nonce was stale or taken.
    NonceConflict,
    /// The signer or node mishandled the delegated transaction.
    DelegationIncompatibility,
    /// Anything else.
    Other,
}

impl FailureKind {
    /// Classifies a dispatch failure.
    ///
    /// A rejection by the user is never retried, even when its message names the authorization.
    /// Nonce conflicts take precedence over delegation failures.
    pub fn classify(err: &ClientError) -> Self {
        if err.is_user_rejection() {
            Self::UserRejected
        } else if err.is_nonce_conflict() {
            Self::NonceConflict
        } else if err.is_delegation_incompatibility() {
            Self::DelegationIncompatibility
        } else {
            Self::Other
        }
    }
}

/// State of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    /// Gas and balance are being planned.
    Planning,
    /// A dispatch attempt is in flight.
    Dispatching(DispatchStrategy),
    /// The nonce is being refreshed before re-dispatching.
    RetryingNonce(DispatchStrategy),
    /// The alternate form is about to be dispatched.
    RetryingStrategy(DispatchStrategy),
    /// The node accepted the transaction.
    Success(TxHash),
    /// The submission failed terminally.
    Failed,
}

/// What the submitter does after a failed dispatch.
#[derive(Debug)]
pub enum RetryAction {
    /// Fetch the pending nonce and dispatch again with the same form.
    RefreshNonce,
    /// Dispatch again with the given form, same nonce and plan.
    SwitchStrategy(DispatchStrategy),
    /// Give up.
    Fail(SubmissionError),
}

/// Drives the retry state machine of one submission.
///
/// Each recoverable class is retried at most once, so a submission makes at most three dispatch
/// attempts.
#[derive(Debug)]
pub struct RetryController {
    state: SubmissionState,
    strategy: DispatchStrategy,
    nonce_retried: bool,
    strategy_switched: bool,
}

impl RetryController {
    /// Creates a controller in [`SubmissionState::Planning`].
    pub fn new(strategy: DispatchStrategy) -> Self {
        Self {
            state: SubmissionState::Planning,
            strategy,
            nonce_retried: false,
            strategy_switched: false,
        }
    }

    /// Current state.
    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// Form of the next or current dispatch.
    pub fn strategy(&self) -> DispatchStrategy {
        self.strategy
    }

    /// Enters [`SubmissionState::Dispatching`] and returns the form to dispatch with.
    pub fn dispatch(&mut self) -> DispatchStrategy {
        debug_assert!(!matches!(self.state, SubmissionState::Success(_) | SubmissionState::Failed));
        self.state = SubmissionState::Dispatching(self.strategy);
        self.strategy
    }

    /// Records an accepted transaction.
    pub fn succeed(&mut self, tx_hash: TxHash) {
        self.state = SubmissionState::Success(tx_hash);
    }

    /// Records a failure outside of dispatch, e.g. while refreshing the nonce.
    pub fn fail(&mut self) {
        self.state = SubmissionState::Failed;
    }

    /// Records a failed dispatch and decides how to proceed.
    pub fn on_failure(&mut self, err: ClientError) -> RetryAction {
        match FailureKind::classify(&err) {
            FailureKind::UserRejected => {
                self.state = SubmissionState::Failed;
                RetryAction::Fail(SubmissionError::UserRejected(err.to_string()))
            }
            FailureKind::NonceConflict if !self.nonce_retried => {
                self.nonce_retried = true;
                self.state = SubmissionState::RetryingNonce(self.strategy);
                RetryAction::RefreshNonce
            }
            FailureKind::NonceConflict => {
                self.state = SubmissionState::Failed;
                RetryAction::Fail(SubmissionError::NonceConflict(err))
            }
            FailureKind::DelegationIncompatibility if !self.strategy_switched => {
                self.strategy_switched = true;
                self.strategy = self.strategy.alternate();
                self.state = SubmissionState::RetryingStrategy(self.strategy);
                RetryAction::SwitchStrategy(self.strategy)
            }
            FailureKind::DelegationIncompatibility => {
                self.state = SubmissionState::Failed;
                RetryAction::Fail(SubmissionError::DispatchIncompatibility(err))
            }
            FailureKind::Other => {
                self.state = SubmissionState::Failed;
                RetryAction::Fail(SubmissionError::from_client(err))
            }
        }
    }
}
