//! Batch submission pipeline.

mod auth;
pub use auth::{authorization_for, confirm_authorization, sign_authorization};
mod balance;
pub use balance::{ensure_balance, required_balance};
mod dispatch;
pub use dispatch::{DispatchAttempt, DispatchStrategy};
mod fees;
pub use fees::FeeContext;
mod gas;
pub use gas::GasEstimator;
mod metrics;
pub use self::metrics::SubmissionMetrics;
mod retry;
pub use retry::{FailureKind, RetryAction, RetryController, SubmissionState};
mod submitter;
pub use submitter::{BatchSubmitter, SubmissionReceipt};
