use metrics::{Counter, Histogram};
use metrics_derive::Metrics;

/// Metrics for a [`BatchSubmitter`](crate::transactions::BatchSubmitter).
#[derive(Metrics)]
#[metrics(scope = "submissions")]
pub struct SubmissionMetrics {
    /// Number of dispatch attempts.
    pub submitted: Counter,
    /// Number of batches accepted by the node.
    pub succeeded: Counter,
    /// Number of submissions that failed terminally.
    pub failed: Counter,
    /// Number of dispatches retried with a refreshed nonce.
    pub nonce_retries: Counter,
    /// Number of dispatches retried with the alternate encoding.
    pub strategy_fallbacks: Counter,
    /// Number of gas limits clamped to the block gas limit.
    pub clamped_gas_limits: Counter,
    /// Number of calls per batch.
    pub batch_size: Histogram,
}
