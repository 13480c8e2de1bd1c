//! Submission progress notifications.
//!
//! A submission reports every lifecycle step to a [`ProgressSink`]. Events are informational:
//! they are emitted in order, never read back, and a sink can not fail the pipeline.

use serde::Serialize;
use std::fmt;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Lifecycle stage of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// The batch is being built.
    Preparing,
    /// The delegation authorization is being confirmed and signed.
    Authorization,
    /// The gas plan is being computed.
    GasEstimation,
    /// The account balance is being checked.
    Balance,
    /// The transaction is being confirmed and dispatched.
    Transaction,
    /// The transaction is re-dispatched with a refreshed nonce.
    TransactionRetry,
    /// The transaction is re-dispatched with the alternate encoding.
    Fallback,
    /// The transaction was accepted by the node.
    TransactionComplete,
    /// The submission failed.
    Error,
}

impl Stage {
    /// Returns the stage tag.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Preparing => "preparing",
            Self::Authorization => "authorization",
            Self::GasEstimation => "gas_estimation",
            Self::Balance => "balance",
            Self::Transaction => "transaction",
            Self::TransactionRetry => "transaction_retry",
            Self::Fallback => "fallback",
            Self::TransactionComplete => "transaction_complete",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a [`ProgressEvent`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Regular progress.
    #[default]
    Info,
    /// Something was adjusted, e.g. a clamped gas limit.
    Warning,
    /// The submission failed.
    Error,
}

/// A single progress notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressEvent {
    /// Lifecycle stage.
    pub stage: Stage,
    /// Severity.
    pub severity: Severity,
    /// Human readable message.
    pub message: String,
}

impl ProgressEvent {
    /// Creates an info event.
    pub fn info(stage: Stage, message: impl Into<String>) -> Self {
        Self { stage, severity: Severity::Info, message: message.into() }
    }

    /// Creates a warning event.
    pub fn warning(stage: Stage, message: impl Into<String>) -> Self {
        Self { stage, severity: Severity::Warning, message: message.into() }
    }

    /// Creates an error event.
    pub fn error(message: impl Into<String>) -> Self {
        Self { stage: Stage::Error, severity: Severity::Error, message: message.into() }
    }
}

/// Receives progress notifications.
pub trait ProgressSink: fmt::Debug + Send + Sync {
    /// Emits an event. Must not block.
    fn emit(&self, event: ProgressEvent);
}

/// Logs every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn emit(&self, event: ProgressEvent) {
        let ProgressEvent { stage, severity, message } = event;
        match severity {
            Severity::Info => info!(%stage, "{message}"),
            Severity::Warning => warn!(%stage, "{message}"),
            Severity::Error => error!(%stage, "{message}"),
        }
    }
}

/// Forwards events to an unbounded channel.
///
/// Events are dropped silently once the receiver is gone.
#[derive(Debug, Clone)]
pub struct ChannelProgress(mpsc::UnboundedSender<ProgressEvent>);

impl ChannelProgress {
    /// Creates a sink and the receiving half of its channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self(tx), rx)
    }
}

impl ProgressSink for ChannelProgress {
    fn emit(&self, event: ProgressEvent) {
        let _ = self.0.send(event);
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn emit(&self, _event: ProgressEvent) {}
}
