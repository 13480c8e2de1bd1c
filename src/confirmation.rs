//! Confirmation gates.
//!
//! A submission asks for approval twice: before the delegation authorization is signed and
//! before the transaction is dispatched. The request carries the exact data about to be signed.

use serde::Serialize;
use std::io::{self, BufRead, Write};
use tracing::warn;

/// Data presented for approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmationRequest {
    /// Short title.
    pub title: String,
    /// Human readable summary.
    pub message: String,
    /// Structured payload about to be signed.
    pub payload: serde_json::Value,
}

/// Outcome of a [`ConfirmationRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// Continue with the submission.
    Approved,
    /// Abort the submission.
    Rejected,
}

impl Confirmation {
    /// Whether the request was approved.
    pub const fn is_approved(&self) -> bool {
        matches!(self, Self::Approved)
    }
}

/// Suspends the submission until the request is approved or rejected.
#[async_trait::async_trait]
pub trait ConfirmationGate: std::fmt::Debug + Send + Sync {
    /// Requests approval.
    async fn request(&self, request: ConfirmationRequest) -> Confirmation;
}

/// Approves every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoApprove;

#[async_trait::async_trait]
impl ConfirmationGate for AutoApprove {
    async fn request(&self, _request: ConfirmationRequest) -> Confirmation {
        Confirmation::Approved
    }
}

/// Prompts on the terminal, printing the payload to stderr and reading `y/N` from stdin.
///
/// Anything but an explicit yes, including a closed stdin, is a rejection.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompt;

impl TerminalPrompt {
    fn prompt(request: &ConfirmationRequest) -> io::Result<Confirmation> {
        let mut stderr = io::stderr().lock();
        writeln!(stderr, "\n{}\n{}", request.title, request.message)?;
        writeln!(
            stderr,
            "{}",
            serde_json::to_string_pretty(&request.payload).map_err(io::Error::other)?
        )?;
        write!(stderr, "Approve? [y/N] ")?;
        stderr.flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(parse_answer(&answer))
    }
}

#[async_trait::async_trait]
impl ConfirmationGate for TerminalPrompt {
    async fn request(&self, request: ConfirmationRequest) -> Confirmation {
        match tokio::task::spawn_blocking(move || Self::prompt(&request)).await {
            Ok(Ok(confirmation)) => confirmation,
            Ok(Err(err)) => {
                warn!(%err, "could not read confirmation");
                Confirmation::Rejected
            }
            Err(err) => {
                warn!(%err, "confirmation prompt failed");
                Confirmation::Rejected
            }
        }
    }
}

fn parse_answer(answer: &str) -> Confirmation {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Confirmation::Approved,
        _ => Confirmation::Rejected,
    }
}
