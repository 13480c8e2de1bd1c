use crate::{
    error::SubmissionError,
    progress::{ProgressEvent, ProgressSink, Stage},
    provider::ChainClient,
    types::{BatchIntent, GasPlan},
};
use alloy::primitives::{Address, U256, utils::format_ether};
use tracing::instrument;

/// Total an account must hold to submit `intent` under `plan`.
///
/// Saturates at [`U256::MAX`], which no balance can cover.
pub fn required_balance(intent: &BatchIntent, plan: &GasPlan) -> U256 {
    intent.aggregate_value().saturating_add(plan.max_cost())
}

/// Ensures `account` can pay for the batch value and the worst-case fee.
#[instrument(skip_all, fields(%account))]
pub async fn ensure_balance(
    client: &dyn ChainClient,
    account: Address,
    intent: &BatchIntent,
    plan: &GasPlan,
    progress: &dyn ProgressSink,
) -> Result<(), SubmissionError> {
    let required = required_balance(intent, plan);
    let available = client
        .balance(account)
        .await
        .map_err(|err| SubmissionError::from_client(err.into()))?;

    if available < required {
        return Err(SubmissionError::InsufficientBalance { required, available });
    }

    progress.emit(ProgressEvent::info(
        Stage::Balance,
        format!("balance {} ETH covers {} ETH", format_ether(available), format_ether(required)),
    ));
    Ok(())
}
