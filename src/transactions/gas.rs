//! Gas planning for batch transactions.

use super::{FeeContext, SubmissionMetrics};
use crate::{
    config::{EstimationMode, GasConfig},
    error::GasError,
    progress::{ProgressEvent, ProgressSink, Stage},
    provider::ChainClient,
    types::{BatchIntent, GasPlan, Session},
};
use alloy::{
    eips::eip7702::SignedAuthorization,
    network::{TransactionBuilder, TransactionBuilder7702},
    rpc::types::TransactionRequest,
};
use tracing::{debug, instrument, warn};

/// Computes the [`GasPlan`] of a batch.
#[derive(Debug, Clone)]
pub struct GasEstimator {
    config: GasConfig,
}

impl GasEstimator {
    /// Creates a new estimator.
    pub fn new(config: GasConfig) -> Self {
        Self { config }
    }

    /// Heuristic gas limit, `(base_gas + per_call_gas * calls) * safety_multiplier`.
    pub fn heuristic_gas_limit(&self, calls: usize, safety_multiplier: u64) -> Result<u64, GasError> {
        u64::try_from(calls)
            .ok()
            .and_then(|n| self.config.per_call_gas.checked_mul(n))
            .and_then(|gas| gas.checked_add(self.config.base_gas))
            .and_then(|gas| gas.checked_mul(safety_multiplier))
            .ok_or(GasError::Overflow { calls })
    }

    /// Adds the simulation buffer to a simulated estimate.
    fn buffered(&self, estimate: u64) -> u64 {
        let buffered =
            u128::from(estimate) * (100 + u128::from(self.config.simulation_buffer_percent)) / 100;
        u64::try_from(buffered).unwrap_or(u64::MAX)
    }

    /// Plans gas for `intent`.
    ///
    /// Queries the gas price, the gas limit estimate if simulation is enabled, and the block gas
    /// limit, each exactly once.
    #[instrument(skip_all, fields(calls = intent.len()))]
    pub async fn plan(
        &self,
        client: &dyn ChainClient,
        session: &Session,
        intent: &BatchIntent,
        authorization: &SignedAuthorization,
        progress: &dyn ProgressSink,
        metrics: &SubmissionMetrics,
    ) -> Result<GasPlan, GasError> {
        let gas_price = client.gas_price().await.map_err(GasError::GasPrice)?;
        let fees = FeeContext {
            gas_price,
            priority_fee_percent: self.config.priority_fee_percent,
            max_fee_buffer_percent: self.config.max_fee_buffer_percent,
        }
        .fees_for_new_transaction();

        let gas_limit = match self.config.estimation {
            EstimationMode::Auto => {
                let request = TransactionRequest::default()
                    .with_from(session.account)
                    .with_to(session.account)
                    .with_input(intent.encoded_execute())
                    .with_value(intent.aggregate_value())
                    .with_authorization_list(vec![authorization.clone()]);

                match client.estimate_gas(request).await {
                    Ok(estimate) => {
                        debug!(estimate, "simulated gas estimate");
                        self.buffered(estimate)
                    }
                    Err(err) => {
                        warn!(%err, "gas simulation failed, using heuristic");
                        self.heuristic_gas_limit(
                            intent.len(),
                            session.capabilities.safety_multiplier,
                        )?
                    }
                }
            }
            EstimationMode::Heuristic => {
                self.heuristic_gas_limit(intent.len(), session.capabilities.safety_multiplier)?
            }
        };

        let block_gas_limit = client.block_gas_limit().await.map_err(GasError::BlockGasLimit)?;
        let gas_limit = if gas_limit > block_gas_limit {
            metrics.clamped_gas_limits.increment(1);
            progress.emit(ProgressEvent::warning(
                Stage::GasEstimation,
                format!(
                    "gas limit {gas_limit} exceeds the block gas limit, clamped to {block_gas_limit}"
                ),
            ));
            block_gas_limit
        } else {
            gas_limit
        };

        let plan = GasPlan::new(gas_limit, fees);
        progress.emit(ProgressEvent::info(
            Stage::GasEstimation,
            format!(
                "gas limit {}, max fee {} wei, priority fee {} wei",
                plan.gas_limit, plan.max_fee_per_gas, plan.max_priority_fee_per_gas
            ),
        ));

        Ok(plan)
    }
}
