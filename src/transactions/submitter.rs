use super::{
    DispatchAttempt, DispatchStrategy, GasEstimator, RetryAction, RetryController,
    SubmissionMetrics, confirm_authorization, ensure_balance, sign_authorization,
};
use crate::{
    confirmation::{ConfirmationGate, ConfirmationRequest},
    error::SubmissionError,
    progress::{ProgressEvent, ProgressSink, Stage},
    provider::{ChainClient, NonceTag},
    types::{BatchIntent, GasPlan, Session, TransferRequest},
};
use alloy::{
    eips::eip7702::SignedAuthorization,
    primitives::{TxHash, utils::format_ether},
};
use serde_json::json;
use std::sync::Arc;
use tracing::{instrument, warn};
use url::Url;

/// A batch accepted by the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    /// Hash of the batch transaction.
    pub tx_hash: TxHash,
    /// Nonce the transaction was sent with.
    pub nonce: u64,
    /// Form the transaction was sent in.
    pub strategy: DispatchStrategy,
    /// Gas limit and fees of the transaction.
    pub plan: GasPlan,
    /// Explorer link, if the chain has an explorer.
    pub explorer_url: Option<Url>,
}

/// Submits batches of native transfers as a single delegated transaction.
///
/// Every step runs sequentially: the authorization is confirmed and signed, gas is planned, the
/// balance is checked, the transaction is confirmed and finally dispatched, retrying at most
/// once per recoverable failure class.
#[derive(Debug, Clone)]
pub struct BatchSubmitter {
    client: Arc<dyn ChainClient>,
    gate: Arc<dyn ConfirmationGate>,
    progress: Arc<dyn ProgressSink>,
    estimator: GasEstimator,
    metrics: Arc<SubmissionMetrics>,
}

impl BatchSubmitter {
    /// Creates a new submitter.
    pub fn new(
        client: Arc<dyn ChainClient>,
        gate: Arc<dyn ConfirmationGate>,
        progress: Arc<dyn ProgressSink>,
        estimator: GasEstimator,
    ) -> Self {
        Self { client, gate, progress, estimator, metrics: Default::default() }
    }

    /// Submits `transfers` from the session account.
    ///
    /// Terminal failures are also reported to the progress sink.
    #[instrument(skip_all, fields(account = %session.account, chain = %session.chain))]
    pub async fn submit(
        &self,
        session: &Session,
        transfers: Vec<TransferRequest>,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        match self.submit_inner(session, transfers).await {
            Ok(receipt) => {
                self.metrics.succeeded.increment(1);
                Ok(receipt)
            }
            Err(err) => {
                self.metrics.failed.increment(1);
                self.progress.emit(ProgressEvent::error(err.to_string()));
                Err(err)
            }
        }
    }

    async fn submit_inner(
        &self,
        session: &Session,
        transfers: Vec<TransferRequest>,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let client = self.client.as_ref();
        let progress = self.progress.as_ref();

        let intent = BatchIntent::new(transfers)?;
        self.metrics.batch_size.record(intent.len() as f64);
        progress.emit(ProgressEvent::info(
            Stage::Preparing,
            format!(
                "batching {} transfers, total {} ETH",
                intent.len(),
                format_ether(intent.aggregate_value())
            ),
        ));

        confirm_authorization(self.gate.as_ref(), session, progress).await?;

        let mut nonce = client
            .transaction_count(session.account, NonceTag::Latest)
            .await
            .map_err(|err| SubmissionError::from_client(err.into()))?;
        let mut authorization = sign_authorization(client, session, nonce).await?;
        progress.emit(ProgressEvent::info(Stage::Authorization, "authorization signed"));

        let plan = self
            .estimator
            .plan(client, session, &intent, &authorization, progress, &self.metrics)
            .await?;

        ensure_balance(client, session.account, &intent, &plan, progress).await?;

        self.confirm_transaction(session, &intent, nonce, &authorization, &plan).await?;

        let mut controller =
            RetryController::new(DispatchStrategy::preferred(&session.capabilities));
        loop {
            let strategy = controller.dispatch();
            self.metrics.submitted.increment(1);
            progress.emit(ProgressEvent::info(
                Stage::Transaction,
                format!("sending batch as {strategy} with nonce {nonce}"),
            ));

            let attempt = DispatchAttempt {
                session,
                intent: &intent,
                nonce,
                plan: &plan,
                authorization: &authorization,
            };
            let err = match attempt.send(client, strategy).await {
                Ok(tx_hash) => {
                    controller.succeed(tx_hash);
                    progress.emit(ProgressEvent::info(
                        Stage::TransactionComplete,
                        format!("batch transaction sent: {tx_hash}"),
                    ));
                    return Ok(SubmissionReceipt {
                        tx_hash,
                        nonce,
                        strategy,
                        plan,
                        explorer_url: session.explorer_tx_url(tx_hash),
                    });
                }
                Err(err) => err,
            };

            warn!(%err, %strategy, nonce, "dispatch failed");
            match controller.on_failure(err) {
                RetryAction::RefreshNonce => {
                    self.metrics.nonce_retries.increment(1);
                    let (pending, signed) = match self.refresh_nonce(session).await {
                        Ok(refreshed) => refreshed,
                        Err(err) => {
                            controller.fail();
                            return Err(err);
                        }
                    };
                    progress.emit(ProgressEvent::info(
                        Stage::TransactionRetry,
                        format!("nonce {nonce} was rejected, retrying with nonce {pending}"),
                    ));
                    nonce = pending;
                    authorization = signed;
                }
                RetryAction::SwitchStrategy(next) => {
                    self.metrics.strategy_fallbacks.increment(1);
                    progress.emit(ProgressEvent::warning(
                        Stage::Fallback,
                        format!("{strategy} was rejected, retrying as {next}"),
                    ));
                }
                RetryAction::Fail(err) => return Err(err),
            }
        }
    }

    /// Fetches the pending nonce and signs a fresh authorization for it.
    ///
    /// The delegate, chain and account are unchanged, so the authorization is not confirmed
    /// again.
    async fn refresh_nonce(
        &self,
        session: &Session,
    ) -> Result<(u64, SignedAuthorization), SubmissionError> {
        let client = self.client.as_ref();
        let nonce = client
            .transaction_count(session.account, NonceTag::Pending)
            .await
            .map_err(|err| SubmissionError::from_client(err.into()))?;
        let authorization = sign_authorization(client, session, nonce).await?;
        Ok((nonce, authorization))
    }

    /// Asks the gate to approve the final transaction.
    async fn confirm_transaction(
        &self,
        session: &Session,
        intent: &BatchIntent,
        nonce: u64,
        authorization: &SignedAuthorization,
        plan: &GasPlan,
    ) -> Result<(), SubmissionError> {
        let calls: Vec<_> = intent
            .calls()
            .iter()
            .map(|call| json!({ "to": call.to, "value": call.value, "data": call.data }))
            .collect();

        let request = ConfirmationRequest {
            title: "Send batch transaction".to_string(),
            message: format!(
                "Send {} transfers totalling {} ETH, paying at most {} ETH in fees",
                intent.len(),
                format_ether(intent.aggregate_value()),
                format_ether(plan.max_cost())
            ),
            payload: json!({
                "from": session.account,
                "to": session.account,
                "chainId": session.chain_id(),
                "value": intent.aggregate_value(),
                "nonce": nonce,
                "gasLimit": plan.gas_limit,
                "maxFeePerGas": plan.max_fee_per_gas.to_string(),
                "maxPriorityFeePerGas": plan.max_priority_fee_per_gas.to_string(),
                "authorization": {
                    "delegate": session.delegate,
                    "chainId": session.chain_id(),
                    "nonce": authorization.nonce(),
                },
                "calls": calls,
            }),
        };

        if !self.gate.request(request).await.is_approved() {
            return Err(SubmissionError::UserRejected("the batch transaction".to_string()));
        }
        Ok(())
    }
}
