//! Dispatch forms of a batch transaction.

use crate::{
    error::ClientError,
    provider::{ChainClient, ContractCallRequest},
    types::{BatchIntent, GasPlan, Session, SignerCapabilities},
};
use alloy::{consensus::TxEip7702, eips::eip7702::SignedAuthorization, primitives::TxHash};
use std::fmt;
use tracing::{debug, instrument};

/// How the batch transaction is handed to the signer.
///
/// Both forms produce the same EIP-7702 transaction to the account itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStrategy {
    /// The signer assembles the transaction from the `execute` call.
    ContractCall,
    /// The transaction is assembled with pre-encoded `execute` calldata and signed as is.
    RawDispatch,
}

impl DispatchStrategy {
    /// The form to try first with a signer.
    pub const fn preferred(capabilities: &SignerCapabilities) -> Self {
        if capabilities.contract_call_delegation { Self::ContractCall } else { Self::RawDispatch }
    }

    /// The other form.
    pub const fn alternate(self) -> Self {
        match self {
            Self::ContractCall => Self::RawDispatch,
            Self::RawDispatch => Self::ContractCall,
        }
    }
}

impl fmt::Display for DispatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContractCall => f.write_str("contract call"),
            Self::RawDispatch => f.write_str("raw dispatch"),
        }
    }
}

/// Everything needed to send one dispatch attempt.
#[derive(Debug, Clone, Copy)]
pub struct DispatchAttempt<'a> {
    /// Submission context.
    pub session: &'a Session,
    /// The batch.
    pub intent: &'a BatchIntent,
    /// Sender nonce.
    pub nonce: u64,
    /// Gas limit and fees.
    pub plan: &'a GasPlan,
    /// Authorization signed for `nonce + 1`.
    pub authorization: &'a SignedAuthorization,
}

impl DispatchAttempt<'_> {
    /// Builds the unsigned transaction of the raw dispatch form.
    pub fn raw_transaction(&self) -> TxEip7702 {
        TxEip7702 {
            chain_id: self.session.chain_id(),
            nonce: self.nonce,
            gas_limit: self.plan.gas_limit,
            max_fee_per_gas: self.plan.max_fee_per_gas,
            max_priority_fee_per_gas: self.plan.max_priority_fee_per_gas,
            to: self.session.account,
            value: self.intent.aggregate_value(),
            access_list: Default::default(),
            authorization_list: vec![self.authorization.clone()],
            input: self.intent.encoded_execute(),
        }
    }

    /// Builds the request of the contract call form.
    pub fn contract_call(&self) -> ContractCallRequest {
        ContractCallRequest {
            account: self.session.account,
            calls: self.intent.calls().to_vec(),
            value: self.intent.aggregate_value(),
            nonce: self.nonce,
            plan: *self.plan,
            authorization: self.authorization.clone(),
        }
    }

    /// Sends the attempt in the given form.
    #[instrument(skip_all, fields(%strategy, nonce = self.nonce))]
    pub async fn send(
        &self,
        client: &dyn ChainClient,
        strategy: DispatchStrategy,
    ) -> Result<TxHash, ClientError> {
        debug!(gas_limit = self.plan.gas_limit, "dispatching batch");
        match strategy {
            DispatchStrategy::ContractCall => {
                client.send_contract_call(self.contract_call()).await
            }
            DispatchStrategy::RawDispatch => {
                client.send_raw_transaction(self.raw_transaction()).await
            }
        }
    }
}
