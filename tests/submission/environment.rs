//! Scripted chain client and confirmation gate.

use alloy::{
    consensus::TxEip7702,
    eips::eip7702::{Authorization, SignedAuthorization},
    primitives::{Address, ChainId, TxHash, U256, address, b256},
    rpc::{json_rpc::ErrorPayload, types::TransactionRequest},
    transports::{RpcError, TransportErrorKind, TransportResult},
};
use alloy_chains::Chain;
use batch_transfer::{
    config::{EstimationMode, GasConfig},
    confirmation::{Confirmation, ConfirmationGate, ConfirmationRequest},
    error::{ClientError, SubmissionError},
    progress::{ChannelProgress, ProgressEvent},
    provider::{ChainClient, ContractCallRequest, NonceTag},
    signers::DynSigner,
    transactions::{BatchSubmitter, GasEstimator, SubmissionReceipt},
    types::{GasPlan, Session, SignerProfile, TransferRequest},
};
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};
use tokio::sync::mpsc;

/// anvil's first dev account.
pub const ACCOUNT_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Delegation contract used by every test session.
pub const DELEGATE: Address = address!("0x979dd1ab4a7e3b3370b1daceec8b4198f97e0d6f");

/// Hash returned for accepted transactions.
pub const TX_HASH: TxHash =
    b256!("0x1111111111111111111111111111111111111111111111111111111111111111");

/// A call made against the [`MockClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorded {
    Balance,
    GasPrice,
    BlockGasLimit,
    TransactionCount(NonceTag),
    EstimateGas { to: Option<Address>, value: Option<U256>, authorizations: usize },
    SignAuthorization { nonce: u64 },
    ContractCall { nonce: u64, plan: GasPlan, value: U256, calls: usize },
    RawTransaction { nonce: u64, plan: GasPlan, value: U256, to: Address },
}

impl Recorded {
    /// Whether this records a dispatch attempt.
    pub fn is_dispatch(&self) -> bool {
        matches!(self, Self::ContractCall { .. } | Self::RawTransaction { .. })
    }

    /// Nonce and plan of a dispatch attempt.
    pub fn dispatch(&self) -> Option<(u64, GasPlan)> {
        match self {
            Self::ContractCall { nonce, plan, .. } | Self::RawTransaction { nonce, plan, .. } => {
                Some((*nonce, *plan))
            }
            _ => None,
        }
    }
}

/// A [`ChainClient`] answering from fixed values and recording every call.
#[derive(Debug)]
pub struct MockClient {
    pub signer: DynSigner,
    pub balance: U256,
    /// `None` fails the gas price query.
    pub gas_price: Option<u128>,
    pub block_gas_limit: u64,
    /// `None` fails the simulation.
    pub estimate: Option<u64>,
    pub latest_nonce: u64,
    pub pending_nonce: u64,
    /// Errors returned by consecutive dispatches, later dispatches succeed.
    pub dispatch_errors: Mutex<VecDeque<&'static str>>,
    pub recorded: Mutex<Vec<Recorded>>,
}

impl Default for MockClient {
    fn default() -> Self {
        Self {
            signer: DynSigner::from_signing_key(ACCOUNT_KEY).unwrap(),
            balance: U256::from(10).pow(U256::from(18)),
            gas_price: Some(10),
            block_gas_limit: 30_000_000,
            estimate: None,
            latest_nonce: 4,
            pending_nonce: 5,
            dispatch_errors: Default::default(),
            recorded: Default::default(),
        }
    }
}

impl MockClient {
    pub fn with_dispatch_errors(self, errors: impl IntoIterator<Item = &'static str>) -> Self {
        *self.dispatch_errors.lock().unwrap() = errors.into_iter().collect();
        self
    }

    pub fn recorded(&self) -> Vec<Recorded> {
        self.recorded.lock().unwrap().clone()
    }

    pub fn dispatches(&self) -> Vec<Recorded> {
        self.recorded().into_iter().filter(Recorded::is_dispatch).collect()
    }

    fn record(&self, call: Recorded) {
        self.recorded.lock().unwrap().push(call);
    }

    fn next_dispatch(&self) -> Result<TxHash, ClientError> {
        match self.dispatch_errors.lock().unwrap().pop_front() {
            Some(message) => Err(rpc_error(message).into()),
            None => Ok(TX_HASH),
        }
    }
}

/// A JSON-RPC error response with `message`.
pub fn rpc_error(message: &'static str) -> RpcError<TransportErrorKind> {
    RpcError::ErrorResp(ErrorPayload { code: -32000, message: message.into(), data: None })
}

#[async_trait::async_trait]
impl ChainClient for MockClient {
    fn account(&self) -> Address {
        self.signer.address()
    }

    fn chain_id(&self) -> ChainId {
        Chain::holesky().id()
    }

    async fn balance(&self, _account: Address) -> TransportResult<U256> {
        self.record(Recorded::Balance);
        Ok(self.balance)
    }

    async fn gas_price(&self) -> TransportResult<u128> {
        self.record(Recorded::GasPrice);
        self.gas_price.ok_or_else(|| rpc_error("gas price unavailable"))
    }

    async fn block_gas_limit(&self) -> TransportResult<u64> {
        self.record(Recorded::BlockGasLimit);
        Ok(self.block_gas_limit)
    }

    async fn transaction_count(&self, _account: Address, tag: NonceTag) -> TransportResult<u64> {
        self.record(Recorded::TransactionCount(tag));
        Ok(match tag {
            NonceTag::Latest => self.latest_nonce,
            NonceTag::Pending => self.pending_nonce,
        })
    }

    async fn estimate_gas(&self, request: TransactionRequest) -> TransportResult<u64> {
        self.record(Recorded::EstimateGas {
            to: request.to.and_then(|to| to.to().copied()),
            value: request.value,
            authorizations: request.authorization_list.as_ref().map_or(0, Vec::len),
        });
        self.estimate.ok_or_else(|| rpc_error("execution reverted"))
    }

    async fn sign_authorization(
        &self,
        authorization: Authorization,
    ) -> Result<SignedAuthorization, ClientError> {
        self.record(Recorded::SignAuthorization { nonce: authorization.nonce });
        Ok(self.signer.sign_authorization(authorization).await?)
    }

    async fn send_contract_call(
        &self,
        request: ContractCallRequest,
    ) -> Result<TxHash, ClientError> {
        assert_eq!(request.authorization.nonce, request.nonce + 1);
        self.record(Recorded::ContractCall {
            nonce: request.nonce,
            plan: request.plan,
            value: request.value,
            calls: request.calls.len(),
        });
        self.next_dispatch()
    }

    async fn send_raw_transaction(&self, tx: TxEip7702) -> Result<TxHash, ClientError> {
        assert_eq!(tx.authorization_list[0].nonce, tx.nonce + 1);
        self.record(Recorded::RawTransaction {
            nonce: tx.nonce,
            plan: GasPlan {
                gas_limit: tx.gas_limit,
                max_fee_per_gas: tx.max_fee_per_gas,
                max_priority_fee_per_gas: tx.max_priority_fee_per_gas,
            },
            value: tx.value,
            to: tx.to,
        });
        self.next_dispatch()
    }
}

/// A gate answering from a script, approving once the script runs out.
#[derive(Debug, Default)]
pub struct ScriptedGate {
    answers: Mutex<VecDeque<Confirmation>>,
    pub requests: Mutex<Vec<ConfirmationRequest>>,
}

impl ScriptedGate {
    pub fn new(answers: impl IntoIterator<Item = Confirmation>) -> Self {
        Self { answers: Mutex::new(answers.into_iter().collect()), requests: Default::default() }
    }

    pub fn titles(&self) -> Vec<String> {
        self.requests.lock().unwrap().iter().map(|req| req.title.clone()).collect()
    }
}

#[async_trait::async_trait]
impl ConfirmationGate for ScriptedGate {
    async fn request(&self, request: ConfirmationRequest) -> Confirmation {
        self.requests.lock().unwrap().push(request);
        self.answers.lock().unwrap().pop_front().unwrap_or(Confirmation::Approved)
    }
}

/// A submitter wired to a mock client, a scripted gate and a progress channel.
pub struct Harness {
    pub client: Arc<MockClient>,
    pub gate: Arc<ScriptedGate>,
    pub session: Session,
    submitter: BatchSubmitter,
    events: mpsc::UnboundedReceiver<ProgressEvent>,
}

impl Harness {
    pub fn new(
        client: MockClient,
        gate: ScriptedGate,
        profile: SignerProfile,
        gas: GasConfig,
    ) -> Self {
        let client = Arc::new(client);
        let gate = Arc::new(gate);
        let (progress, events) = ChannelProgress::new();

        let session = Session {
            account: client.account(),
            chain: Chain::holesky(),
            delegate: DELEGATE,
            capabilities: profile.capabilities(&gas),
            explorer: Some("https://holesky.etherscan.io/".parse().unwrap()),
        };
        let submitter = BatchSubmitter::new(
            client.clone(),
            gate.clone(),
            Arc::new(progress),
            GasEstimator::new(gas),
        );

        Self { client, gate, session, submitter, events }
    }

    /// A harness using the heuristic gas estimate and the standard profile.
    pub fn heuristic(client: MockClient) -> Self {
        Self::new(client, ScriptedGate::default(), SignerProfile::Standard, heuristic_gas())
    }

    pub async fn submit(
        &self,
        transfers: Vec<TransferRequest>,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        self.submitter.submit(&self.session, transfers).await
    }

    /// Drains the progress events emitted so far.
    pub fn events(&mut self) -> Vec<ProgressEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }
}

pub fn heuristic_gas() -> GasConfig {
    GasConfig { estimation: EstimationMode::Heuristic, ..Default::default() }
}

/// Transfers of the given amounts in wei to distinct recipients.
pub fn transfers(amounts: &[u64]) -> Vec<TransferRequest> {
    amounts
        .iter()
        .enumerate()
        .map(|(idx, amount)| {
            TransferRequest::new(Address::with_last_byte(idx as u8 + 1), U256::from(*amount))
        })
        .collect()
}
