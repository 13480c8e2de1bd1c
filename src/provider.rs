//! Chain access used by the submission pipeline.

use crate::{
    error::ClientError,
    signers::DynSigner,
    types::{BatchCallDelegation, Call, GasPlan},
};
use alloy::{
    consensus::TxEip7702,
    eips::{
        BlockId,
        eip2718::Encodable2718,
        eip7702::{Authorization, SignedAuthorization},
    },
    network::{Ethereum, EthereumWallet, NetworkWallet, TransactionBuilder7702},
    primitives::{Address, ChainId, TxHash, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    transports::{RpcError, TransportResult},
};
use std::fmt;
use tracing::{debug, instrument};
use url::Url;

/// Which transaction count to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonceTag {
    /// Count of mined transactions.
    Latest,
    /// Count including transactions waiting in the pool.
    Pending,
}

/// A transaction submitted in contract call form.
///
/// The client assembles, signs and encodes the transaction itself.
#[derive(Debug, Clone)]
pub struct ContractCallRequest {
    /// The delegating account, sender and call target.
    pub account: Address,
    /// Calls passed to `execute`.
    pub calls: Vec<Call>,
    /// Native value attached to the transaction.
    pub value: U256,
    /// Sender nonce.
    pub nonce: u64,
    /// Gas limit and fees.
    pub plan: GasPlan,
    /// Authorization delegating `account`.
    pub authorization: SignedAuthorization,
}

/// A connected account on a single chain.
///
/// Every method is a suspension point of the submission pipeline.
#[async_trait::async_trait]
pub trait ChainClient: fmt::Debug + Send + Sync {
    /// The connected account.
    fn account(&self) -> Address;

    /// Chain id of the connected chain.
    fn chain_id(&self) -> ChainId;

    /// Native balance of `account`.
    async fn balance(&self, account: Address) -> TransportResult<U256>;

    /// Current gas price.
    async fn gas_price(&self) -> TransportResult<u128>;

    /// Gas limit of the latest block.
    async fn block_gas_limit(&self) -> TransportResult<u64>;

    /// Transaction count of `account`.
    async fn transaction_count(&self, account: Address, tag: NonceTag) -> TransportResult<u64>;

    /// Simulates `request` and returns the gas it used.
    async fn estimate_gas(&self, request: TransactionRequest) -> TransportResult<u64>;

    /// Signs an authorization with the account key.
    async fn sign_authorization(
        &self,
        authorization: Authorization,
    ) -> Result<SignedAuthorization, ClientError>;

    /// Sends a transaction in contract call form.
    async fn send_contract_call(&self, request: ContractCallRequest)
    -> Result<TxHash, ClientError>;

    /// Signs and sends a pre-encoded transaction.
    async fn send_raw_transaction(&self, tx: TxEip7702) -> Result<TxHash, ClientError>;
}

/// [`ChainClient`] over a JSON-RPC endpoint with a local wallet.
#[derive(Clone)]
pub struct RpcChainClient {
    provider: DynProvider,
    wallet: EthereumWallet,
    signer: DynSigner,
    chain_id: ChainId,
}

impl fmt::Debug for RpcChainClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcChainClient")
            .field("account", &self.signer.address())
            .field("chain_id", &self.chain_id)
            .finish()
    }
}

impl RpcChainClient {
    /// Connects to `endpoint` and reads its chain id.
    pub async fn connect(endpoint: Url, signer: DynSigner) -> TransportResult<Self> {
        let wallet = EthereumWallet::new(signer.0.clone());
        let provider =
            ProviderBuilder::new().wallet(wallet.clone()).connect_http(endpoint).erased();
        let chain_id = provider.get_chain_id().await?;
        debug!(chain_id, account = %signer.address(), "connected");

        Ok(Self { provider, wallet, signer, chain_id })
    }
}

#[async_trait::async_trait]
impl ChainClient for RpcChainClient {
    fn account(&self) -> Address {
        self.signer.address()
    }

    fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    async fn balance(&self, account: Address) -> TransportResult<U256> {
        self.provider.get_balance(account).await
    }

    async fn gas_price(&self) -> TransportResult<u128> {
        self.provider.get_gas_price().await
    }

    async fn block_gas_limit(&self) -> TransportResult<u64> {
        let block = self.provider.get_block(BlockId::latest()).await?.ok_or(RpcError::NullResp)?;
        Ok(block.header.gas_limit)
    }

    async fn transaction_count(&self, account: Address, tag: NonceTag) -> TransportResult<u64> {
        let count = self.provider.get_transaction_count(account);
        match tag {
            NonceTag::Latest => count.latest().await,
            NonceTag::Pending => count.pending().await,
        }
    }

    async fn estimate_gas(&self, request: TransactionRequest) -> TransportResult<u64> {
        self.provider.estimate_gas(request).await
    }

    async fn sign_authorization(
        &self,
        authorization: Authorization,
    ) -> Result<SignedAuthorization, ClientError> {
        Ok(self.signer.sign_authorization(authorization).await?)
    }

    #[instrument(skip_all, fields(nonce = request.nonce))]
    async fn send_contract_call(
        &self,
        request: ContractCallRequest,
    ) -> Result<TxHash, ClientError> {
        let ContractCallRequest { account, calls, value, nonce, plan, authorization } = request;
        let tx = BatchCallDelegation::new(account, &self.provider)
            .execute(calls)
            .from(account)
            .value(value)
            .nonce(nonce)
            .gas(plan.gas_limit)
            .max_fee_per_gas(plan.max_fee_per_gas)
            .max_priority_fee_per_gas(plan.max_priority_fee_per_gas)
            .into_transaction_request()
            .with_authorization_list(vec![authorization]);

        let pending = self.provider.send_transaction(tx).await?;
        Ok(*pending.tx_hash())
    }

    #[instrument(skip_all, fields(nonce = tx.nonce))]
    async fn send_raw_transaction(&self, tx: TxEip7702) -> Result<TxHash, ClientError> {
        let signed = NetworkWallet::<Ethereum>::sign_transaction_from(
            &self.wallet,
            self.signer.address(),
            tx.into(),
        )
        .await?;

        let pending = self.provider.send_raw_transaction(&signed.encoded_2718()).await?;
        Ok(*pending.tx_hash())
    }
}
