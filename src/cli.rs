//! # Batch transfer CLI
use crate::{
    config::{BatchConfig, EstimationMode},
    confirmation::{AutoApprove, ConfirmationGate, TerminalPrompt},
    progress::TracingProgress,
    provider::{ChainClient, RpcChainClient},
    signers::DynSigner,
    transactions::{BatchSubmitter, GasEstimator},
    types::{Session, SignerProfile, TransferRequest},
    version::{BATCH_LONG_VERSION, BATCH_SHORT_VERSION},
};
use alloy::primitives::{
    Address, Bytes, U256,
    utils::{ParseUnits, parse_units},
};
use alloy_chains::Chain;
use clap::Parser;
use eyre::OptionExt;
use std::{path::PathBuf, sync::Arc};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use url::Url;

/// Sends several native transfers from an EOA in a single EIP-7702 delegated transaction.
#[derive(Debug, Parser)]
#[command(author, version = BATCH_SHORT_VERSION, long_version = BATCH_LONG_VERSION, about, long_about = None)]
pub struct Args {
    /// The configuration file.
    ///
    /// If missing, a default one will be stored under this path.
    #[arg(long, value_name = "CONFIG", env = "BATCH_CONFIG", default_value = "batch.yaml")]
    pub config: PathBuf,
    /// The chain to send the batch on.
    #[arg(long, value_name = "CHAIN", default_value_t = Chain::holesky())]
    pub chain: Chain,
    /// A transfer in the form `ADDRESS:AMOUNT[:CALLDATA]`.
    ///
    /// The amount is in ether unless suffixed with `eth`, `gwei` or `wei`.
    #[arg(long = "transfer", value_name = "TRANSFER", value_parser = parse_transfer, required = true)]
    pub transfers: Vec<TransferRequest>,
    /// The hex-encoded private key of the sending account.
    #[arg(long, value_name = "KEY", env = "BATCH_PRIVATE_KEY", conflicts_with = "kms_key_id")]
    pub private_key: Option<String>,
    /// The AWS KMS key of the sending account.
    #[arg(long, value_name = "KEY_ID", env = "BATCH_KMS_KEY_ID")]
    pub kms_key_id: Option<String>,
    /// Overrides the RPC endpoint of the chain.
    #[arg(long, value_name = "RPC_ENDPOINT")]
    pub endpoint: Option<Url>,
    /// Overrides the BatchCallDelegation contract of the chain.
    #[arg(long, value_name = "ADDRESS")]
    pub delegation: Option<Address>,
    /// Compatibility profile of the signer.
    #[arg(long, value_name = "PROFILE")]
    pub signer_profile: Option<SignerProfile>,
    /// How the gas limit is estimated.
    #[arg(long, value_name = "MODE")]
    pub estimation: Option<EstimationMode>,
    /// Approve the authorization and the transaction without prompting.
    #[arg(long, short = 'y', default_value_t = false)]
    pub yes: bool,
}

impl Args {
    /// Merges [`Args`] values into an existing [`BatchConfig`] instance.
    pub fn merge_batch_config(&self, config: BatchConfig) -> BatchConfig {
        config
            .with_endpoint(self.chain, self.endpoint.clone())
            .with_delegation(self.chain, self.delegation)
            .with_signer_profile(self.signer_profile)
            .with_estimation_mode(self.estimation)
            .with_private_key(self.private_key.clone())
            .with_kms_key_id(self.kms_key_id.clone())
    }

    /// Submits the batch.
    pub async fn run(self) -> eyre::Result<()> {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(
                EnvFilter::builder()
                    .with_default_directive(LevelFilter::INFO.into())
                    .from_env_lossy(),
            )
            .init();

        let config = self.merge_batch_config(BatchConfig::load_or_init(&self.config)?);
        let chain_config = config.chain(self.chain)?.clone();

        let signer = DynSigner::from_secrets(&config.secrets, self.chain.id()).await?;
        let client = RpcChainClient::connect(chain_config.endpoint, signer).await?;
        if client.chain_id() != self.chain.id() {
            eyre::bail!("endpoint is on chain {}, expected {}", client.chain_id(), self.chain.id());
        }

        let session = Session {
            account: client.account(),
            chain: self.chain,
            delegate: chain_config.delegation,
            capabilities: config.signer.profile.capabilities(&config.gas),
            explorer: chain_config.explorer,
        };
        info!(
            account = %session.account,
            chain = %session.chain,
            delegate = %session.delegate,
            "Loaded account"
        );

        let gate: Arc<dyn ConfirmationGate> =
            if self.yes { Arc::new(AutoApprove) } else { Arc::new(TerminalPrompt) };
        let submitter = BatchSubmitter::new(
            Arc::new(client),
            gate,
            Arc::new(TracingProgress),
            GasEstimator::new(config.gas.clone()),
        );

        let receipt = submitter.submit(&session, self.transfers).await?;
        println!("{}", receipt.tx_hash);
        if let Some(url) = receipt.explorer_url {
            println!("{url}");
        }

        Ok(())
    }
}

/// Parses an amount in ether, or in the unit given by an `eth`, `gwei` or `wei` suffix.
fn parse_amount(arg: &str) -> eyre::Result<U256> {
    let arg = arg.trim();
    let (value, unit) = if let Some(value) = arg.strip_suffix("gwei") {
        (value, "gwei")
    } else if let Some(value) = arg.strip_suffix("wei") {
        (value, "wei")
    } else if let Some(value) = arg.strip_suffix("eth") {
        (value, "ether")
    } else {
        (arg, "ether")
    };

    match parse_units(value.trim(), unit)? {
        ParseUnits::U256(amount) => Ok(amount),
        ParseUnits::I256(_) => eyre::bail!("amount must not be negative: {arg}"),
    }
}

/// Parses a transfer in the form `address:amount[:calldata]`.
fn parse_transfer(arg: &str) -> eyre::Result<TransferRequest> {
    let mut parts = arg.splitn(3, ':');
    let recipient: Address = parts.next().ok_or_eyre("expected address:amount")?.parse()?;
    let amount = parse_amount(parts.next().ok_or_eyre("expected address:amount")?)?;

    let transfer = TransferRequest::new(recipient, amount);
    match parts.next() {
        Some(data) => Ok(transfer.with_extra_data(data.parse::<Bytes>()?)),
        None => Ok(transfer),
    }
}
