//! Batch transfer configuration.
use crate::{
    constants::{
        BASE_GAS, DEFAULT_SAFETY_MULTIPLIER, HOLESKY_BATCH_DELEGATION, HOLESKY_EXPLORER_URL,
        HOLESKY_PUBLIC_RPC_URL, MAX_FEE_BUFFER_PERCENT, PER_CALL_GAS, PRIORITY_FEE_PERCENT,
        SEPOLIA_BATCH_DELEGATION, SEPOLIA_EXPLORER_URL, SEPOLIA_PUBLIC_RPC_URL,
        SIMULATION_GAS_BUFFER_PERCENT, STRICT_SAFETY_MULTIPLIER,
    },
    types::SignerProfile,
};
use alloy::primitives::{Address, map::HashMap};
use alloy_chains::Chain;
use eyre::{Context, OptionExt};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;
use url::Url;

/// Batch transfer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Chain configurations.
    #[serde(with = "crate::serde::hash_map")]
    pub chains: HashMap<Chain, ChainConfig>,
    /// Gas planning configuration.
    #[serde(default)]
    pub gas: GasConfig,
    /// Signer configuration.
    #[serde(default)]
    pub signer: SignerConfig,
    /// Secrets, only ever provided through the CLI or environment.
    #[serde(skip)]
    pub secrets: SecretsConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        let mut chains = HashMap::default();
        chains.insert(
            Chain::sepolia(),
            ChainConfig::new(
                parse_static_url(SEPOLIA_PUBLIC_RPC_URL),
                SEPOLIA_BATCH_DELEGATION,
            )
            .with_explorer(parse_static_url(SEPOLIA_EXPLORER_URL)),
        );
        chains.insert(
            Chain::holesky(),
            ChainConfig::new(
                parse_static_url(HOLESKY_PUBLIC_RPC_URL),
                HOLESKY_BATCH_DELEGATION,
            )
            .with_explorer(parse_static_url(HOLESKY_EXPLORER_URL)),
        );

        Self {
            chains,
            gas: GasConfig::default(),
            signer: SignerConfig::default(),
            secrets: SecretsConfig::default(),
        }
    }
}

impl BatchConfig {
    /// Overrides the RPC endpoint of a chain, adding the chain if it is unknown.
    ///
    /// Unknown chains need a delegation address as well, see [`Self::with_delegation`].
    pub fn with_endpoint(mut self, chain: Chain, endpoint: Option<Url>) -> Self {
        if let Some(endpoint) = endpoint {
            self.chains
                .entry(chain)
                .and_modify(|conf| conf.endpoint = endpoint.clone())
                .or_insert_with(|| ChainConfig::new(endpoint, Address::ZERO));
        }
        self
    }

    /// Overrides the delegation contract of a chain.
    pub fn with_delegation(mut self, chain: Chain, delegation: Option<Address>) -> Self {
        if let Some(delegation) = delegation {
            match self.chains.get_mut(&chain) {
                Some(conf) => conf.delegation = delegation,
                None => warn!(%chain, "ignoring delegation override for unconfigured chain"),
            }
        }
        self
    }

    /// Sets the signer profile.
    pub fn with_signer_profile(mut self, profile: Option<SignerProfile>) -> Self {
        if let Some(profile) = profile {
            self.signer.profile = profile;
        }
        self
    }

    /// Sets the gas estimation mode.
    pub fn with_estimation_mode(mut self, mode: Option<EstimationMode>) -> Self {
        if let Some(mode) = mode {
            self.gas.estimation = mode;
        }
        self
    }

    /// Sets the private key used to sign.
    pub fn with_private_key(mut self, private_key: Option<String>) -> Self {
        if private_key.is_some() {
            self.secrets.private_key = private_key;
        }
        self
    }

    /// Sets the AWS KMS key used to sign.
    pub fn with_kms_key_id(mut self, kms_key_id: Option<String>) -> Self {
        if kms_key_id.is_some() {
            self.secrets.kms_key_id = kms_key_id;
        }
        self
    }

    /// Returns the configuration of a chain.
    pub fn chain(&self, chain: Chain) -> eyre::Result<&ChainConfig> {
        let conf = self.chains.get(&chain).ok_or_eyre(format!("chain {chain} is not configured"))?;
        if conf.delegation.is_zero() {
            eyre::bail!("no delegation contract configured for chain {chain}");
        }
        Ok(conf)
    }

    /// Load from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> eyre::Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .wrap_err_with(|| format!("failed to read config file: {}", path.display()))?;
        let config = serde_yaml::from_reader(&file)
            .wrap_err_with(|| format!("failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save to a YAML file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> eyre::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Loads the config from `path`, writing the default config there if the file is missing.
    pub fn load_or_init<P: AsRef<Path>>(path: P) -> eyre::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load_from_file(path);
        }

        let config = Self::default();
        config
            .save_to_file(path)
            .wrap_err_with(|| format!("failed to write default config: {}", path.display()))?;
        Ok(config)
    }
}

/// Chain configuration for individual chains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// The RPC endpoint of the chain.
    pub endpoint: Url,
    /// The BatchCallDelegation contract accounts delegate to.
    pub delegation: Address,
    /// Block explorer base URL, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explorer: Option<Url>,
}

impl ChainConfig {
    /// Creates a chain configuration without explorer.
    pub fn new(endpoint: Url, delegation: Address) -> Self {
        Self { endpoint, delegation, explorer: None }
    }

    /// Sets the block explorer.
    pub fn with_explorer(mut self, explorer: Url) -> Self {
        self.explorer = Some(explorer);
        self
    }
}

/// How the gas limit of a batch is estimated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum EstimationMode {
    /// Simulate the call with `eth_estimateGas`, falling back to the heuristic on failure.
    #[default]
    Auto,
    /// Always use the fixed heuristic.
    Heuristic,
}

/// Gas planning configuration.
///
/// The heuristic values are compatibility workarounds whose accuracy for current signer versions
/// is unverified. They are exposed here so they can be tuned without a rebuild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GasConfig {
    /// Estimation mode.
    pub estimation: EstimationMode,
    /// Gas assumed for the entry point and a single call.
    pub base_gas: u64,
    /// Marginal gas per call.
    pub per_call_gas: u64,
    /// Heuristic multiplier for standard signers.
    pub safety_multiplier: u64,
    /// Heuristic multiplier for strict signers.
    pub strict_safety_multiplier: u64,
    /// Percent added to simulated estimates.
    pub simulation_buffer_percent: u64,
    /// Priority fee as a percentage of the gas price.
    pub priority_fee_percent: u128,
    /// Percent added on top of the gas price for the max fee.
    pub max_fee_buffer_percent: u128,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            estimation: EstimationMode::default(),
            base_gas: BASE_GAS,
            per_call_gas: PER_CALL_GAS,
            safety_multiplier: DEFAULT_SAFETY_MULTIPLIER,
            strict_safety_multiplier: STRICT_SAFETY_MULTIPLIER,
            simulation_buffer_percent: SIMULATION_GAS_BUFFER_PERCENT,
            priority_fee_percent: PRIORITY_FEE_PERCENT,
            max_fee_buffer_percent: MAX_FEE_BUFFER_PERCENT,
        }
    }
}

/// Signer configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerConfig {
    /// Compatibility profile of the signer.
    #[serde(default)]
    pub profile: SignerProfile,
}

/// Secrets kept out of the config file.
#[derive(Clone, Default)]
pub struct SecretsConfig {
    /// Hex-encoded private key.
    pub private_key: Option<String>,
    /// AWS KMS key id.
    pub kms_key_id: Option<String>,
}

impl std::fmt::Debug for SecretsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretsConfig")
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("kms_key_id", &self.kms_key_id)
            .finish()
    }
}

fn parse_static_url(url: &'static str) -> Url {
    Url::parse(url).expect("static URL is valid")
}
