//! Explicit session context handed to the submitter.

use crate::config::GasConfig;
use alloy::primitives::{Address, ChainId};
use alloy_chains::Chain;
use serde::{Deserialize, Serialize};
use url::Url;

/// Compatibility profile of the connected signer.
///
/// Signers differ in whether they accept the contract-call form for delegated transactions. The
/// profile is chosen when the signer is constructed and never inferred at submission time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SignerProfile {
    /// Accepts the contract-call form.
    #[default]
    Standard,
    /// Mishandles the contract-call form for delegated transactions and needs more gas headroom.
    Strict,
}

impl SignerProfile {
    /// Resolves the capabilities of this profile against the gas configuration.
    pub fn capabilities(self, gas: &GasConfig) -> SignerCapabilities {
        match self {
            Self::Standard => SignerCapabilities {
                contract_call_delegation: true,
                safety_multiplier: gas.safety_multiplier,
            },
            Self::Strict => SignerCapabilities {
                contract_call_delegation: false,
                safety_multiplier: gas.strict_safety_multiplier,
            },
        }
    }
}

/// What the active signer supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignerCapabilities {
    /// Whether the contract-call form is accepted for delegated transactions.
    pub contract_call_delegation: bool,
    /// Multiplier applied to heuristic gas limits.
    pub safety_multiplier: u64,
}

/// The account, chain and delegate a submission runs against.
#[derive(Debug, Clone)]
pub struct Session {
    /// The EOA sending the batch.
    pub account: Address,
    /// The active chain.
    pub chain: Chain,
    /// The BatchCallDelegation contract designated by the account.
    pub delegate: Address,
    /// Capabilities of the active signer.
    pub capabilities: SignerCapabilities,
    /// Block explorer used for transaction links.
    pub explorer: Option<Url>,
}

impl Session {
    /// Chain id of the active chain.
    pub fn chain_id(&self) -> ChainId {
        self.chain.id()
    }

    /// Explorer link for a transaction, if an explorer is configured.
    pub fn explorer_tx_url(&self, tx_hash: impl std::fmt::Display) -> Option<Url> {
        self.explorer.as_ref().and_then(|explorer| explorer.join(&format!("tx/{tx_hash}")).ok())
    }
}
