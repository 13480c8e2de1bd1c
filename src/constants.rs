//! Batch submission constants.
//!
//! The gas heuristics below are compatibility workarounds for signer implementations that
//! under-estimate delegated calls. They are defaults only and can be overridden in the config.

use alloy::primitives::{Address, address};

/// Gas assumed for executing the delegated `execute` entry point with a single call.
pub const BASE_GAS: u64 = 500_000;

/// Marginal gas assumed for every call in the batch.
pub const PER_CALL_GAS: u64 = 100_000;

/// Multiplier applied to the heuristic gas limit for signers that handle delegated calls.
pub const DEFAULT_SAFETY_MULTIPLIER: u64 = 3;

/// Multiplier applied to the heuristic gas limit for strict signers.
///
/// Strict signers have been observed to run delegated calls out of gas with the default
/// multiplier.
pub const STRICT_SAFETY_MULTIPLIER: u64 = 4;

/// Percent added on top of a simulated gas estimate.
pub const SIMULATION_GAS_BUFFER_PERCENT: u64 = 20;

/// Share of the network gas price, in percent, offered as priority fee.
pub const PRIORITY_FEE_PERCENT: u128 = 20;

/// Percent by which the max fee exceeds the network gas price.
///
/// E.g if the gas price is 100 gwei, the transaction will have a max fee of 120 gwei.
pub const MAX_FEE_BUFFER_PERCENT: u128 = 20;

/// BatchCallDelegation deployment on Sepolia.
pub const SEPOLIA_BATCH_DELEGATION: Address =
    address!("0x6987E30398b2896B5118ad1076fb9f58825a6f1a");

/// BatchCallDelegation deployment on Holesky.
pub const HOLESKY_BATCH_DELEGATION: Address =
    address!("0x979dd1ab4a7e3b3370b1daceec8b4198f97e0d6f");

/// The public Sepolia RPC URL.
///
/// This endpoint is rate-limited.
pub const SEPOLIA_PUBLIC_RPC_URL: &str = "https://ethereum-sepolia-rpc.publicnode.com";

/// The public Holesky RPC URL.
///
/// This endpoint is rate-limited.
pub const HOLESKY_PUBLIC_RPC_URL: &str = "https://ethereum-holesky-rpc.publicnode.com";

/// Sepolia block explorer.
pub const SEPOLIA_EXPLORER_URL: &str = "https://sepolia.etherscan.io";

/// Holesky block explorer.
pub const HOLESKY_EXPLORER_URL: &str = "https://holesky.etherscan.io";
