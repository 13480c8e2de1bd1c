//! # Batch Transfer
//!
//! Library for submitting batches of native transfers from an EOA as a single EIP-7702
//! delegated transaction.

pub mod cli;
pub mod config;
pub mod confirmation;
pub mod constants;
pub mod error;
pub mod progress;
pub mod provider;
pub mod serde;
pub mod signers;
pub mod transactions;
pub mod types;
pub mod version;
