//! Gas limit and fee parameters of a batch transaction.

use alloy::{eips::eip1559::Eip1559Estimation, primitives::U256};
use serde::{Deserialize, Serialize};

/// Gas limit and fee parameters of a batch transaction.
///
/// The gas limit never exceeds the block gas limit observed while planning and
/// `max_fee_per_gas >= max_priority_fee_per_gas`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasPlan {
    /// Gas limit of the transaction.
    pub gas_limit: u64,
    /// Maximum total fee per gas.
    pub max_fee_per_gas: u128,
    /// Maximum priority fee per gas.
    pub max_priority_fee_per_gas: u128,
}

impl GasPlan {
    /// Creates a plan from a gas limit and fee estimate.
    pub fn new(gas_limit: u64, fees: Eip1559Estimation) -> Self {
        Self {
            gas_limit,
            max_fee_per_gas: fees.max_fee_per_gas,
            max_priority_fee_per_gas: fees.max_priority_fee_per_gas,
        }
    }

    /// The worst-case fee paid for the transaction, `gas_limit * max_fee_per_gas`.
    pub fn max_cost(&self) -> U256 {
        U256::from(self.gas_limit) * U256::from(self.max_fee_per_gas)
    }

    /// Returns the fee parameters.
    pub fn fees(&self) -> Eip1559Estimation {
        Eip1559Estimation {
            max_fee_per_gas: self.max_fee_per_gas,
            max_priority_fee_per_gas: self.max_priority_fee_per_gas,
        }
    }
}
