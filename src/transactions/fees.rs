use alloy::eips::eip1559::Eip1559Estimation;

/// Context for fee estimation.
#[derive(Debug, Clone, Copy)]
pub struct FeeContext {
    /// Network gas price.
    pub gas_price: u128,
    /// Share of the gas price offered as priority fee, in percent.
    pub priority_fee_percent: u128,
    /// Percent by which the max fee exceeds the gas price.
    pub max_fee_buffer_percent: u128,
}

impl FeeContext {
    /// Returns the fee estimation for a new transaction.
    ///
    /// Both values are rounded down. The priority fee is capped at the max fee.
    pub fn fees_for_new_transaction(&self) -> Eip1559Estimation {
        let max_fee_per_gas =
            self.gas_price.saturating_mul(100 + self.max_fee_buffer_percent) / 100;
        let max_priority_fee_per_gas =
            (self.gas_price.saturating_mul(self.priority_fee_percent) / 100).min(max_fee_per_gas);

        Eip1559Estimation { max_fee_per_gas, max_priority_fee_per_gas }
    }
}
