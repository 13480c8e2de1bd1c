//! Transfer requests and the batch built from them.

use super::{BatchCallDelegation::executeCall, Call};
use crate::error::BatchError;
use alloy::{
    primitives::{Address, Bytes, U256},
    sol_types::SolCall,
};
use serde::{Deserialize, Serialize};

/// A native transfer requested by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    /// Recipient of the transfer.
    pub recipient: Address,
    /// Amount in wei.
    pub amount: U256,
    /// Optional calldata forwarded to the recipient.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_data: Option<Bytes>,
}

impl TransferRequest {
    /// Creates a plain transfer without calldata.
    pub fn new(recipient: Address, amount: U256) -> Self {
        Self { recipient, amount, extra_data: None }
    }

    /// Sets the calldata forwarded to the recipient.
    pub fn with_extra_data(mut self, data: Bytes) -> Self {
        self.extra_data = Some(data);
        self
    }
}

impl From<TransferRequest> for Call {
    fn from(transfer: TransferRequest) -> Self {
        Self {
            data: transfer.extra_data.unwrap_or_default(),
            to: transfer.recipient,
            value: transfer.amount,
        }
    }
}

/// An ordered sequence of calls executed by one delegated transaction.
///
/// The aggregate value is derived from the calls on construction and the calls can not be
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchIntent {
    calls: Vec<Call>,
    aggregate_value: U256,
}

impl BatchIntent {
    /// Builds a batch from transfer requests, preserving their order.
    ///
    /// Fails if the list is empty or if the amounts do not sum to a valid `uint256`.
    pub fn new(transfers: impl IntoIterator<Item = TransferRequest>) -> Result<Self, BatchError> {
        let calls: Vec<Call> = transfers.into_iter().map(Call::from).collect();
        if calls.is_empty() {
            return Err(BatchError::Empty);
        }

        let aggregate_value = calls.iter().enumerate().try_fold(U256::ZERO, |sum, (index, call)| {
            sum.checked_add(call.value).ok_or(BatchError::ValueOverflow { index })
        })?;

        Ok(Self { calls, aggregate_value })
    }

    /// The calls in execution order.
    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// Number of calls in the batch.
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    /// Always false, a batch holds at least one call.
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Sum of all call values.
    pub fn aggregate_value(&self) -> U256 {
        self.aggregate_value
    }

    /// The `execute` call for this batch.
    pub fn execute_call(&self) -> executeCall {
        executeCall { calls: self.calls.clone() }
    }

    /// ABI-encoded `execute` calldata.
    pub fn encoded_execute(&self) -> Bytes {
        self.execute_call().abi_encode().into()
    }
}
