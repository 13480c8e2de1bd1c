//! Call type and entry point of the BatchCallDelegation contract.

use alloy::{
    primitives::{Address, Bytes, U256},
    sol,
};

sol! {
    /// A single call executed by the delegated account.
    ///
    /// Field order follows the deployed contract ABI: `(bytes,address,uint256)`.
    #[derive(Debug, PartialEq, Eq)]
    struct Call {
        /// The calldata bytes.
        bytes data;
        /// The call target.
        address to;
        /// Amount of native value to send to the target.
        uint256 value;
    }

    /// Contract designated by the EOA for the duration of the batch transaction.
    #[sol(rpc)]
    #[derive(Debug)]
    contract BatchCallDelegation {
        /// Executes the calls in order, reverting the whole batch if any call fails.
        function execute(Call[] calldata calls) external payable;
    }
}

impl Call {
    /// Creates a plain native transfer.
    pub fn transfer(to: Address, value: U256) -> Self {
        Self { data: Bytes::new(), to, value }
    }
}
