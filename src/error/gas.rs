use alloy::transports::{RpcError, TransportErrorKind};
use thiserror::Error;

/// Errors raised while planning gas for a batch.
#[derive(Debug, Error)]
pub enum GasError {
    /// The network gas price could not be fetched.
    #[error("failed to fetch gas price: {0}")]
    GasPrice(#[source] RpcError<TransportErrorKind>),
    /// The latest block could not be fetched.
    #[error("failed to fetch block gas limit: {0}")]
    BlockGasLimit(#[source] RpcError<TransportErrorKind>),
    /// The heuristic gas limit does not fit into a `u64`.
    #[error("heuristic gas limit overflows for {calls} calls")]
    Overflow {
        /// Number of calls in the batch.
        calls: usize,
    },
}
