use thiserror::Error;

/// Errors raised while turning transfer requests into a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BatchError {
    /// No transfers were requested.
    #[error("batch contains no transfers")]
    Empty,
    /// The aggregate value does not fit into a `uint256`.
    #[error("aggregate value overflows uint256 at transfer {index}")]
    ValueOverflow {
        /// Index of the transfer whose amount overflowed the running sum.
        index: usize,
    },
}
