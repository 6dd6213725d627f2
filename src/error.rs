//! Error types for table insertion.

use std::collections::TryReserveError;
use thiserror::Error;

/// Why an insert did not create a binding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InsertError {
    /// The key is already bound; the table is unchanged.
    #[error("key is already bound")]
    DuplicateKey,

    /// Growing the bucket array or copying the key could not allocate; the
    /// table is unchanged.
    #[error("allocation failed: {0}")]
    AllocationFailure(#[from] TryReserveError),
}
