//! Pool-level error types (spec §7 "Pool shutdown").

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
// (none)

/// Errors raised while submitting work to a [`crate::pool::WorkerPool`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    /// `execute`/`submit_*` called after [`crate::pool::WorkerPool::shutdown`].
    #[error("pool is shut down")]
    ShutDown,
}
