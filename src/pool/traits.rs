//! The `WorkerPool` interface shared by both pool variants (spec §3, §4.3).

// Layer 1: Standard library imports
use std::time::Duration;

// Layer 2: Third-party crate imports
use async_trait::async_trait;

// Layer 3: Internal module imports
use super::errors::PoolError;

/// A unit of work submitted to a pool: a plain synchronous closure run on
/// a worker task. Pool-submitted work is bypass-path (spec §5): it has no
/// ordering relation to any actor's mailbox, and the caller is responsible
/// for payload race safety.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Common interface for both pool variants (spec §3 "WorkerPool (interface)").
#[async_trait]
pub trait WorkerPool: Send + Sync {
    /// Standard unordered submit; no ownership tracking.
    fn execute(&self, task: Task) -> Result<(), PoolError>;

    /// `true` for the managed variant, `false` for the stealing variant.
    fn supports_cancellation(&self) -> bool;

    /// `true` once [`WorkerPool::shutdown`] has been called.
    fn is_shut_down(&self) -> bool;

    /// Stop accepting new work and wait for every worker task to exit.
    /// Idempotent.
    async fn shutdown(&self);

    /// Wait up to `timeout` for the pool to finish shutting down, returning
    /// whether it terminated in time.
    async fn await_termination(&self, timeout: Duration) -> bool;
}

/// Extra operations offered only by the managed pool variant (spec §4.3).
#[async_trait]
pub trait OwnerPool: WorkerPool {
    /// Submit `task` for `owner`, enqueued at the back of the deque.
    fn submit_for_owner(&self, owner: &str, task: Task) -> Result<(), PoolError>;

    /// Submit `task` for `owner`, enqueued at the front of the deque —
    /// preempts other owners' queued tasks but never interrupts running work.
    fn submit_urgent_for_owner(&self, owner: &str, task: Task) -> Result<(), PoolError>;

    /// Remove every queued-but-not-started task belonging to `owner`,
    /// returning how many were removed. Running tasks are unaffected.
    fn cancel_for_owner(&self, owner: &str) -> usize;

    /// Number of `owner`'s tasks still present in the deque.
    fn pending_for_owner(&self, owner: &str) -> usize;
}
