//! Actor-level error types (spec §4.1, §7).

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use crate::pool::PoolError;

/// Errors surfaced from an actor's `tell`/`ask` family of operations.
///
/// Per spec §4.1 "Failure semantics", a panic inside the closure passed to
/// `tell`/`ask` never kills the actor — the mailbox consumer catches it and
/// logs, but from the caller's side that and an actor closed mid-call are
/// observably the same thing: the completion channel never fires. Both
/// surface as [`ActorError::Closed`].
#[derive(Debug, Error)]
pub enum ActorError {
    /// The actor's mailbox has been closed, the call was dropped by
    /// [`crate::actor::Actor::clear_pending`], or the action panicked
    /// before completing (spec §3 "a closed actor never processes further
    /// mailbox messages").
    #[error("actor '{0}' is closed")]
    Closed(String),

    /// A pool-routed `tell`/`ask` failed because the pool is shut down.
    #[error(transparent)]
    Pool(#[from] PoolError),
}
