//! The two seams between a concrete [`crate::actor::Actor<T>`] and its
//! owning [`crate::system::ActorSystem`].
//!
//! `T` is erased on both sides of this boundary: the system's registry
//! holds actors of many different payload types side by side (spec §3
//! "mapping from actor name to actor"), and the workflow interpreter
//! dispatches actions by string name without ever knowing `T` (spec §4.6).
//! [`ActorHandle`] is the type-erased view a looked-up actor presents to
//! both; [`ActorRegistry`] is the (smaller) view an actor holds of its
//! owning system, needed only for `create_child` and `close`.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
use async_trait::async_trait;

// Layer 3: Internal module imports
use crate::action::{ActionResult, ExecutionMode};
use crate::kv::KvHandle;

/// Type-erased view of one live actor, keyed by name in the system registry.
#[async_trait]
pub trait ActorHandle: Send + Sync {
    /// The actor's registered name.
    fn name(&self) -> &str;

    /// `false` once the actor's mailbox consumer has fully stopped.
    fn is_alive(&self) -> bool;

    /// A handle to this actor's lazily-created KV-State.
    fn kv_state(&self) -> KvHandle;

    /// Discard all queued-but-not-started mailbox messages.
    fn clear_pending(&self) -> usize;

    /// This actor's parent name, if it was created via `create_child`.
    fn parent(&self) -> Option<String>;

    /// This actor's children, in creation order.
    fn children(&self) -> Vec<String>;

    /// Stop the mailbox consumer, clear the payload, deregister. Idempotent.
    async fn close(&self);

    /// Run a named action against this actor's payload (spec §4.6 step 2d),
    /// per the requested [`ExecutionMode`].
    async fn dispatch_action(&self, action: &str, args: &str, mode: ExecutionMode) -> ActionResult;

    /// Run a named action via the actor's own FIFO mailbox (spec §4.7).
    async fn dispatch_via_mailbox(&self, action: &str, args: &str) -> ActionResult;
}

/// The subset of [`crate::system::ActorSystem`] an [`crate::actor::Actor`]
/// needs in order to register children it creates and deregister itself on
/// close.
pub trait ActorRegistry: Send + Sync {
    /// Add `handle` to the registry under its own name.
    fn register(&self, handle: Arc<dyn ActorHandle>);

    /// Remove the actor named `name`, if present.
    fn deregister(&self, name: &str);
}
