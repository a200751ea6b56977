//! # flowrt - lightweight in-process actor runtime with a declarative
//! workflow interpreter
//!
//! Ordinary payload values become actors by wrapping them in an
//! [`actor::Actor`], a reference that serializes all access through a
//! private FIFO mailbox. On top of that runtime, [`workflow::Interpreter`]
//! drives a set of actors by executing a state machine described in a
//! structured YAML or JSON document.
//!
//! # Quick start
//!
//! ```rust
//! use flowrt::prelude::*;
//!
//! struct Counter {
//!     value: i64,
//! }
//!
//! impl ActionDispatch for Counter {
//!     fn call_by_action_name(&mut self, action: &str, _args: &str) -> ActionResult {
//!         match action {
//!             "increment" => {
//!                 self.value += 1;
//!                 ActionResult::ok(self.value.to_string())
//!             }
//!             "get" => ActionResult::ok(self.value.to_string()),
//!             other => ActionResult::unknown_action(other),
//!         }
//!     }
//! }
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let actor = Actor::new("counter", Counter { value: 0 });
//! actor.tell(|c: &mut Counter| c.value += 5).await?;
//! let value = actor.ask(|c: &mut Counter| c.value).await?;
//! assert_eq!(value, 5);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`kv`] - the dynamic key-value tree backing each actor's scratch state
//! - [`pool`] - the stealing and managed worker-pool variants
//! - [`mailbox`] - the FIFO queue an actor's own `tell`/`ask` traffic goes through
//! - [`actor`] - the mailbox-serialized actor itself
//! - [`system`] - the actor registry and default pool owner
//! - [`action`] - action dispatch (`call_by_action_name` / `ActionTable`)
//! - [`workflow`] - the workflow document model, variable expansion, the
//!   interpreter, and the overlay/patch pre-processor
//! - [`scheduler`] - periodic/one-shot action firing against an actor's mailbox
//! - [`util`] - identifiers and the process-wide logging facility
//!
//! # Non-goals
//!
//! No persistence of actor state across process restarts, no exactly-once
//! cross-process delivery, no back-pressure beyond an unbounded mailbox, and
//! no policy-based supervision or restart strategies - a closed actor is
//! removed, not restarted. See `DESIGN.md` for the full grounding ledger and
//! the decisions taken on every open question.

pub mod action;
pub mod actor;
pub mod kv;
pub mod mailbox;
pub mod pool;
pub mod scheduler;
pub mod system;
pub mod util;
pub mod workflow;

pub mod prelude;

// Re-export the most commonly reached-for types at the crate root.
pub use action::{ActionDispatch, ActionResult, ActionTable, ExecutionMode};
pub use actor::{Actor, ActorError, ActorHandle};
pub use kv::{KvHandle, KvState, KvValue};
pub use pool::{ManagedPool, OwnerPool, PoolError, StealingPool, WorkerPool};
pub use scheduler::Scheduler;
pub use system::{ActorSystem, SystemConfig, SystemError};
pub use workflow::{Interpreter, StepOutcome, Workflow, WorkflowError};
