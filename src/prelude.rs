//! Convenient single-import surface for building on flowrt.
//!
//! ```rust
//! use flowrt::prelude::*;
//! ```
//!
//! # What's included
//!
//! ## Actors
//! - [`Actor`] - mailbox-serialized actor wrapper around a payload value
//! - [`ActorHandle`] - type-erased view of a live actor
//! - [`ActorLifecycle`] / [`ActorState`] - the running/stopping/stopped state machine
//! - [`ActorError`] - closed-actor and pool-submission errors
//!
//! ## Action dispatch
//! - [`ActionDispatch`] - reflective `call_by_action_name` trait
//! - [`ActionTable`] - explicit action-name registration table
//! - [`ActionResult`] - the success/result pair every action call returns
//! - [`ExecutionMode`] - `Pool` vs `Direct` dispatch
//!
//! ## KV-State
//! - [`KvState`] / [`KvHandle`] / [`KvValue`] - the dynamic tree backing an actor's scratch state
//!
//! ## Worker pools
//! - [`WorkerPool`] / [`OwnerPool`] - the shared submission traits
//! - [`StealingPool`] / [`ManagedPool`] - the two concrete pool variants
//! - [`PoolError`]
//!
//! ## System
//! - [`ActorSystem`] - the actor registry and default pool owner
//! - [`SystemConfig`] / [`SystemError`]
//!
//! ## Workflows
//! - [`Workflow`] - the parsed state-machine document
//! - [`Interpreter`] / [`StepOutcome`] - the single-step/batch driver
//! - [`WorkflowError`]
//!
//! ## Scheduling
//! - [`Scheduler`] - periodic/one-shot action firing

// Actors
pub use crate::actor::{Actor, ActorError, ActorHandle, ActorLifecycle, ActorState};

// Action dispatch
pub use crate::action::{ActionDispatch, ActionResult, ActionTable, ExecutionMode};

// KV-State
pub use crate::kv::{KvHandle, KvState, KvValue};

// Worker pools
pub use crate::pool::{ManagedPool, OwnerPool, PoolError, StealingPool, WorkerPool};

// System
pub use crate::system::{ActorSystem, SystemConfig, SystemError};

// Workflows
pub use crate::workflow::{Interpreter, StepOutcome, Workflow, WorkflowError};

// Scheduling
pub use crate::scheduler::Scheduler;
