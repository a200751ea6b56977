//! Utility types and helpers shared across the runtime.

pub mod ids;
pub mod logging;

pub use ids::{ActorId, JobId};
