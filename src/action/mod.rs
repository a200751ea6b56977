//! Reflective-or-declarative mapping from string action name to a callable
//! on an actor's payload, yielding a typed [`ActionResult`] (spec §4.5).

pub mod dispatch;
pub mod mode;
pub mod result;

pub use dispatch::{dispatch, ActionDispatch, ActionTable};
pub use mode::ExecutionMode;
pub use result::ActionResult;
