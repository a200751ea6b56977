//! Action dispatch: string action name → callable on an actor's payload
//! (spec §4.5).
//!
//! The original source offers two dispatch modes — a payload-implemented
//! switch statement, and reflective scanning of annotated methods. Per the
//! design notes (§9), a systems implementation replaces the reflective mode
//! with an explicit registration table built at actor-construction time.
//! Both modes ultimately produce the same [`ActionResult`] ABI, so they are
//! modeled here as two ways to answer one question — "what happens when
//! this actor is asked to run action X with these arguments" — with the
//! registration table taking priority when both are present, matching the
//! source's documented precedence.

// Layer 1: Standard library imports
use std::collections::HashMap;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use super::result::ActionResult;

/// Mode 1: a payload that implements its own `action → result` switch.
///
/// Every actor payload in this crate implements this trait; it is the
/// fallback dispatch path whenever no [`ActionTable`] entry matches (or no
/// table was registered at all).
pub trait ActionDispatch: Send {
    /// Run `action` with the given serialized argument bundle (always a
    /// JSON value per spec §3's "Argument-bundle"), returning the outcome.
    fn call_by_action_name(&mut self, action: &str, args: &str) -> ActionResult;
}

type Handler<T> = Box<dyn Fn(&mut T, &str) -> ActionResult + Send + Sync>;

/// Mode 2: an explicit registration table keyed by action name, replacing
/// reflective annotation scanning.
///
/// Construct with [`ActionTable::new`] and chain [`ActionTable::register`]
/// calls; pass the finished table to
/// [`crate::actor::Actor::with_action_table`] when spawning.
pub struct ActionTable<T> {
    handlers: HashMap<String, Handler<T>>,
}

impl<T> ActionTable<T> {
    /// An empty table (dispatch always falls through to [`ActionDispatch`]).
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler for `name`, returning `self` for chaining.
    pub fn register(
        mut self,
        name: impl Into<String>,
        handler: impl Fn(&mut T, &str) -> ActionResult + Send + Sync + 'static,
    ) -> Self {
        self.handlers.insert(name.into(), Box::new(handler));
        self
    }

    /// Number of registered action names.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// `true` if no actions are registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Look up and invoke the handler for `action`, if registered.
    pub fn try_dispatch(&self, payload: &mut T, action: &str, args: &str) -> Option<ActionResult> {
        self.handlers.get(action).map(|h| h(payload, args))
    }
}

impl<T> Default for ActionTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Dispatch `action` against `payload`: the registration table (if any and
/// if it has a matching entry) wins; otherwise fall through to
/// [`ActionDispatch::call_by_action_name`]; with no match anywhere, the
/// canonical "unknown action" result is returned.
pub fn dispatch<T: ActionDispatch>(
    payload: &mut T,
    table: Option<&ActionTable<T>>,
    action: &str,
    args: &str,
) -> ActionResult {
    if let Some(table) = table {
        if let Some(result) = table.try_dispatch(payload, action, args) {
            return result;
        }
    }
    payload.call_by_action_name(action, args)
}
