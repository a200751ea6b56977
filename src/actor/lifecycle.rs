//! Mailbox consumer state machine: `RUNNING -> STOPPING -> STOPPED` (spec §4.1).
//!
//! There is no restart counter and no `Failed` state here: closed actors are
//! removed, never restarted, so the machine is just the three states spec
//! §4.1 actually names.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use chrono::{DateTime, Utc};

// Layer 3: Internal module imports
// (none)

/// Lifecycle state of an actor's mailbox consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorState {
    /// Consuming the mailbox normally.
    Running,
    /// `close` has been called; no new work is accepted, in-flight work
    /// completes, queued work is discarded.
    Stopping,
    /// The consumer has exited; the actor is dead.
    Stopped,
}

impl Default for ActorState {
    fn default() -> Self {
        Self::Running
    }
}

/// Tracks an actor's current lifecycle state and when it last changed.
#[derive(Debug, Clone)]
pub struct ActorLifecycle {
    state: ActorState,
    last_state_change: DateTime<Utc>,
}

impl ActorLifecycle {
    /// A freshly spawned actor starts `Running`.
    pub fn new() -> Self {
        Self {
            state: ActorState::Running,
            last_state_change: Utc::now(),
        }
    }

    /// The current state.
    pub fn state(&self) -> ActorState {
        self.state
    }

    /// When the state last changed.
    pub fn last_state_change(&self) -> DateTime<Utc> {
        self.last_state_change
    }

    /// `true` iff still accepting and processing mailbox messages.
    pub fn is_running(&self) -> bool {
        matches!(self.state, ActorState::Running)
    }

    /// `true` once the consumer has fully exited.
    pub fn is_stopped(&self) -> bool {
        matches!(self.state, ActorState::Stopped)
    }

    /// Move to `new_state`. A no-op re-entry into the same state does not
    /// restamp the timestamp, which is what makes repeated calls to
    /// `Actor::close` (spec §4.1 "Idempotent") cheap and harmless.
    pub fn transition_to(&mut self, new_state: ActorState) {
        if self.state == new_state {
            return;
        }
        self.state = new_state;
        self.last_state_change = Utc::now();
    }
}

impl Default for ActorLifecycle {
    fn default() -> Self {
        Self::new()
    }
}
