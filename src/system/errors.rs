//! System-level error types (spec §7).

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use crate::pool::PoolError;

/// Errors raised by [`crate::system::ActorSystem`] registry operations.
#[derive(Error, Debug)]
pub enum SystemError {
    /// A transition or caller referenced a name with no live actor (spec §7
    /// "Missing actor").
    #[error("actor '{0}' not found")]
    ActorNotFound(String),

    /// Boundary case from spec §8: an actor named `""` is rejected rather
    /// than silently accepted (see `DESIGN.md`).
    #[error("actor name must not be empty")]
    EmptyActorName,

    /// Boundary case from spec §8: registering a second actor under a name
    /// already in use is rejected rather than replacing the first (see
    /// `DESIGN.md`).
    #[error("actor '{0}' is already registered")]
    DuplicateActorName(String),

    /// `SystemConfig::validate` rejected a configuration value.
    #[error("invalid system configuration: {0}")]
    InvalidConfig(String),

    /// A pool owned by this system refused a submission.
    #[error(transparent)]
    Pool(#[from] PoolError),
}

impl SystemError {
    /// `true` for errors that abort the caller's current operation but leave
    /// the system itself usable (spec §7: all but a bad configuration fall
    /// in this bucket).
    pub fn is_recoverable(&self) -> bool {
        !self.is_fatal()
    }

    /// `true` for errors that indicate the system cannot proceed at all.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvalidConfig(_))
    }
}
