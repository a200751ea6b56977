//! Execution mode for a dispatched action (spec §3, §4.6 step 2d).

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
// (none)

/// Where an action's `call_by_action_name` actually runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Submit via the target actor's managed pool, owner-keyed by the
    /// actor's name (spec §4.6: "actor's managed pool-submit... with the
    /// actor's name as owner key"). Bypasses the mailbox entirely.
    Pool,
    /// Invoke synchronously on the caller's own thread. Also bypasses the
    /// mailbox.
    Direct,
}

impl Default for ExecutionMode {
    /// The workflow document's `mode` key defaults to `pool` (spec §6).
    fn default() -> Self {
        Self::Pool
    }
}
