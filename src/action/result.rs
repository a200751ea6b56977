//! The two-field record that is the entire action dispatch ABI (spec §3).

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
// (none)

/// Outcome of dispatching one named action to an actor's payload.
///
/// Deliberately not extensible: the whole contract between the workflow
/// interpreter and arbitrary payload types is this pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    /// Whether the action completed successfully.
    pub success: bool,
    /// Free-form textual result (often JSON, but the ABI does not require it).
    pub result: String,
}

impl ActionResult {
    /// Build a successful result.
    pub fn ok(result: impl Into<String>) -> Self {
        Self {
            success: true,
            result: result.into(),
        }
    }

    /// Build a failed result.
    pub fn fail(result: impl Into<String>) -> Self {
        Self {
            success: false,
            result: result.into(),
        }
    }

    /// The canonical "no matching action" result (spec §4.5).
    pub fn unknown_action(name: &str) -> Self {
        Self::fail(format!("Unknown action: {name}"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn ok_sets_success_true() {
        let r = ActionResult::ok("8");
        assert!(r.success);
        assert_eq!(r.result, "8");
    }

    #[test]
    fn unknown_action_message_format() {
        let r = ActionResult::unknown_action("frobnicate");
        assert!(!r.success);
        assert_eq!(r.result, "Unknown action: frobnicate");
    }
}
