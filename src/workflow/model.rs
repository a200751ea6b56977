//! In-memory representation of a labelled state machine parsed from a
//! structured document (spec §3 "Workflow", §6 "Workflow document").

// Layer 1: Standard library imports
use std::collections::HashSet;

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// Layer 3: Internal module imports
use super::errors::WorkflowError;
use crate::action::ExecutionMode;

/// Terminal state token (spec §6 "Terminal state token").
pub const END_STATE: &str = "end";

/// Default initial state token when a document omits `initialState` (spec
/// §3 "initial value from the document, defaults to `"0"`").
pub const DEFAULT_INITIAL_STATE: &str = "0";

/// A set of state tokens a transition matches against. Serialized as a
/// plain list in the document; compared with set semantics (order does
/// not matter for membership, but document order is preserved for the
/// `to`-set deterministic-pick policy — see [`Transition::pick_to_state`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateSet(pub Vec<String>);

impl StateSet {
    /// `true` iff `token` is a member of this set.
    pub fn contains(&self, token: &str) -> bool {
        self.0.iter().any(|s| s == token)
    }

    /// All distinct tokens, for validation/diagnostics.
    pub fn as_set(&self) -> HashSet<&str> {
        self.0.iter().map(String::as_str).collect()
    }
}

/// The `states: {from, to}` pair of a [`Transition`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct States {
    /// State tokens this transition matches against.
    pub from: StateSet,
    /// State tokens this transition may advance to.
    pub to: StateSet,
}

/// One action within a [`Transition`]: target actor, method name, arguments,
/// and execution mode (spec §3 "Action").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Name of the actor registered in the [`crate::system::ActorSystem`]
    /// this action targets.
    pub actor: String,
    /// The action (method) name passed to `call_by_action_name`.
    pub method: String,
    /// Scalar, sequence, or mapping arguments (spec §3 "Argument-bundle").
    /// Represented directly as a [`JsonValue`] since `serde_json::Value`'s
    /// own untagged shape already covers exactly those three cases.
    #[serde(default = "default_arguments")]
    pub arguments: JsonValue,
    /// Where this action actually runs; defaults to `pool` (spec §6).
    #[serde(default)]
    pub mode: ExecutionMode,
}

fn default_arguments() -> JsonValue {
    JsonValue::Array(Vec::new())
}

/// Pack an already-expanded [`JsonValue`] into the wire argument-bundle
/// shape (spec §3 "Argument-bundle"): a bare scalar becomes a one-element
/// array; sequences and mappings pass through untouched.
pub fn pack_arguments(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::Array(_) | JsonValue::Object(_) => value.clone(),
        scalar => JsonValue::Array(vec![scalar.clone()]),
    }
}

/// One labelled row of the workflow state machine (spec §3 "Transition").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// Unique label within the owning [`Workflow`].
    pub label: String,
    /// The `from`/`to` state-token sets this transition matches and targets.
    pub states: States,
    /// Ordered actions run when this transition fires.
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl Transition {
    /// Deterministic choice of the next state token when `states.to` names
    /// more than one token.
    ///
    /// Spec §9 ("Open questions") leaves this policy to the implementer and
    /// recommends "first-in-document order is the safest default" — this
    /// crate follows that recommendation exactly (see `DESIGN.md`).
    pub fn pick_to_state(&self) -> Option<&str> {
        self.states.to.0.first().map(String::as_str)
    }
}

/// The parsed in-memory form of a workflow document (spec §3 "Workflow",
/// §6 "Workflow document").
///
/// The document's top-level transition list may be spelled `steps` or
/// `transitions`; both deserialize into [`Workflow::transitions`] (spec §6
/// "alias `transitions`").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    /// The workflow's name.
    pub name: String,
    /// Initial state token; defaults to `"0"` (spec §3, §6).
    #[serde(rename = "initialState", alias = "initial_state", default = "default_initial_state")]
    pub initial_state: String,
    /// Ordered transition list, deserialized from either `steps` or
    /// `transitions`.
    #[serde(alias = "steps")]
    pub transitions: Vec<Transition>,
}

fn default_initial_state() -> String {
    DEFAULT_INITIAL_STATE.to_string()
}

impl Workflow {
    /// Parse a workflow document from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self, WorkflowError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Parse a workflow document from JSON text.
    pub fn from_json(text: &str) -> Result<Self, WorkflowError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Render this workflow back to YAML (used by the overlay tooling's
    /// round-trip property and by the CLI for diagnostics).
    pub fn to_yaml(&self) -> String {
        serde_yaml::to_string(self).unwrap_or_default()
    }

    /// The first transition, in document order, whose `from` set contains
    /// `state` (spec §4.6 step 1).
    pub fn find_matching(&self, state: &str) -> Option<&Transition> {
        self.transitions.iter().find(|t| t.states.from.contains(state))
    }

    /// Look up a transition by its unique label.
    pub fn by_label(&self, label: &str) -> Option<&Transition> {
        self.transitions.iter().find(|t| t.label == label)
    }
}
