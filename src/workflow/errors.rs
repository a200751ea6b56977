//! Errors raised while parsing or merging workflow documents (spec §6, §7).

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
// (none)

/// Errors raised while parsing a workflow document (spec §6 "Workflow
/// document").
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The document was not valid YAML, or did not match the expected shape.
    #[error("invalid workflow document (yaml): {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    /// The document was not valid JSON, or did not match the expected shape.
    #[error("invalid workflow document (json): {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Errors raised while building a merged workflow from an overlay document
/// (spec §6 "Overlay/patch document", §7 "Orphan overlay vertex").
#[derive(Debug, Error)]
pub enum OverlayError {
    /// Reading a base or patch file from disk failed.
    #[error("failed to read '{0}': {1}")]
    Io(String, #[source] std::io::Error),

    /// A base or patch document failed to parse.
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// A patch introduced a transition whose label is new (not present in any
    /// base) and which shares no state token with any transition already in
    /// the merge — it has nowhere to anchor in the state graph.
    #[error("orphan transition '{0}': shares no state with any existing transition")]
    Orphan(String),
}
