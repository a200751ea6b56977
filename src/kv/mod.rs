//! Dynamic key-value state tree backing each actor's mutable scratch state.
//!
//! A [`KvState`] is a mutable tree of nested mappings and ordered sequences,
//! addressed by dotted, XPath-flavored paths (`path.rs`). It is the
//! workflow-authoring surface described in spec §4.4: readers get typed
//! accessors with defaults, writers auto-vivify intermediate mappings and
//! pad arrays with `null`.
//!
//! # Modules
//!
//! - [`value`] — the tagged-union [`KvValue`] (§9: "opaque JSON tree")
//! - [`path`] — the dotted/bracketed path grammar
//! - [`state`] — [`KvState`] itself: get/put/remove/format
//! - [`handle`] — [`KvHandle`], the lazily-created shared handle an actor owns

pub mod handle;
pub mod path;
pub mod state;
pub mod value;

pub use handle::KvHandle;
pub use path::{PathError, PathSegment};
pub use state::{KvError, KvState};
pub use value::KvValue;
