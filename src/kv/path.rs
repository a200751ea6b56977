//! Dotted, XPath-flavored path grammar for addressing [`crate::kv::KvState`] nodes.
//!
//! ```text
//! path    := ["$", "."]? segment ("." segment)*
//! segment := name | name "[" index "]" | "[" index "]"
//! index   := non-negative integer
//! ```
//!
//! A `name[index]` segment lowers to two [`PathSegment`]s: a `Key` followed
//! by an `Index`, so `get("hosts[1]")` walks `Key("hosts")` then `Index(1)`.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
// (none)

/// One step of a parsed KV-State path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Descend into a mapping by key.
    Key(String),
    /// Descend into a sequence by index.
    ///
    /// Negative indices parse successfully even though the grammar's
    /// `index` is nominally non-negative: a negative index like `-1` is
    /// accepted syntactically and simply treated as always-missing/ignored
    /// by the caller — see [`crate::kv::KvState`].
    Index(i64),
}

/// Errors raised while parsing a path string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// The path was empty after stripping the optional `$.` prefix.
    #[error("empty path")]
    Empty,
    /// A bracketed index segment (`name[idx]` or `[idx]`) had a
    /// non-integer index.
    #[error("invalid index in segment: {0}")]
    InvalidIndex(String),
}

/// Parse a dotted path into its segments.
///
/// ```rust
/// use flowrt::kv::path::{parse, PathSegment};
///
/// let segs = parse("$.hosts[1]").unwrap();
/// assert_eq!(
///     segs,
///     vec![PathSegment::Key("hosts".into()), PathSegment::Index(1)]
/// );
/// ```
pub fn parse(path: &str) -> Result<Vec<PathSegment>, PathError> {
    let stripped = path.strip_prefix("$.").unwrap_or(path);
    if stripped.is_empty() {
        return Err(PathError::Empty);
    }

    let mut segments = Vec::new();
    for raw in stripped.split('.') {
        parse_segment(raw, &mut segments)?;
    }
    Ok(segments)
}

fn parse_segment(raw: &str, out: &mut Vec<PathSegment>) -> Result<(), PathError> {
    match raw.find('[') {
        None => {
            out.push(PathSegment::Key(raw.to_string()));
            Ok(())
        }
        Some(bracket_pos) => {
            if !raw.ends_with(']') {
                return Err(PathError::InvalidIndex(raw.to_string()));
            }
            let name = &raw[..bracket_pos];
            let index_str = &raw[bracket_pos + 1..raw.len() - 1];
            let index: i64 = index_str
                .parse()
                .map_err(|_| PathError::InvalidIndex(raw.to_string()))?;
            if !name.is_empty() {
                out.push(PathSegment::Key(name.to_string()));
            }
            out.push(PathSegment::Index(index));
            Ok(())
        }
    }
}
