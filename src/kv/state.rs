//! The per-actor dynamic key-value tree (spec §4.4).

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use super::path::{self, PathSegment};
use super::value::KvValue;

/// Errors raised while mutating a [`KvState`] tree.
///
/// Per spec §4.4, writing through an intermediate node that exists but
/// cannot be descended (a scalar where a mapping or sequence is required)
/// is an error; writing through a `Null` intermediate auto-vivifies it
/// instead (documented policy — see the type-conflict note on [`KvState::put`]).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KvError {
    /// The path could not be parsed.
    #[error("invalid path: {0}")]
    InvalidPath(#[from] path::PathError),
    /// An intermediate node exists with an incompatible shape (e.g. writing
    /// `a.b` where `a` already holds a scalar or a sequence).
    #[error("type conflict at '{path}': expected {expected}, found {found}")]
    TypeConflict {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// A mutable tree of nested mappings and ordered sequences, rooted at a
/// mapping, addressed by the dotted path grammar in [`crate::kv::path`].
///
/// Each [`crate::actor`] lazily owns exactly one `KvState` as its scratch
/// state; the workflow interpreter stores each action's result under the
/// `result` key and expands `${...}` variable references against it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KvState {
    root: KvValue,
}

impl KvState {
    /// Create an empty state tree (an empty mapping at the root).
    pub fn new() -> Self {
        Self {
            root: KvValue::empty_map(),
        }
    }

    /// Borrow the whole tree as a [`KvValue`].
    pub fn root(&self) -> &KvValue {
        &self.root
    }

    /// Select the node at `path`, or `None` if any segment is missing.
    ///
    /// `None` is the "missing" sentinel from spec §4.4; `Some(KvValue::Null)`
    /// means the path resolved to an explicit null. [`KvState::has`] is
    /// built on this distinction.
    pub fn select(&self, path: &str) -> Result<Option<&KvValue>, KvError> {
        let segments = path::parse(path)?;
        Ok(select_segments(&self.root, &segments))
    }

    /// `true` iff `path` resolves to a present, non-null value.
    pub fn has(&self, path: &str) -> bool {
        matches!(self.select(path), Ok(Some(v)) if !v.is_null())
    }

    /// Read the raw value at `path`, collapsing "missing" and "null" to
    /// [`KvValue::Null`] for callers that don't need to distinguish them
    /// (use [`KvState::has`] when that distinction matters).
    pub fn get(&self, path: &str) -> KvValue {
        self.select(path)
            .ok()
            .flatten()
            .cloned()
            .unwrap_or(KvValue::Null)
    }

    /// Typed read with a default for missing/null/incompatible values.
    pub fn get_string(&self, path: &str, default: impl Into<String>) -> String {
        self.get(path).coerce_string(default)
    }

    /// Typed read with a default for missing/null/incompatible values.
    pub fn get_int(&self, path: &str, default: i32) -> i32 {
        self.get(path).coerce_int(default)
    }

    /// Typed read with a default for missing/null/incompatible values.
    pub fn get_long(&self, path: &str, default: i64) -> i64 {
        self.get(path).coerce_long(default)
    }

    /// Typed read with a default for missing/null/incompatible values.
    pub fn get_double(&self, path: &str, default: f64) -> f64 {
        self.get(path).coerce_double(default)
    }

    /// Typed read with a default for missing/null/incompatible values.
    pub fn get_bool(&self, path: &str, default: bool) -> bool {
        self.get(path).coerce_bool(default)
    }

    /// Write `value` at `path`, creating intermediate mappings/sequences as
    /// needed. Sequences are padded with `Null` up to the requested index.
    pub fn put(&mut self, path: &str, value: KvValue) -> Result<(), KvError> {
        let segments = path::parse(path)?;
        put_segments(&mut self.root, &segments, value)
    }

    /// Remove the value named by the final `Key` segment of `path` from its
    /// parent mapping. Returns whether a removal actually occurred.
    ///
    /// Removing a sequence element is not supported (per spec §4.4, "removal
    /// of an array element is not required") and always returns `false`.
    pub fn remove(&mut self, path: &str) -> Result<bool, KvError> {
        let segments = path::parse(path)?;
        let Some((last, parent_segments)) = segments.split_last() else {
            return Ok(false);
        };
        let PathSegment::Key(key) = last else {
            return Ok(false);
        };
        let Some(parent) = select_segments_mut(&mut self.root, parent_segments) else {
            return Ok(false);
        };
        match parent.as_map_mut() {
            Some(map) => Ok(map.remove(key).is_some()),
            None => Ok(false),
        }
    }

    /// Pretty-printed JSON of the full tree.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.root.to_json()).unwrap_or_default()
    }

    /// Pretty-printed JSON of the subtree at `path`, or `"null"` if missing.
    pub fn to_json_at(&self, path: &str) -> String {
        let value = self.select(path).ok().flatten().cloned().unwrap_or(KvValue::Null);
        serde_json::to_string_pretty(&value.to_json()).unwrap_or_default()
    }

    /// YAML rendering of the full tree.
    pub fn to_yaml(&self) -> String {
        serde_yaml::to_string(&self.root.to_json()).unwrap_or_default()
    }

    /// YAML rendering of the subtree at `path`, or `"null\n"` if missing.
    pub fn to_yaml_at(&self, path: &str) -> String {
        let value = self.select(path).ok().flatten().cloned().unwrap_or(KvValue::Null);
        serde_yaml::to_string(&value.to_json()).unwrap_or_default()
    }
}

fn select_segments<'a>(root: &'a KvValue, segments: &[PathSegment]) -> Option<&'a KvValue> {
    let mut current = root;
    for segment in segments {
        current = match (segment, current) {
            (PathSegment::Key(k), KvValue::Map(m)) => m.get(k)?,
            (PathSegment::Index(i), KvValue::List(l)) => {
                let idx = usize::try_from(*i).ok()?;
                l.get(idx)?
            }
            _ => return None,
        };
    }
    Some(current)
}

fn select_segments_mut<'a>(
    root: &'a mut KvValue,
    segments: &[PathSegment],
) -> Option<&'a mut KvValue> {
    let mut current = root;
    for segment in segments {
        current = match (segment, current) {
            (PathSegment::Key(k), KvValue::Map(m)) => m.get_mut(k)?,
            (PathSegment::Index(i), KvValue::List(l)) => {
                let idx = usize::try_from(*i).ok()?;
                l.get_mut(idx)?
            }
            _ => return None,
        };
    }
    Some(current)
}

fn put_segments(root: &mut KvValue, segments: &[PathSegment], value: KvValue) -> Result<(), KvError> {
    let Some((last, rest)) = segments.split_last() else {
        return Ok(());
    };

    let mut current = root;
    let mut path_so_far = String::new();
    for segment in rest {
        match segment {
            PathSegment::Key(k) => {
                path_so_far.push_str(k);
                path_so_far.push('.');
                if current.is_null() {
                    *current = KvValue::empty_map();
                }
                let map = current.as_map_mut().ok_or_else(|| KvError::TypeConflict {
                    path: path_so_far.clone(),
                    expected: "map",
                    found: kind_name(current),
                })?;
                current = map.entry(k.clone()).or_insert(KvValue::Null);
            }
            PathSegment::Index(i) => {
                let idx = non_negative(*i).ok_or_else(|| KvError::TypeConflict {
                    path: path_so_far.clone(),
                    expected: "list",
                    found: "negative index",
                })?;
                if current.is_null() {
                    *current = KvValue::empty_list();
                }
                let list = current.as_list_mut().ok_or_else(|| KvError::TypeConflict {
                    path: path_so_far.clone(),
                    expected: "list",
                    found: kind_name(current),
                })?;
                grow(list, idx);
                current = &mut list[idx];
            }
        }
    }

    match last {
        PathSegment::Key(k) => {
            if current.is_null() {
                *current = KvValue::empty_map();
            }
            let map = current.as_map_mut().ok_or_else(|| KvError::TypeConflict {
                path: path_so_far.clone(),
                expected: "map",
                found: kind_name(current),
            })?;
            map.insert(k.clone(), value);
        }
        PathSegment::Index(i) => {
            let idx = non_negative(*i).ok_or_else(|| KvError::TypeConflict {
                path: path_so_far.clone(),
                expected: "list",
                found: "negative index",
            })?;
            if current.is_null() {
                *current = KvValue::empty_list();
            }
            let list = current.as_list_mut().ok_or_else(|| KvError::TypeConflict {
                path: path_so_far.clone(),
                expected: "list",
                found: kind_name(current),
            })?;
            grow(list, idx);
            list[idx] = value;
        }
    }
    Ok(())
}

fn non_negative(i: i64) -> Option<usize> {
    usize::try_from(i).ok()
}

fn grow(list: &mut Vec<KvValue>, idx: usize) {
    if idx >= list.len() {
        list.resize(idx + 1, KvValue::Null);
    }
}

fn kind_name(v: &KvValue) -> &'static str {
    match v {
        KvValue::Null => "null",
        KvValue::Bool(_) => "bool",
        KvValue::Int(_) => "int",
        KvValue::Float(_) => "float",
        KvValue::Str(_) => "string",
        KvValue::List(_) => "list",
        KvValue::Map(_) => "map",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn put_and_get_scalar_round_trips() {
        let mut state = KvState::new();
        state.put("workflow.retry", KvValue::from(3)).unwrap();
        assert_eq!(state.get_int("$.workflow.retry", 0), 3);
    }

    #[test]
    fn array_writes_pad_with_null() {
        let mut state = KvState::new();
        state.put("hosts[0]", KvValue::from("server1")).unwrap();
        state.put("hosts[1]", KvValue::from("server2")).unwrap();
        assert_eq!(state.get_string("$.hosts[1]", ""), "server2");
        assert!(!state.has("$.hosts[5]"));
    }

    #[test]
    fn missing_path_has_is_false() {
        let state = KvState::new();
        assert!(!state.has("nope.nope"));
        assert_eq!(state.get_int("nope.nope", 7), 7);
    }

    #[test]
    fn remove_then_has_returns_false() {
        let mut state = KvState::new();
        state.put("a.b", KvValue::from(1)).unwrap();
        assert!(state.has("a.b"));
        assert!(state.remove("a.b").unwrap());
        assert!(!state.has("a.b"));
    }

    #[test]
    fn remove_missing_returns_false() {
        let mut state = KvState::new();
        assert!(!state.remove("nope").unwrap());
    }

    #[test]
    fn negative_index_read_is_missing() {
        let mut state = KvState::new();
        state.put("hosts[0]", KvValue::from("server1")).unwrap();
        assert!(!state.has("hosts[-1]"));
        assert_eq!(state.get_string("hosts[-1]", "fallback"), "fallback");
    }

    #[test]
    fn negative_index_write_is_type_conflict() {
        let mut state = KvState::new();
        let err = state.put("hosts[-1]", KvValue::from("x")).unwrap_err();
        assert!(matches!(err, KvError::TypeConflict { .. }));
    }

    #[test]
    fn writing_map_over_scalar_is_type_conflict() {
        let mut state = KvState::new();
        state.put("a", KvValue::from(1)).unwrap();
        let err = state.put("a.b", KvValue::from(2)).unwrap_err();
        assert!(matches!(err, KvError::TypeConflict { .. }));
    }

    #[test]
    fn json_round_trip_of_full_tree() {
        let mut state = KvState::new();
        state.put("workflow.retry", KvValue::from(3)).unwrap();
        state.put("hosts[0]", KvValue::from("server1")).unwrap();
        let json = state.to_json();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["workflow"]["retry"], 3);
        assert_eq!(parsed["hosts"][0], "server1");
    }

    #[test]
    fn yaml_rendering_of_subtree() {
        let mut state = KvState::new();
        state.put("a.b", KvValue::from("v")).unwrap();
        let yaml = state.to_yaml_at("a");
        assert!(yaml.contains("b: v"));
    }
}
