//! The dynamic value type stored in a [`crate::kv::KvState`] tree.

// Layer 1: Standard library imports
use std::collections::BTreeMap;

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// Layer 3: Internal module imports
// (none)

/// A JSON-shaped dynamic value: the tagged union called for by the design
/// notes ("in a systems implementation this is a tagged union of
/// `{null, bool, int64, float64, string, list, map}`").
///
/// Maps use a [`BTreeMap`] so formatting (`to_json`/`to_yaml`) is
/// deterministic across runs, favoring reproducible output for
/// diffing/snapshotting over insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KvValue {
    /// Absence of a value (distinct from a missing path — see
    /// [`crate::kv::KvState::has`]).
    Null,
    /// A boolean scalar.
    Bool(bool),
    /// A 64-bit signed integer scalar.
    Int(i64),
    /// A 64-bit floating point scalar.
    Float(f64),
    /// A UTF-8 string scalar.
    Str(String),
    /// An ordered sequence of values.
    List(Vec<KvValue>),
    /// An ordered-by-key mapping of values.
    Map(BTreeMap<String, KvValue>),
}

impl KvValue {
    /// Construct an empty mapping node.
    pub fn empty_map() -> Self {
        Self::Map(BTreeMap::new())
    }

    /// Construct an empty sequence node.
    pub fn empty_list() -> Self {
        Self::List(Vec::new())
    }

    /// `true` for [`KvValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow this value as a mapping, if it is one.
    pub fn as_map(&self) -> Option<&BTreeMap<String, KvValue>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Mutably borrow this value as a mapping, if it is one.
    pub fn as_map_mut(&mut self) -> Option<&mut BTreeMap<String, KvValue>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Borrow this value as a sequence, if it is one.
    pub fn as_list(&self) -> Option<&Vec<KvValue>> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    /// Mutably borrow this value as a sequence, if it is one.
    pub fn as_list_mut(&mut self) -> Option<&mut Vec<KvValue>> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    /// Coerce to a `String`, falling back to `default` for missing/null
    /// values or values that cannot be represented as text.
    pub fn coerce_string(&self, default: impl Into<String>) -> String {
        match self {
            Self::Str(s) => s.clone(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Null | Self::List(_) | Self::Map(_) => default.into(),
        }
    }

    /// Coerce to an `i32`, falling back to `default` on missing/null/non-numeric.
    pub fn coerce_int(&self, default: i32) -> i32 {
        match self {
            Self::Int(i) => i32::try_from(*i).unwrap_or(default),
            Self::Float(f) => *f as i32,
            Self::Str(s) => s.parse().unwrap_or(default),
            Self::Bool(b) => i32::from(*b),
            Self::Null | Self::List(_) | Self::Map(_) => default,
        }
    }

    /// Coerce to an `i64`, falling back to `default` on missing/null/non-numeric.
    pub fn coerce_long(&self, default: i64) -> i64 {
        match self {
            Self::Int(i) => *i,
            Self::Float(f) => *f as i64,
            Self::Str(s) => s.parse().unwrap_or(default),
            Self::Bool(b) => i64::from(*b),
            Self::Null | Self::List(_) | Self::Map(_) => default,
        }
    }

    /// Coerce to an `f64`, falling back to `default` on missing/null/non-numeric.
    pub fn coerce_double(&self, default: f64) -> f64 {
        match self {
            Self::Int(i) => *i as f64,
            Self::Float(f) => *f,
            Self::Str(s) => s.parse().unwrap_or(default),
            Self::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Null | Self::List(_) | Self::Map(_) => default,
        }
    }

    /// Coerce to a `bool`, falling back to `default` on missing/null/non-boolean.
    pub fn coerce_bool(&self, default: bool) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Str(s) => match s.as_str() {
                "true" => true,
                "false" => false,
                _ => default,
            },
            Self::Int(i) => *i != 0,
            Self::Null | Self::Float(_) | Self::List(_) | Self::Map(_) => default,
        }
    }

    /// Convert to a `serde_json::Value` for pretty-printing or positional
    /// argument packing.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Null => JsonValue::Null,
            Self::Bool(b) => JsonValue::Bool(*b),
            Self::Int(i) => JsonValue::from(*i),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Self::Str(s) => JsonValue::String(s.clone()),
            Self::List(l) => JsonValue::Array(l.iter().map(KvValue::to_json).collect()),
            Self::Map(m) => {
                JsonValue::Object(m.iter().map(|(k, v)| (k.clone(), v.to_json())).collect())
            }
        }
    }

    /// Build a [`KvValue`] from a `serde_json::Value`.
    pub fn from_json(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Bool(b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else {
                    Self::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            JsonValue::String(s) => Self::Str(s),
            JsonValue::Array(a) => Self::List(a.into_iter().map(KvValue::from_json).collect()),
            JsonValue::Object(o) => {
                Self::Map(o.into_iter().map(|(k, v)| (k, KvValue::from_json(v))).collect())
            }
        }
    }
}

impl From<&str> for KvValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for KvValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for KvValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for KvValue {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for KvValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for KvValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}
