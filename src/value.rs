//! Runtime values for filter criteria and row fields.
//!
//! A [`FilterValue`] is the comparison value carried by a filter statement,
//! and also the type a row-value source hands back for row-mode evaluation.
//! Values compare across the numeric variants (an `Int` can be ordered
//! against a `Float`), and every value has a truthiness used by the
//! `Truthy`/`Falsey` conditions.
//!
//! # Examples
//!
//! ```rust
//! use gridsieve::FilterValue;
//!
//! // Conversions from common Rust types
//! let v: FilterValue = 42.into();
//! assert!(matches!(v, FilterValue::Int(42)));
//!
//! let v: FilterValue = "hello".into();
//! assert!(v.is_truthy());
//!
//! // Cross-variant numeric ordering
//! use std::cmp::Ordering;
//! assert_eq!(FilterValue::Int(2).compare(&FilterValue::Float(2.5)), Some(Ordering::Less));
//!
//! // Incomparable pairs yield None
//! assert_eq!(FilterValue::Int(2).compare(&FilterValue::String("two".into())), None);
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A criterion or row-field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// String value.
    String(String),
    /// List of values.
    List(Vec<FilterValue>),
}

impl FilterValue {
    /// Check if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Truthiness of the value, as used by the `Truthy`/`Falsey` conditions.
    ///
    /// Null is falsey; numbers are truthy when non-zero; strings and lists
    /// are truthy when non-empty.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            Self::String(s) => !s.is_empty(),
            Self::List(l) => !l.is_empty(),
        }
    }

    /// Order this value against another.
    ///
    /// `Int` and `Float` compare numerically against each other; all other
    /// comparisons require matching variants. Returns `None` for
    /// incomparable pairs (mismatched variants, or a NaN float).
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Null, Self::Null) => Some(Ordering::Equal),
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Int(a), Self::Float(b)) => (*a as f64).partial_cmp(b),
            (Self::Float(a), Self::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Interpret the value as a non-negative integer, e.g. a page size or
    /// page number.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Int(i) => u64::try_from(*i).ok(),
            _ => None,
        }
    }
}

impl From<bool> for FilterValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for FilterValue {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<i64> for FilterValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u64> for FilterValue {
    fn from(v: u64) -> Self {
        Self::Int(v as i64)
    }
}

impl From<f64> for FilterValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl<T: Into<FilterValue>> From<Vec<T>> for FilterValue {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}

impl From<serde_json::Value> for FilterValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else {
                    Self::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(a) => Self::List(a.into_iter().map(Into::into).collect()),
            serde_json::Value::Object(_) => Self::Null,
        }
    }
}
