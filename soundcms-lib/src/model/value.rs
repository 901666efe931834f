//! Value enum for dynamic field values

use std::fmt;

use chrono::DateTime;
use chrono::FixedOffset;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// A dynamic value that can hold any field type the admin backend returns.
///
/// # Type Mapping
///
/// | JSON | Rust Variant |
/// |------|--------------|
/// | null | `Null` |
/// | boolean | `Bool` |
/// | integer | `Int` |
/// | fractional number | `Float` |
/// | RFC 3339 string | `DateTime` |
/// | other string | `String` |
/// | array | `List` |
/// | object | `Json` |
///
/// # Example
///
/// ```
/// use soundcms_lib::model::Value;
///
/// let name = Value::from("Rain on leaves");
/// let duration = Value::from(182i64);
/// let premium = Value::from(true);
/// let empty = Value::Null;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    /// Null/empty value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// String value.
    String(String),
    /// Date and time, keeping the offset it arrived with.
    DateTime(DateTime<FixedOffset>),
    /// Ordered list of values (multi-select fields, id lists).
    List(Vec<Value>),
    /// Fallback for nested objects.
    Json(serde_json::Value),
}

impl Value {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` for null, empty strings and empty lists.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::List(items) => items.is_empty(),
            _ => false,
        }
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::DateTime(_) => "datetime",
            Value::List(_) => "list",
            Value::Json(_) => "json",
        }
    }

    /// Returns the string slice if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Key used to compare a value against option-set entries.
    ///
    /// Option values arrive as strings or integers depending on the module;
    /// both compare by their textual form.
    pub fn option_key(&self) -> Option<String> {
        match self {
            Value::String(s) => Some(s.clone()),
            Value::Int(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Converts a `serde_json::Value`, recognising RFC 3339 timestamps.
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(f) = n.as_f64() {
                    Value::Float(f)
                } else {
                    Value::Json(serde_json::Value::Number(n))
                }
            }
            serde_json::Value::String(s) => match DateTime::parse_from_rfc3339(&s) {
                Ok(dt) => Value::DateTime(dt),
                Err(_) => Value::String(s),
            },
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from_json).collect())
            }
            obj @ serde_json::Value::Object(_) => Value::Json(obj),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::String(s) => f.write_str(s),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            Value::List(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                f.write_str(&parts.join(", "))
            }
            Value::Json(json) => write!(f, "{}", json),
        }
    }
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(v: DateTime<FixedOffset>) -> Self {
        Value::DateTime(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v.fixed_offset())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        Value::from_json(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_recognises_timestamps() {
        let value = Value::from_json(serde_json::json!("2024-03-01T10:00:00Z"));
        assert_eq!(value.type_name(), "datetime");
        assert_eq!(value.to_string(), "2024-03-01 10:00:00");
    }

    #[test]
    fn test_timestamp_offset_survives_round_trip() {
        let value = Value::from_json(serde_json::json!("2024-03-01T18:00:00+08:00"));
        assert_eq!(value.to_string(), "2024-03-01 18:00:00");
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            serde_json::json!("2024-03-01T18:00:00+08:00")
        );
    }

    #[test]
    fn test_from_json_numbers() {
        assert_eq!(Value::from_json(serde_json::json!(7)), Value::Int(7));
        assert_eq!(Value::from_json(serde_json::json!(0.5)), Value::Float(0.5));
    }

    #[test]
    fn test_option_key() {
        assert_eq!(Value::from("ENABLED").option_key().as_deref(), Some("ENABLED"));
        assert_eq!(Value::from(3i64).option_key().as_deref(), Some("3"));
        assert_eq!(Value::Null.option_key(), None);
    }

    #[test]
    fn test_is_empty() {
        assert!(Value::Null.is_empty());
        assert!(Value::from("").is_empty());
        assert!(Value::List(vec![]).is_empty());
        assert!(!Value::from(0i64).is_empty());
    }
}
