//! Literal values accepted by the builder.

use crate::error::{SqlishError, SqlishResult};
use crate::ident::is_qualified_column;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::fmt;

/// A native value to be encoded as a SQL literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `NULL`
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Integer, emitted unquoted.
    Int(i64),
    /// Float, emitted unquoted.
    Float(f64),
    /// Text, escaped and double quoted.
    Text(String),
    /// An instant; rendered in local time unless the builder uses UTC.
    DateTime(DateTime<Utc>),
    /// A wall-clock date/time, rendered as-is.
    Naive(NaiveDateTime),
    /// A `table.column` reference, emitted unquoted.
    Column(String),
}

impl Value {
    /// Create a column reference.
    ///
    /// The reference must be `table.column`: exactly one period with a plain
    /// identifier on each side.
    pub fn column(reference: impl Into<String>) -> SqlishResult<Self> {
        let reference = reference.into();
        if is_qualified_column(&reference) {
            Ok(Value::Column(reference))
        } else {
            Err(SqlishError::injection(reference))
        }
    }

    /// Returns `true` for `Value::Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The text content, if this is a `Value::Text`.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Convert a JSON scalar into a value.
    ///
    /// Arrays and objects have no literal form and fail with an injection
    /// error naming the input.
    pub fn from_json(json: &serde_json::Value) -> SqlishResult<Self> {
        match json {
            serde_json::Value::Null => Ok(Value::Null),
            serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::Int(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Value::Float(f))
                } else {
                    Err(SqlishError::injection(n.to_string()))
                }
            }
            serde_json::Value::String(s) => Ok(Value::Text(s.clone())),
            other => Err(SqlishError::injection(other.to_string())),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => f.write_str(s),
            Value::DateTime(d) => write!(f, "{d}"),
            Value::Naive(d) => write!(f, "{d}"),
            Value::Column(c) => f.write_str(c),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Int(i64::from(v))
            }
        })*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Naive(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Naive(v.and_time(chrono::NaiveTime::MIN))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Convert a JSON object into ordered `(column, value)` pairs.
///
/// Key order is the object's insertion order.
pub fn row_from_json(json: &serde_json::Value) -> SqlishResult<Vec<(String, Value)>> {
    let serde_json::Value::Object(map) = json else {
        return Err(SqlishError::injection(json.to_string()));
    };
    map.iter()
        .map(|(k, v)| Ok((k.clone(), Value::from_json(v)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn column_reference_must_be_qualified() {
        assert_eq!(Value::column("test.id").unwrap(), Value::Column("test.id".into()));
        assert!(Value::column("id").unwrap_err().is_injection());
        assert!(Value::column("a.b;DROP").unwrap_err().is_injection());
    }

    #[test]
    fn json_scalars() {
        assert_eq!(Value::from_json(&json!(null)).unwrap(), Value::Null);
        assert_eq!(Value::from_json(&json!(3)).unwrap(), Value::Int(3));
        assert_eq!(Value::from_json(&json!(1.5)).unwrap(), Value::Float(1.5));
        assert_eq!(Value::from_json(&json!("x")).unwrap(), Value::Text("x".into()));
    }

    #[test]
    fn json_containers_are_rejected_with_input() {
        let err = Value::from_json(&json!({"a": 1})).unwrap_err();
        assert!(err.is_injection());
        assert!(err.to_string().contains(r#"{"a":1}"#));
    }

    #[test]
    fn row_keeps_key_order() {
        let row = row_from_json(&json!({"id": 1, "name": "Fred", "email": "fred@example.com"})).unwrap();
        let keys: Vec<_> = row.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["id", "name", "email"]);
    }

    #[test]
    fn option_maps_to_null() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some("a")), Value::Text("a".into()));
    }
}
