use std::fmt;

use serde::{Deserialize, Serialize};

/// A single column value held by a record.
///
/// The set of variants is intentionally close to what relational and
/// key-value backends can both store without interpretation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    /// Integers above `i64::MAX`. Smaller values are always [`Value::Integer`].
    Unsigned(u64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Convert a JSON value into a column value.
    ///
    /// Scalars map to their natural variant; integers stay exact. Arrays
    /// and objects have no column representation and are stored as compact
    /// JSON text.
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Integer(i)
                } else if let Some(u) = n.as_u64() {
                    Self::Unsigned(u)
                } else {
                    Self::Real(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Self::Text(s),
            nested @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => {
                Self::Text(nested.to_string())
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Unsigned(v) => write!(f, "{v}"),
            Self::Real(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "'{v}'"),
            Self::Blob(v) => write!(f, "<{} bytes>", v.len()),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        i64::try_from(v).map_or(Self::Unsigned(v), Self::Integer)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Blob(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_json_scalars() {
        assert_eq!(Value::from_json(serde_json::json!(null)), Value::Null);
        assert_eq!(Value::from_json(serde_json::json!(true)), Value::Bool(true));
        assert_eq!(Value::from_json(serde_json::json!(42)), Value::Integer(42));
        assert_eq!(Value::from_json(serde_json::json!(1.5)), Value::Real(1.5));
        assert_eq!(
            Value::from_json(serde_json::json!("hi")),
            Value::Text("hi".into())
        );
    }

    #[test]
    fn from_json_keeps_large_integers_exact() {
        let max = Value::from_json(serde_json::json!(u64::MAX));
        let below = Value::from_json(serde_json::json!(u64::MAX - 1));
        assert_eq!(max, Value::Unsigned(u64::MAX));
        assert_eq!(below, Value::Unsigned(u64::MAX - 1));
        assert_ne!(max, below);
        assert_eq!(
            Value::from_json(serde_json::json!(i64::MAX as u64)),
            Value::Integer(i64::MAX)
        );
    }

    #[test]
    fn from_u64_matches_from_json() {
        assert_eq!(Value::from(7u64), Value::from_json(serde_json::json!(7u64)));
        assert_eq!(
            Value::from(u64::MAX),
            Value::from_json(serde_json::json!(u64::MAX))
        );
        assert_eq!(Value::from(u64::MAX).to_string(), u64::MAX.to_string());
    }

    #[test]
    fn from_json_nested_becomes_text() {
        let v = Value::from_json(serde_json::json!({"a": [1, 2]}));
        assert_eq!(v, Value::Text(r#"{"a":[1,2]}"#.into()));
    }

    #[test]
    fn option_maps_none_to_null() {
        assert!(Value::from(None::<i64>).is_null());
        assert_eq!(Value::from(Some("x")), Value::Text("x".into()));
    }

    #[test]
    fn display() {
        assert_eq!(Value::Text("a".into()).to_string(), "'a'");
        assert_eq!(Value::Blob(vec![1, 2, 3]).to_string(), "<3 bytes>");
        assert_eq!(Value::Null.to_string(), "NULL");
    }

    #[test]
    fn serde_tagged_representation() {
        let json = serde_json::to_string(&Value::Integer(7)).unwrap();
        assert_eq!(json, r#"{"type":"integer","value":7}"#);
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Value::Integer(7));
    }
}
