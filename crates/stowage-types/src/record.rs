use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::value::Value;

// ---------------------------------------------------------------------------
// RecordValues
// ---------------------------------------------------------------------------

/// Column name to value mapping for one record.
///
/// Columns are kept sorted by name so that two records with the same content
/// always compare and serialize identically.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordValues {
    columns: BTreeMap<String, Value>,
}

impl RecordValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.put(column, value);
        self
    }

    /// Set a column, returning the previous value if any.
    pub fn put(&mut self, column: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.columns.insert(column.into(), value.into())
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }

    pub fn remove(&mut self, column: &str) -> Option<Value> {
        self.columns.remove(column)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterate columns in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Overwrite every column present in `other`, keeping the rest.
    pub fn merge(&mut self, other: &RecordValues) {
        for (column, value) in &other.columns {
            self.columns.insert(column.clone(), value.clone());
        }
    }

    /// Build a record from any serializable struct.
    ///
    /// The value must serialize to a JSON object; each top-level field
    /// becomes a column.
    pub fn from_serialize<S: Serialize + ?Sized>(value: &S) -> Result<Self, TypeError> {
        let json =
            serde_json::to_value(value).map_err(|e| TypeError::Serialization(e.to_string()))?;
        match json {
            serde_json::Value::Object(map) => Ok(Self {
                columns: map
                    .into_iter()
                    .map(|(k, v)| (k, Value::from_json(v)))
                    .collect(),
            }),
            other => Err(TypeError::NotARecord(json_kind(&other).to_string())),
        }
    }
}

impl FromIterator<(String, Value)> for RecordValues {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Row filter: a conjunction of column equality predicates.
///
/// An empty selection matches every row.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    predicates: Vec<(String, Value)>,
}

impl Selection {
    /// Matches all rows.
    pub fn all() -> Self {
        Self::default()
    }

    /// Matches rows where `column == value`.
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::all().and(column, value)
    }

    /// Add another equality predicate.
    pub fn and(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.predicates.push((column.into(), value.into()));
        self
    }

    pub fn is_all(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn predicates(&self) -> &[(String, Value)] {
        &self.predicates
    }

    /// Whether the record satisfies every predicate. A missing column only
    /// matches a `Null` predicate.
    pub fn matches(&self, record: &RecordValues) -> bool {
        self.predicates.iter().all(|(column, expected)| {
            match record.get(column) {
                Some(actual) => actual == expected,
                None => expected.is_null(),
            }
        })
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.predicates.is_empty() {
            return write!(f, "*");
        }
        for (i, (column, value)) in self.predicates.iter().enumerate() {
            if i > 0 {
                write!(f, " AND ")?;
            }
            write!(f, "{column} = {value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Tweet {
        id: i64,
        author: String,
        content: Option<String>,
    }

    #[test]
    fn from_serialize_flattens_fields() {
        let record = RecordValues::from_serialize(&Tweet {
            id: 3,
            author: "ann".into(),
            content: None,
        })
        .unwrap();
        assert_eq!(record.len(), 3);
        assert_eq!(record.get("id"), Some(&Value::Integer(3)));
        assert_eq!(record.get("author"), Some(&Value::Text("ann".into())));
        assert_eq!(record.get("content"), Some(&Value::Null));
    }

    #[test]
    fn from_serialize_rejects_non_objects() {
        let err = RecordValues::from_serialize(&vec![1, 2]).unwrap_err();
        assert_eq!(err, TypeError::NotARecord("array".into()));
    }

    #[test]
    fn merge_overwrites_present_columns_only() {
        let mut base = RecordValues::new().with("a", 1).with("b", 2);
        base.merge(&RecordValues::new().with("b", 20).with("c", 30));
        assert_eq!(base.get("a"), Some(&Value::Integer(1)));
        assert_eq!(base.get("b"), Some(&Value::Integer(20)));
        assert_eq!(base.get("c"), Some(&Value::Integer(30)));
    }

    #[test]
    fn selection_matching() {
        let record = RecordValues::new().with("id", 1).with("name", "x");
        assert!(Selection::all().matches(&record));
        assert!(Selection::eq("id", 1).matches(&record));
        assert!(!Selection::eq("id", 2).matches(&record));
        assert!(!Selection::eq("id", 1).and("name", "y").matches(&record));
        assert!(Selection::eq("missing", Value::Null).matches(&record));
        assert!(!Selection::eq("missing", 1).matches(&record));
    }

    #[test]
    fn selection_display() {
        assert_eq!(Selection::all().to_string(), "*");
        assert_eq!(
            Selection::eq("id", 1).and("name", "x").to_string(),
            "id = 1 AND name = 'x'"
        );
    }
}
