//! Documents, filters and update conditions.

use crate::DbError;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

/// A stored document: a JSON object.
pub type Document = serde_json::Map<String, Value>;

/// Serialize a value into a document. The value must serialize as an object.
pub fn to_document<T: Serialize>(value: &T) -> Result<Document, DbError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(DbError::Serialization(serde::ser::Error::custom(format!(
            "expected a JSON object, got {}",
            kind_of(&other)
        )))),
    }
}

/// Deserialize a document into a typed value.
pub fn from_document<T: DeserializeOwned>(doc: Document) -> Result<T, DbError> {
    Ok(serde_json::from_value(Value::Object(doc))?)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Read-side predicate over documents.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Field equals the given value.
    Eq { field: String, value: Value },
    /// String field contains the given substring.
    Contains { field: String, needle: String },
}

impl Filter {
    /// Field equality.
    pub fn field_eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Substring match on a string field.
    pub fn field_contains(field: impl Into<String>, needle: impl Into<String>) -> Self {
        Filter::Contains {
            field: field.into(),
            needle: needle.into(),
        }
    }

    /// Check whether a document matches.
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Filter::Eq { field, value } => doc.get(field) == Some(value),
            Filter::Contains { field, needle } => doc
                .get(field)
                .and_then(Value::as_str)
                .is_some_and(|s| s.contains(needle.as_str())),
        }
    }
}

/// Precondition for [`crate::DocumentStore::update_if`]: apply only while
/// `field` holds one of `values`.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    field: String,
    values: Vec<Value>,
}

impl Condition {
    /// Guard on a field being one of the given values.
    pub fn field_in<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Condition {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Evaluate against the current document.
    pub fn holds(&self, doc: &Document) -> bool {
        doc.get(&self.field)
            .is_some_and(|current| self.values.contains(current))
    }
}

/// Result of a conditional update.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionalUpdate {
    /// The condition held; carries the document after the write.
    Applied(Document),
    /// The condition failed; carries the unchanged current document.
    Rejected(Document),
    /// No document with that id.
    Missing,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_filter_eq_and_contains() {
        let d = doc(json!({"email": "a@x.ma", "phone": "0612345678"}));
        assert!(Filter::field_eq("email", "a@x.ma").matches(&d));
        assert!(!Filter::field_eq("email", "b@x.ma").matches(&d));
        assert!(Filter::field_contains("phone", "2345").matches(&d));
        assert!(!Filter::field_contains("email", "2345").matches(&d));
    }

    #[test]
    fn test_contains_ignores_non_string_fields() {
        let d = doc(json!({"total": 300}));
        assert!(!Filter::field_contains("total", "3").matches(&d));
    }

    #[test]
    fn test_condition_field_in() {
        let d = doc(json!({"status": "pending"}));
        assert!(Condition::field_in("status", ["pending", "processing"]).holds(&d));
        assert!(!Condition::field_in("status", ["shipped"]).holds(&d));
        assert!(!Condition::field_in("missing", ["pending"]).holds(&d));
        assert!(!Condition::field_in("status", Vec::<String>::new()).holds(&d));
    }

    #[test]
    fn test_to_document_rejects_scalars() {
        assert!(to_document(&42).is_err());
        let d = to_document(&json!({"a": 1})).unwrap();
        assert_eq!(d.get("a"), Some(&json!(1)));
    }
}
