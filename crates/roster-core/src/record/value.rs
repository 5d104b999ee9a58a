//! The untyped record type.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::EntityRef;
use crate::error::{Error, InvalidInputError};
use crate::types::RecordId;

/// Field names probed, in order, for the server-assigned identifier.
const ID_FIELDS: [&str; 2] = ["_id", "id"];

/// One entity instance as returned by the API.
///
/// A record is a JSON object. Foreign references appear either as an id
/// string or as an already-populated nested object; use
/// [`Record::reference`] to read them uniformly.
///
/// # Example
///
/// ```
/// use roster_core::Record;
/// use serde_json::json;
///
/// let record = Record::from_value(json!({
///     "_id": "abc123",
///     "firstName": "Ama",
///     "department": {"_id": "d1", "name": "Fleet"}
/// })).unwrap();
///
/// assert_eq!(record.id().unwrap().as_str(), "abc123");
/// assert_eq!(record.reference("department").unwrap().label("name"), "Fleet");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Wrap an existing JSON map.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Create a record from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a JSON object.
    pub fn from_value(value: Value) -> Result<Self, Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(InvalidInputError::Record {
                reason: format!("expected a JSON object, got {}", json_type(&other)),
            }
            .into()),
        }
    }

    /// Returns the server-assigned identifier, if present and well-formed.
    ///
    /// Numeric identifiers are accepted and stringified.
    pub fn id(&self) -> Option<RecordId> {
        ID_FIELDS.iter().find_map(|key| match self.0.get(*key) {
            Some(Value::String(s)) => RecordId::new(s.as_str()).ok(),
            Some(Value::Number(n)) => RecordId::new(n.to_string()).ok(),
            _ => None,
        })
    }

    /// Get a field value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Set a field value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// Read a foreign reference stored as either an id or a nested object.
    pub fn reference(&self, key: &str) -> Option<EntityRef> {
        self.0.get(key).and_then(EntityRef::from_value)
    }

    /// Iterate over field names in stored order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterate over field values in stored order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.0.values()
    }

    /// Iterate over `(name, value)` pairs.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume and return the record as a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// String form of a field value as shown in tables and documents.
///
/// Strings are returned as-is, null is empty, scalars use their JSON
/// spelling and nested arrays or objects are rendered as compact JSON.
pub fn field_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Null => Cow::Borrowed(""),
        Value::Bool(b) => Cow::Owned(b.to_string()),
        Value::Number(n) => Cow::Owned(n.to_string()),
        Value::Array(_) | Value::Object(_) => Cow::Owned(value.to_string()),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_non_objects() {
        assert!(Record::from_value(json!([1, 2])).is_err());
        assert!(Record::from_value(json!("x")).is_err());
    }

    #[test]
    fn id_prefers_underscore_id() {
        let record = Record::from_value(json!({"_id": "a1", "id": "b2"})).unwrap();
        assert_eq!(record.id().unwrap().as_str(), "a1");
    }

    #[test]
    fn numeric_id_is_stringified() {
        let record = Record::from_value(json!({"id": 42})).unwrap();
        assert_eq!(record.id().unwrap().as_str(), "42");
    }

    #[test]
    fn missing_id() {
        let record = Record::from_value(json!({"name": "Fleet"})).unwrap();
        assert!(record.id().is_none());
    }

    #[test]
    fn field_text_forms() {
        assert_eq!(field_text(&json!("Ama")), "Ama");
        assert_eq!(field_text(&json!(null)), "");
        assert_eq!(field_text(&json!(3.5)), "3.5");
        assert_eq!(field_text(&json!(true)), "true");
        assert_eq!(field_text(&json!({"a": 1})), r#"{"a":1}"#);
    }
}
