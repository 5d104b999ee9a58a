//! Tagged foreign references.

use serde_json::Value;

use super::{Collection, Record, field_text};
use crate::types::RecordId;

/// A reference to another entity.
///
/// The API sometimes sends a bare id and sometimes the populated object.
/// Both shapes normalize to this type, which carries the id and, when
/// known, the resolved record.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRef {
    id: RecordId,
    resolved: Option<Record>,
}

impl EntityRef {
    /// Reference by id only.
    pub fn unresolved(id: RecordId) -> Self {
        Self { id, resolved: None }
    }

    /// Read a reference from a field value.
    ///
    /// Returns `None` for null, empty strings, objects without an id and
    /// any other shape that cannot name a record.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => RecordId::new(s.as_str()).ok().map(Self::unresolved),
            Value::Number(n) => RecordId::new(n.to_string()).ok().map(Self::unresolved),
            Value::Object(map) => {
                let record = Record::new(map.clone());
                let id = record.id()?;
                Some(Self {
                    id,
                    resolved: Some(record),
                })
            }
            _ => None,
        }
    }

    /// The referenced id.
    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// The populated record, if known.
    pub fn resolved(&self) -> Option<&Record> {
        self.resolved.as_ref()
    }

    /// Whether the populated record is known.
    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }

    /// Fill in the populated record from a collection of candidates.
    ///
    /// Returns `true` if the reference is resolved afterwards.
    pub fn resolve_in(&mut self, candidates: &Collection) -> bool {
        if self.resolved.is_none() {
            self.resolved = candidates.get(&self.id).cloned();
        }
        self.resolved.is_some()
    }

    /// Display label: the given field of the resolved record, or the id.
    pub fn label(&self, field: &str) -> String {
        self.resolved
            .as_ref()
            .and_then(|r| r.get(field))
            .map(|v| field_text(v).into_owned())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.id.to_string())
    }
}
