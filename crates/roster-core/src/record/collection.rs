//! Ordered record collections.

use serde_json::Value;
use tracing::warn;

use super::Record;
use crate::types::RecordId;

/// The records of one resource, in server response order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    records: Vec<Record>,
}

impl Collection {
    /// Create a collection from records.
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// An empty collection.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a collection from a list response body.
    ///
    /// Anything other than a JSON array yields an empty collection. Array
    /// entries that are not objects are skipped. Neither case is an error.
    pub fn from_payload(payload: Value) -> Self {
        let Value::Array(items) = payload else {
            warn!(payload = %payload, "list response is not an array, using empty collection");
            return Self::empty();
        };

        let total = items.len();
        let records: Vec<Record> = items
            .into_iter()
            .filter_map(|item| Record::from_value(item).ok())
            .collect();

        if records.len() != total {
            warn!(
                skipped = total - records.len(),
                "list response contained non-object entries"
            );
        }

        Self { records }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over the records.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Borrow the records as a slice.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Position of the record with the given id.
    pub fn position(&self, id: &RecordId) -> Option<usize> {
        self.records
            .iter()
            .position(|r| r.id().as_ref() == Some(id))
    }

    /// Find a record by id.
    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.position(id).map(|i| &self.records[i])
    }

    /// Append a record.
    pub fn insert(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Replace the record with the same id in place, or append it.
    ///
    /// Returns `true` if an existing record was replaced.
    pub fn patch(&mut self, record: Record) -> bool {
        match record.id().and_then(|id| self.position(&id)) {
            Some(i) => {
                self.records[i] = record;
                true
            }
            None => {
                self.records.push(record);
                false
            }
        }
    }

    /// Remove the record with the given id.
    pub fn remove(&mut self, id: &RecordId) -> Option<Record> {
        self.position(id).map(|i| self.records.remove(i))
    }
}

impl FromIterator<Record> for Collection {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Collection {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn id(s: &str) -> RecordId {
        RecordId::new(s).unwrap()
    }

    #[test]
    fn array_payload_becomes_collection() {
        let c = Collection::from_payload(json!([{"_id": "a"}, {"_id": "b"}]));
        assert_eq!(c.len(), 2);
        assert_eq!(c.records()[1].id().unwrap().as_str(), "b");
    }

    #[test]
    fn malformed_payload_becomes_empty() {
        assert!(Collection::from_payload(json!({"error": "x"})).is_empty());
        assert!(Collection::from_payload(json!(null)).is_empty());
        assert!(Collection::from_payload(json!("oops")).is_empty());
    }

    #[test]
    fn non_object_entries_are_skipped() {
        let c = Collection::from_payload(json!([{"_id": "a"}, 7, "x", {"_id": "b"}]));
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn patch_replaces_in_place() {
        let mut c = Collection::from_payload(json!([
            {"_id": "a", "n": 1},
            {"_id": "b", "n": 2},
            {"_id": "c", "n": 3}
        ]));
        let updated = Record::from_value(json!({"_id": "b", "n": 20})).unwrap();
        assert!(c.patch(updated));
        assert_eq!(c.records()[1].get("n"), Some(&json!(20)));
        assert_eq!(c.len(), 3);
    }

    #[test]
    fn patch_appends_unknown_record() {
        let mut c = Collection::from_payload(json!([{"_id": "a"}]));
        let new = Record::from_value(json!({"_id": "z"})).unwrap();
        assert!(!c.patch(new));
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn remove_preserves_order() {
        let mut c = Collection::from_payload(json!([{"_id": "a"}, {"_id": "b"}, {"_id": "c"}]));
        assert!(c.remove(&id("b")).is_some());
        assert!(c.remove(&id("b")).is_none());
        let ids: Vec<_> = c.iter().map(|r| r.id().unwrap().to_string()).collect();
        assert_eq!(ids, ["a", "c"]);
    }
}
