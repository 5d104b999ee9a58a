//! Free-text filtering.

use crate::record::{Collection, Record, field_text};

/// Whether any field of `record` contains `needle`.
///
/// `needle` must already be lowercase. Field values are compared through
/// their display form, so nested objects match on their JSON text.
pub fn record_matches(record: &Record, needle: &str) -> bool {
    record
        .values()
        .any(|value| field_text(value).to_lowercase().contains(needle))
}

/// Records of `collection` with some field containing `query`, ignoring case.
///
/// Order is preserved. An empty query returns every record. A null field
/// has the text `""`, so no query matches it; in particular the query
/// `"null"` does not.
pub fn filter<'a>(collection: &'a Collection, query: &str) -> Vec<&'a Record> {
    if query.is_empty() {
        return collection.iter().collect();
    }

    let needle = query.to_lowercase();
    collection
        .iter()
        .filter(|record| record_matches(record, &needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::{Value, json};

    fn staff() -> Collection {
        Collection::from_payload(json!([
            {"_id": "1", "firstName": "Ama", "lastName": "Mensah", "age": 34},
            {"_id": "2", "firstName": "Kofi", "lastName": "Boateng", "department": {"name": "Fleet"}},
            {"_id": "3", "firstName": "Efua", "lastName": "AMANKWAH", "phone": null}
        ]))
    }

    fn ids(rows: &[&Record]) -> Vec<String> {
        rows.iter().map(|r| r.id().unwrap().to_string()).collect()
    }

    #[test]
    fn empty_query_is_identity() {
        let c = staff();
        assert_eq!(ids(&filter(&c, "")), ["1", "2", "3"]);
    }

    #[test]
    fn case_insensitive_across_fields() {
        let c = staff();
        assert_eq!(ids(&filter(&c, "ama")), ["1", "3"]);
        assert_eq!(ids(&filter(&c, "BOATENG")), ["2"]);
    }

    #[test]
    fn matches_numbers_and_nested_objects() {
        let c = staff();
        assert_eq!(ids(&filter(&c, "34")), ["1"]);
        assert_eq!(ids(&filter(&c, "fleet")), ["2"]);
    }

    #[test]
    fn null_fields_never_match() {
        let c = staff();
        assert!(filter(&c, "null").is_empty());
    }

    #[test]
    fn no_match_is_empty() {
        assert!(filter(&staff(), "zzz").is_empty());
    }

    fn arb_record() -> impl Strategy<Value = Value> {
        prop::collection::btree_map("[a-c]{1,2}", "[a-zA-Z ]{0,6}", 0..4).prop_map(|fields| {
            Value::Object(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Value::String(v)))
                    .collect(),
            )
        })
    }

    proptest! {
        #[test]
        fn filtered_view_is_ordered_subsequence(
            records in prop::collection::vec(arb_record(), 0..20),
            query in "[a-zA-Z]{0,2}",
        ) {
            let collection = Collection::from_payload(Value::Array(records));
            let view = filter(&collection, &query);

            // Every kept record matches.
            let needle = query.to_lowercase();
            for record in &view {
                prop_assert!(record_matches(record, &needle));
            }

            // Order-preserving subsequence: walk the collection once.
            let mut source = collection.iter();
            for kept in &view {
                prop_assert!(source.any(|r| std::ptr::eq(r, *kept)));
            }

            // Nothing that matches was dropped.
            let expected = collection.iter().filter(|r| record_matches(r, &needle)).count();
            prop_assert_eq!(view.len(), expected);
        }
    }
}
