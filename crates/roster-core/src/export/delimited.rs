use serde_json::Value;

use super::{flat_columns, is_nested};
use crate::error::ExportError;
use crate::record::Record;

pub(super) fn encode(rows: &[&Record]) -> Result<Vec<u8>, ExportError> {
    let columns = flat_columns(rows);
    let mut writer = csv::Writer::from_writer(Vec::new());

    if !columns.is_empty() {
        writer.write_record(&columns)?;
    }

    for record in rows {
        writer.write_record(columns.iter().map(|key| cell(record.get(key))))?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(v) if is_nested(v) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(v) => v.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_back_to_scalar_values() {
        let a = Record::from_value(json!({
            "_id": "e1",
            "name": "Ama, Serwaa",
            "salary": 2500,
            "active": true,
            "manager": null
        }))
        .unwrap();
        let b = Record::from_value(json!({
            "_id": "e2",
            "name": "Kofi \"KB\" Boateng",
            "department": {"_id": "d1"}
        }))
        .unwrap();

        let bytes = encode(&[&a, &b]).unwrap();
        let mut reader = csv::Reader::from_reader(bytes.as_slice());

        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, vec!["_id", "name", "salary", "active", "manager"]);

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "Ama, Serwaa");
        assert_eq!(&rows[0][2], "2500");
        assert_eq!(&rows[0][3], "true");
        assert_eq!(&rows[0][4], "");
        assert_eq!(&rows[1][1], "Kofi \"KB\" Boateng");
        assert_eq!(&rows[1][2], "");
    }

    #[test]
    fn nested_value_in_kept_column_is_blank() {
        let a = Record::from_value(json!({"_id": "v1", "brand": "b1"})).unwrap();
        let b = Record::from_value(json!({"_id": "v2", "brand": {"_id": "b2"}})).unwrap();

        let bytes = encode(&[&a, &b]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "_id,brand\nv1,b1\nv2,\n");
    }

    #[test]
    fn empty_rows_produce_empty_file() {
        assert!(encode(&[]).unwrap().is_empty());
    }
}
