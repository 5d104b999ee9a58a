//! Export of a filtered view to CSV, XLSX or DOCX.

mod delimited;
mod docx;
mod sheet;

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::{Error, InvalidInputError};
use crate::record::Record;

/// Output format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
    Docx,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Csv, ExportFormat::Xlsx, ExportFormat::Docx];

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Docx => "docx",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            "docx" | "word" => Ok(ExportFormat::Docx),
            _ => Err(InvalidInputError::Other {
                message: format!("unknown export format '{s}'"),
            }
            .into()),
        }
    }
}

/// An exported file, ready to be written or downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// Encode `rows` as a file named `{stem}.{extension}`.
///
/// An empty `rows` is not an error; the file just has no data rows.
#[instrument(skip(rows), fields(rows = rows.len()))]
pub fn export(rows: &[&Record], stem: &str, format: ExportFormat) -> Result<Artifact, Error> {
    let bytes = match format {
        ExportFormat::Csv => delimited::encode(rows)?,
        ExportFormat::Xlsx => sheet::encode(rows, stem)?,
        ExportFormat::Docx => docx::encode(rows, stem)?,
    };

    debug!(bytes = bytes.len(), "Export encoded");
    Ok(Artifact {
        file_name: format!("{stem}.{}", format.extension()),
        mime: format.mime(),
        bytes,
    })
}

/// Spreadsheet columns: every key in first-seen order, minus keys that
/// only ever hold nested values.
pub(crate) fn flat_columns(rows: &[&Record]) -> Vec<String> {
    let mut columns: Vec<(String, bool)> = Vec::new();

    for record in rows {
        for (key, value) in record.fields() {
            let flat = !is_nested(value);
            match columns.iter_mut().find(|(name, _)| name == key) {
                Some((_, seen_flat)) => *seen_flat |= flat,
                None => columns.push((key.to_string(), flat)),
            }
        }
    }

    columns
        .into_iter()
        .filter_map(|(name, flat)| flat.then_some(name))
        .collect()
}

pub(crate) fn is_nested(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rec(value: Value) -> Record {
        Record::from_value(value).unwrap()
    }

    #[test]
    fn columns_union_in_first_seen_order() {
        let a = rec(json!({"_id": "1", "name": "Ama", "dept": {"_id": "d1"}}));
        let b = rec(json!({"_id": "2", "email": "k@x.com", "dept": "d2"}));
        let c = rec(json!({"_id": "3", "tags": ["a"]}));

        assert_eq!(
            flat_columns(&[&a, &b, &c]),
            vec!["_id", "name", "dept", "email"]
        );
    }

    #[test]
    fn artifact_naming() {
        let artifact = export(&[], "vehicles", ExportFormat::Csv).unwrap();
        assert_eq!(artifact.file_name, "vehicles.csv");
        assert_eq!(artifact.mime, "text/csv");
    }

    #[test]
    fn every_format_accepts_empty_rows() {
        for format in ExportFormat::ALL {
            let artifact = export(&[], "empty", format).unwrap();
            assert!(artifact.file_name.ends_with(format.extension()));
        }
    }

    #[test]
    fn parses_format_names() {
        assert_eq!("XLSX".parse::<ExportFormat>().unwrap(), ExportFormat::Xlsx);
        assert_eq!("word".parse::<ExportFormat>().unwrap(), ExportFormat::Docx);
        assert!("pdf".parse::<ExportFormat>().is_err());
    }
}
