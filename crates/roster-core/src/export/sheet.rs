use rust_xlsxwriter::{Format, Workbook};
use serde_json::Value;

use super::{flat_columns, is_nested};
use crate::error::ExportError;
use crate::record::Record;

/// Excel caps sheet names at 31 characters.
const MAX_SHEET_NAME: usize = 31;

pub(super) fn encode(rows: &[&Record], stem: &str) -> Result<Vec<u8>, ExportError> {
    let columns = flat_columns(rows);
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name(stem))?;

    let bold = Format::new().set_bold();
    for (col, key) in (0u16..).zip(&columns) {
        worksheet.write_string_with_format(0, col, key, &bold)?;
    }

    for (row, record) in (1u32..).zip(rows) {
        for (col, key) in (0u16..).zip(&columns) {
            match record.get(key) {
                None | Some(Value::Null) => {}
                Some(v) if is_nested(v) => {}
                Some(Value::Number(n)) => match n.as_f64() {
                    Some(f) => {
                        worksheet.write_number(row, col, f)?;
                    }
                    None => {
                        worksheet.write_string(row, col, n.to_string())?;
                    }
                },
                Some(Value::Bool(b)) => {
                    worksheet.write_boolean(row, col, *b)?;
                }
                Some(Value::String(s)) => {
                    worksheet.write_string(row, col, s)?;
                }
                Some(_) => {}
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// A sheet name Excel accepts: no `[]:*?/\` and at most 31 characters.
fn sheet_name(stem: &str) -> String {
    let name: String = stem
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(MAX_SHEET_NAME)
        .collect();
    let name = name.trim_matches('\'').to_string();
    if name.is_empty() {
        "Sheet1".to_string()
    } else {
        name
    }
}
