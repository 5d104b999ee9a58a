//! Output formatting helpers.

use std::fmt;
use std::io::{self, BufRead, Write};

use anyhow::Result;
use colored::Colorize;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use serde::Serialize;
use serde_json::Value;

use roster_core::record::field_text;
use roster_core::{Notice, NoticeLevel, Notifier, Record};

/// Longest cell text shown in a table before it is cut.
const MAX_CELL_WIDTH: usize = 40;

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a secondary message.
pub fn info(msg: &str) {
    eprintln!("{}", msg.dimmed());
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print a value as compact JSON.
pub fn json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    println!("{}", json);
    Ok(())
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Print a notice with the marker for its level.
pub fn notice(notice: &Notice) {
    match notice.level {
        NoticeLevel::Success => success(&notice.message),
        NoticeLevel::Info => info(&notice.message),
        NoticeLevel::Error => error(&notice.message),
    }
}

/// Prints notices as they are raised.
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, n: Notice) {
        notice(&n);
    }
}

/// Ask a yes/no question on stderr. Anything but `y`/`yes` is a no.
pub fn prompt_confirm(prompt: &str) -> bool {
    eprint!("{} [y/N] ", prompt);
    if io::stderr().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

/// Render records as a table. Columns are the keys in first-seen order.
pub fn records_table(rows: &[&Record]) -> Table {
    let mut columns: Vec<&str> = Vec::new();
    for record in rows {
        for key in record.keys() {
            if !columns.contains(&key) {
                columns.push(key);
            }
        }
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            columns
                .iter()
                .map(|c| Cell::new(c).add_attribute(Attribute::Bold)),
        );

    for record in rows {
        table.add_row(columns.iter().map(|key| {
            let text = record.get(key).map(cell_text).unwrap_or_default();
            Cell::new(text)
        }));
    }

    table
}

fn cell_text(value: &Value) -> String {
    let text = field_text(value);
    if text.chars().count() > MAX_CELL_WIDTH {
        let cut: String = text.chars().take(MAX_CELL_WIDTH - 1).collect();
        format!("{cut}…")
    } else {
        text.into_owned()
    }
}

/// Marks a failure whose message was already printed as a notice.
#[derive(Debug)]
pub struct Reported;

impl fmt::Display for Reported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("failure already reported")
    }
}

impl std::error::Error for Reported {}
