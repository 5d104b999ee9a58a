//! Subcommand implementations.

pub mod create;
pub mod delete;
pub mod export;
pub mod get;
pub mod list;
pub mod login;
pub mod logout;
pub mod update;
pub mod whoami;

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use roster_core::{CancelHandle, CancelToken, FormSchema, StoreUpdate, SubmitOutcome};

use crate::output::{self, Reported};

/// A token that is cancelled when the user presses Ctrl-C.
pub fn interrupt_token() -> CancelToken {
    let handle = CancelHandle::new();
    let token = handle.token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::debug!("Interrupted");
            handle.cancel();
        }
    });
    token
}

/// Parse a `key=value` argument.
pub fn parse_field(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing field name in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Read a form schema from a JSON file.
pub fn load_schema(path: &Path) -> Result<FormSchema> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema {}", path.display()))?;
    FormSchema::from_json(&json).context("Invalid form schema")
}

/// Print the result of a form submission and turn failures into errors.
pub fn report_submit(outcome: SubmitOutcome) -> Result<()> {
    match outcome {
        SubmitOutcome::Saved { update } => {
            match update {
                StoreUpdate::Inserted(record) | StoreUpdate::Patched(record) => {
                    if let Some(id) = record.id() {
                        output::field("ID", id.as_str());
                    }
                    output::json_pretty(&record)?;
                }
                _ => output::info("The server did not return the saved record."),
            }
            Ok(())
        }
        SubmitOutcome::Invalid { errors } => {
            for (field, message) in &errors {
                eprintln!("  {} {}", format!("{field}:").yellow(), message);
            }
            Err(Reported.into())
        }
        SubmitOutcome::Failed { .. } => Err(Reported.into()),
        SubmitOutcome::Cancelled => anyhow::bail!("Cancelled"),
        SubmitOutcome::InFlight | SubmitOutcome::AlreadySubmitted => {
            anyhow::bail!("A submission of this form already went through")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fields() {
        assert_eq!(
            parse_field("firstName=Ama").unwrap(),
            ("firstName".to_string(), "Ama".to_string())
        );
        assert_eq!(
            parse_field("note=a=b").unwrap(),
            ("note".to_string(), "a=b".to_string())
        );
        assert_eq!(parse_field("empty=").unwrap().1, "");
        assert!(parse_field("novalue").is_err());
        assert!(parse_field("=x").is_err());
    }
}
