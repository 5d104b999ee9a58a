//! Export command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use roster_core::export::export;
use roster_core::{ExportFormat, LoadOutcome, RecordStore, Resource};

use crate::output::{self, Reported};
use crate::session::require_session;

use super::interrupt_token;

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Resource to export
    pub resource: Resource,

    /// File format: csv, xlsx or docx
    #[arg(long, default_value = "csv")]
    pub format: ExportFormat,

    /// Only export records containing this text
    #[arg(long, short)]
    pub query: Option<String>,

    /// Output file (defaults to <resource>.<format> in the current directory)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

pub async fn run(args: ExportArgs) -> Result<()> {
    let session = require_session()?;
    let mut store = RecordStore::new(session, args.resource);

    match store.load(&interrupt_token()).await {
        LoadOutcome::Loaded { .. } => {}
        LoadOutcome::Degraded { notice } => {
            // Never write the export of a degraded load.
            output::notice(&notice);
            return Err(Reported.into());
        }
        LoadOutcome::Cancelled => anyhow::bail!("Cancelled"),
    }

    if let Some(query) = &args.query {
        store.table_mut().set_query(query);
    }

    let rows = store.filtered_rows();
    let artifact = export(&rows, args.resource.path(), args.format)
        .with_context(|| format!("Failed to export {}", args.resource))?;

    let path = args
        .output
        .unwrap_or_else(|| PathBuf::from(&artifact.file_name));
    std::fs::write(&path, &artifact.bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    output::success(&format!(
        "Exported {} records to {}",
        rows.len(),
        path.display()
    ));
    Ok(())
}
