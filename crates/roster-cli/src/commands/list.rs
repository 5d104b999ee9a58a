//! List command implementation.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use roster_core::{LoadOutcome, Pagination, RecordStore, Resource};

use crate::output;
use crate::session::require_session;

use super::interrupt_token;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Resource to list (employees, vehicles, next-of-kin, ...)
    pub resource: Resource,

    /// Case-insensitive text that some field must contain
    #[arg(long, short)]
    pub query: Option<String>,

    /// Page to show, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page
    #[arg(long, default_value_t = Pagination::DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// Print the page as JSON lines instead of a table
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: ListArgs) -> Result<()> {
    let session = require_session()?;
    let mut store = RecordStore::with_page_size(session, args.resource, args.page_size);

    match store.load(&interrupt_token()).await {
        LoadOutcome::Cancelled => anyhow::bail!("Cancelled"),
        LoadOutcome::Degraded { notice } => output::notice(&notice),
        LoadOutcome::Loaded { count } => tracing::info!(count, "Loaded"),
    }

    let table = store.table_mut();
    if let Some(query) = &args.query {
        table.set_query(query);
    }
    table.set_page_index(args.page.saturating_sub(1));

    let rows = table.current_page_rows();

    if args.json {
        for record in &rows {
            output::json(record)?;
        }
        return Ok(());
    }

    if rows.is_empty() {
        eprintln!("{}", "No records found.".dimmed());
    } else {
        println!("{}", output::records_table(&rows));
    }

    eprintln!(
        "{}",
        format!(
            "Page {} of {} ({} matching of {} records)",
            table.page_index() + 1,
            table.page_count(),
            table.filtered_len(),
            table.collection().len()
        )
        .dimmed()
    );

    Ok(())
}
