//! Get command implementation.

use anyhow::Result;
use clap::Args;

use roster_core::{ActionOutcome, RecordId, RecordStore, Resource, RowAction, RowActionDispatcher};

use crate::output::{self, Reported, TerminalNotifier};
use crate::session::require_session;

use super::interrupt_token;

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Resource the record belongs to
    pub resource: Resource,

    /// Record id
    pub id: RecordId,

    /// Print the link to the record's attached document instead
    #[arg(long)]
    pub document: bool,

    /// Print compact JSON
    #[arg(long)]
    pub compact: bool,
}

pub async fn run(args: GetArgs) -> Result<()> {
    let session = require_session()?;
    let mut store = RecordStore::new(session, args.resource);

    let notifier = TerminalNotifier;
    let never = |_: &str| false;
    let dispatcher = RowActionDispatcher::new(&notifier, &never);

    let action = if args.document {
        RowAction::Download
    } else {
        RowAction::ViewDetails
    };

    match dispatcher
        .dispatch(&mut store, action, &args.id, &interrupt_token())
        .await
    {
        ActionOutcome::Record(record) if args.compact => output::json(&record),
        ActionOutcome::Record(record) => output::json_pretty(&record),
        ActionOutcome::Document { url, .. } => {
            println!("{url}");
            Ok(())
        }
        ActionOutcome::Cancelled => anyhow::bail!("Cancelled"),
        _ => Err(Reported.into()),
    }
}
