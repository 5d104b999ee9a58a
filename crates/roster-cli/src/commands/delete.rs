//! Delete command implementation.

use anyhow::Result;
use clap::Args;

use roster_core::{ActionOutcome, Confirm, RecordId, RecordStore, Resource, RowAction, RowActionDispatcher};

use crate::output::{self, Reported, TerminalNotifier};
use crate::session::require_session;

use super::interrupt_token;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Resource the record belongs to
    pub resource: Resource,

    /// Record id
    pub id: RecordId,

    /// Do not ask for confirmation
    #[arg(long)]
    pub force: bool,
}

pub async fn run(args: DeleteArgs) -> Result<()> {
    let session = require_session()?;
    let mut store = RecordStore::new(session, args.resource);

    let notifier = TerminalNotifier;
    let always = |_: &str| true;
    let prompt = output::prompt_confirm;
    let confirm: &dyn Confirm = if args.force { &always } else { &prompt };
    let dispatcher = RowActionDispatcher::new(&notifier, confirm);

    match dispatcher
        .dispatch(&mut store, RowAction::Delete, &args.id, &interrupt_token())
        .await
    {
        ActionOutcome::Deleted { .. } => Ok(()),
        ActionOutcome::Declined => {
            output::info("Nothing deleted.");
            Ok(())
        }
        ActionOutcome::Cancelled => anyhow::bail!("Cancelled"),
        _ => Err(Reported.into()),
    }
}
