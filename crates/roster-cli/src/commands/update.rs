//! Update command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use roster_core::{
    FormEngine, FormSchema, RecordId, RefreshPolicy, Resource, Session,
};

use crate::output::TerminalNotifier;
use crate::session::require_session;

use super::{interrupt_token, load_schema, parse_field, report_submit};

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Resource the record belongs to
    pub resource: Resource,

    /// Record id
    pub id: RecordId,

    /// Changed field as key=value (repeatable)
    #[arg(long = "field", short = 'f', value_parser = parse_field)]
    pub fields: Vec<(String, String)>,

    /// JSON form schema; without one the form is shaped after the record
    #[arg(long)]
    pub schema: Option<PathBuf>,
}

pub async fn run(args: UpdateArgs) -> Result<()> {
    let session = require_session()?;
    let cancel = interrupt_token();

    let record = cancel
        .run(session.get(args.resource, &args.id))
        .await?
        .with_context(|| format!("Failed to fetch {} {}", args.resource.label(), args.id))?;

    let schema = match &args.schema {
        Some(path) => load_schema(path)?,
        None => FormSchema::infer(&record),
    };

    let form = FormEngine::for_record(args.resource, schema, &record)?;
    for (name, value) in args.fields {
        form.set(name, value);
    }

    let outcome = form
        .submit(&session, &TerminalNotifier, RefreshPolicy::Targeted, &cancel)
        .await;

    report_submit(outcome)
}
