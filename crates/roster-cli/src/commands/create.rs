//! Create command implementation.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use roster_core::{FormEngine, FormMode, FormSchema, RefreshPolicy, Resource};

use crate::output::TerminalNotifier;
use crate::session::require_session;

use super::{interrupt_token, load_schema, parse_field, report_submit};

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Resource to create a record in
    pub resource: Resource,

    /// Field value as key=value (repeatable)
    #[arg(long = "field", short = 'f', value_parser = parse_field)]
    pub fields: Vec<(String, String)>,

    /// JSON form schema with field kinds and validation rules
    #[arg(long)]
    pub schema: Option<PathBuf>,
}

pub async fn run(args: CreateArgs) -> Result<()> {
    let session = require_session()?;

    let schema = match &args.schema {
        Some(path) => load_schema(path)?,
        None => FormSchema::new(Vec::new())?,
    };

    let form = FormEngine::new(args.resource, schema, FormMode::Create);
    for (name, value) in args.fields {
        form.set(name, value);
    }

    let outcome = form
        .submit(
            &session,
            &TerminalNotifier,
            RefreshPolicy::Targeted,
            &interrupt_token(),
        )
        .await;

    report_submit(outcome)
}
