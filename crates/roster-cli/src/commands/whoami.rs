//! Whoami command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::output;
use crate::session::storage;

#[derive(Args, Debug)]
pub struct WhoamiArgs {
    /// Print the stored user as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: WhoamiArgs) -> Result<()> {
    let stored = storage::load_session()
        .context("Failed to load session")?
        .context("No active session. Run 'roster login' first.")?;

    if args.json {
        return output::json_pretty(&stored.user);
    }

    output::field("API", &stored.api);
    if let Some(user) = &stored.user {
        for key in ["name", "email", "role"] {
            if let Some(value) = user[key].as_str() {
                output::field(key, value);
            }
        }
    }
    output::field(
        "Logged in",
        &stored.logged_in_at.format("%Y-%m-%d %H:%M UTC").to_string(),
    );

    Ok(())
}
