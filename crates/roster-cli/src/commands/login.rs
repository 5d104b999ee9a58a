//! Login command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use roster_core::{ApiUrl, Backend, Credentials};
use roster_http::HttpBackend;

use crate::output;
use crate::session::StoredSession;
use crate::session::storage;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long, env = "ROSTER_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// API base URL
    #[arg(long, env = "ROSTER_API_URL")]
    pub api: String,
}

pub async fn run(args: LoginArgs) -> Result<()> {
    let api = ApiUrl::new(&args.api).context("Invalid API URL")?;
    let credentials = Credentials::new(&args.email, &args.password);

    eprintln!("{}", "Logging in...".dimmed());

    let backend = HttpBackend::new(api)?;
    let session = backend.login(credentials).await.context("Failed to login")?;

    let stored = StoredSession::capture(&session);
    storage::save_session(&stored).context("Failed to save session")?;

    output::success("Logged in successfully");
    println!();
    output::field("API", &stored.api);
    if let Some(email) = stored.user.as_ref().and_then(|u| u["email"].as_str()) {
        output::field("User", email);
    }

    Ok(())
}
