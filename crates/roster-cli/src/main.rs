//! roster - command-line client for the HR and fleet admin API.
//!
//! Every list screen of the dashboard is available as a subcommand over a
//! resource: list with a free-text filter and paging, view, create, update,
//! delete and export.

mod cli;
mod commands;
mod output;
mod session;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    let result = match cli.command {
        Commands::Login(args) => commands::login::run(args).await,
        Commands::Whoami(args) => commands::whoami::run(args).await,
        Commands::Logout(args) => commands::logout::run(args).await,
        Commands::List(args) => commands::list::run(args).await,
        Commands::Get(args) => commands::get::run(args).await,
        Commands::Create(args) => commands::create::run(args).await,
        Commands::Update(args) => commands::update::run(args).await,
        Commands::Delete(args) => commands::delete::run(args).await,
        Commands::Export(args) => commands::export::run(args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if !e.is::<output::Reported>() {
                output::error(&format!("{e:#}"));
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
