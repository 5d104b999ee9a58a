//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::{create, delete, export, get, list, login, logout, update, whoami};

/// Browse and edit HR and fleet records.
#[derive(Parser, Debug)]
#[command(name = "roster")]
#[command(author, version = env!("ROSTER_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the session
    Login(login::LoginArgs),

    /// Display the stored session
    Whoami(whoami::WhoamiArgs),

    /// Forget the stored session
    Logout(logout::LogoutArgs),

    /// List records of a resource as a table
    List(list::ListArgs),

    /// Show one record, or the link to its document
    Get(get::GetArgs),

    /// Create a record
    Create(create::CreateArgs),

    /// Update a record
    Update(update::UpdateArgs),

    /// Delete a record
    Delete(delete::DeleteArgs),

    /// Export the (filtered) records of a resource to a file
    Export(export::ExportArgs),
}
