#![forbid(unsafe_code)]

mod commands;
mod connection;
mod db;
mod logger;

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use log::warn;
use unictl_controller::{Session, StoreError};

use crate::{
    commands::{completions::CompletionsCommand, login::LoginCommand, OnlineCommands},
    connection::Connection,
    db::Database,
};

#[derive(Parser)]
struct Cli {
    /// Location of the saved session.
    #[clap(long, env = "UNICTL_DATA_DIR")]
    data_dir: Option<PathBuf>,
    #[command(flatten)]
    connection: Connection,
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn exec(self) -> anyhow::Result<()> {
        let Self {
            data_dir,
            connection,
            command,
        } = self;
        let db = Database::open_or_create(data_dir)?;
        match command {
            Commands::Login(cmd) => cmd.exec(db, &connection).await?,
            Commands::Completions(cmd) => cmd.exec::<Self>()?,
            Commands::Online(cmd) => {
                let mut session = match Session::load(db) {
                    Ok(session) => session,
                    Err(StoreError::Missing) => {
                        bail!("No saved session, please run the login command")
                    }
                    Err(e) => return Err(e).context("Failed to load session"),
                };
                let client = connection.client(&session)?;
                let result = cmd.exec(&client, &connection.site).await;
                // The jar may hold a fresh session cookie even if the command failed.
                let saved = session.sync(&client).context("Failed to save session");
                command_outcome(result, saved)?
            }
        }
        Ok(())
    }
}

/// Combine the result of a command with that of saving the session afterwards.
///
/// The error of the command itself takes precedence; a save error is then only logged.
fn command_outcome(
    result: anyhow::Result<()>,
    saved: anyhow::Result<()>,
) -> anyhow::Result<()> {
    match (result, saved) {
        (Err(e), Err(save_error)) => {
            warn!("{save_error:#}");
            Err(e)
        }
        (Err(e), Ok(())) => Err(e),
        (Ok(()), saved) => saved,
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Verify and store credentials for a controller.
    Login(LoginCommand),
    #[command(flatten)]
    Online(OnlineCommands),
    /// Print a completion file for the given shell.
    ///
    /// Example: `unictl completions zsh | source /dev/stdin`.
    Completions(CompletionsCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut guard = logger::init();
    Cli::parse().exec().await?;
    guard.disarm();
    Ok(())
}
