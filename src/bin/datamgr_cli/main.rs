//! datamgr-cli: command-line console for the data manager server.
//! Each subcommand stands in for one console form or lookup.
#![deny(clippy::all, clippy::pedantic)]

mod args;
mod client;
mod handlers;
mod io;
mod print;


use std::process::ExitCode;

use clap::Parser;

use args::{Cli, Commands};
use client::{CliError, build_ctx_from_cli};
use handlers::{credentials, jobs, service, tasks};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if !err.already_reported() {
                eprintln!("error: {err}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let ctx = build_ctx_from_cli(&cli)?;

    match cli.command {
        Commands::Generate { target, form } => jobs::generate(&ctx, &target, form).await,
        Commands::Migrate { service, form } => jobs::migrate(&ctx, &service, form).await,
        Commands::Migration { source, dest, form } => {
            jobs::legacy_migration(&ctx, &source, dest.as_deref(), form).await
        }
        Commands::Backup { service, form } => jobs::backup(&ctx, &service, form).await,
        Commands::Restore { service, form } => jobs::restore(&ctx, &service, form).await,
        Commands::Credentials(cmd) => credentials::handle(&ctx, cmd.action).await,
        Commands::Tasks(cmd) => tasks::handle(&ctx, cmd.action).await,
        Commands::Service(cmd) => service::handle(&ctx, cmd.action).await,
    }
}
