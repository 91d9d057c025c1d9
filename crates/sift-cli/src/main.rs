//! Sift CLI - seed a wiki index and search it as any user
//!
//! Items live in a local `SQLite` database; searches run through the same
//! engine a server would use, so visibility and domain permissions apply.

mod cli;
mod commands;
mod config;
mod error;

use clap::Parser;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::completions::run_completions;
use crate::commands::delete::run_delete;
use crate::commands::export::run_export;
use crate::commands::import::run_import;
use crate::commands::list::run_list;
use crate::commands::search::run_search;
use crate::config::CliConfig;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "sift=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Commands::Completions { shell, output } = &cli.command {
        return run_completions(*shell, output.as_deref());
    }

    let config = CliConfig::load(cli.config.as_deref())?;
    let db_path = config.resolve_db_path(cli.db_path);

    match cli.command {
        Commands::Add(args) => run_add(&args, &db_path)?,
        Commands::Import { path } => run_import(&path, &db_path)?,
        Commands::Export { output } => run_export(output.as_deref(), &db_path)?,
        Commands::List { tier, limit, json } => {
            run_list(tier.map(Into::into), limit, json, &config, &db_path)?;
        }
        Commands::Delete { id } => run_delete(&id, &db_path)?,
        Commands::Search(args) => run_search(&args, &config, &db_path).await?,
        Commands::Completions { .. } => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests;
