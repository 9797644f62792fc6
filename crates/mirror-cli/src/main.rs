//! docmirror
//!
//! Mirrors every space of a remote workspace service into a normalized
//! local file tree, once or on an interval.

mod cli;
mod commands;
mod error;
mod health;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    match cli.command {
        Some(Commands::Reconcile { dir, converge }) => {
            commands::run_reconcile(&dir, converge)?;
            Ok(())
        }
        Some(Commands::Translit { text }) => {
            commands::run_translit(&text);
            Ok(())
        }
        None => commands::run_service(&cli.service).await,
    }
}
