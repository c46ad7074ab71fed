//! Sound Asset Manager CLI
//!
//! The command-line interface wiring resolved machine and source paths
//! into the reconciliation core.

mod cli;
mod commands;
mod context;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use context::Context;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
        tracing::debug!("Verbose mode enabled");
    }

    let Some(command) = cli.command else {
        println!("{} Sound Asset Manager CLI", "sam".green().bold());
        println!();
        println!("Run {} for available commands.", "sam --help".cyan());
        return Ok(());
    };

    let ctx = Context::resolve(cli.machine, cli.source)?;

    match command {
        Commands::Parse { refresh } => commands::run_parse(&ctx, refresh),
        Commands::Update {
            dry_run,
            force,
            refresh,
        } => commands::run_update(&ctx, dry_run, force, refresh),
        Commands::ImportConverted { dry_run } => commands::run_import_converted(&ctx, dry_run),
        Commands::ClearCache => commands::run_clear_cache(&ctx),
    }
}
