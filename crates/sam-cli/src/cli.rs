//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Sound Asset Manager - Reconcile machine audio assets with their configs
#[derive(Parser, Debug)]
#[command(name = "sam")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the machine root folder
    #[arg(long, env = "SAM_MACHINE_PATH", global = true)]
    pub machine: Option<PathBuf>,

    /// Path to the source media folder
    #[arg(long, env = "SAM_SOURCE_PATH", global = true)]
    pub source: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Analyze configs, machine tree, and source media; print the plan
    /// without changing anything
    Parse {
        /// Re-walk the source media tree instead of using the cache
        #[arg(long)]
        refresh: bool,
    },

    /// Apply the remediation plan: prune orphans and duplicates, move
    /// misplaced files, copy missing files from the source media folder
    Update {
        /// Preview changes without applying them
        #[arg(long)]
        dry_run: bool,

        /// Treat every required file as absent and re-copy the collection
        #[arg(long)]
        force: bool,

        /// Re-walk the source media tree instead of using the cache
        #[arg(long)]
        refresh: bool,
    },

    /// Copy converted media back over their originals, keeping backups
    ImportConverted {
        /// Preview changes without applying them
        #[arg(long)]
        dry_run: bool,
    },

    /// Remove the cached source media index
    ClearCache,
}
