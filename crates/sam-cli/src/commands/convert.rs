//! Import-converted command: bring resampled media back into mode folders.

use colored::Colorize;

use sam_core::{PlanExecutor, ReconciliationEngine};
use sam_fs::FileTreeIndex;

use crate::context::Context;
use crate::error::Result;

/// Run the import-converted command
///
/// Indexes the converted-media staging directory and copies each converted
/// file over its machine-tree counterpart, renaming the existing file to
/// its backup name first. Originals are never deleted.
pub fn run_import_converted(ctx: &Context, dry_run: bool) -> Result<()> {
    let converted_dir = ctx.layout().resample_converted();
    if !converted_dir.is_dir() {
        println!(
            "{} No converted media found at {}.",
            "OK".green().bold(),
            converted_dir
        );
        return Ok(());
    }

    println!(
        "{} Importing converted media{}...",
        "=>".blue().bold(),
        if dry_run { " (dry run)" } else { "" }
    );

    let requirements = ctx.requirement_index()?;
    let machine = ctx.machine_index()?;
    let source = ctx.source_index(false)?;
    let converted = FileTreeIndex::build(&converted_dir, &[])?;

    let engine = ReconciliationEngine::new(ctx.machine_root().clone());
    let plan = engine.reconcile(&machine, &source, &requirements, false);

    let report = PlanExecutor::new(dry_run).apply_converted(&converted, &plan)?;

    for action in &report.actions {
        println!("   {} {}", "+".green(), action);
    }
    for warning in &report.warnings {
        println!("   {} {}", "!".yellow(), warning);
    }
    println!(
        "{} {} converted file(s) imported into their mode folders.",
        "OK".green().bold(),
        report.converted
    );
    Ok(())
}
