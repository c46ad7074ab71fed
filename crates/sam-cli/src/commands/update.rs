//! Update command: apply the remediation plan.

use colored::Colorize;

use sam_core::{PlanExecutor, ReconciliationEngine};

use crate::commands::parse::print_plan_summary;
use crate::context::Context;
use crate::error::Result;

/// Run the update command
///
/// Reconciles and applies the plan: prune orphans and duplicates, move
/// misplaced files, copy missing files from the source tree. With
/// `dry_run`, reports the same counts without mutating anything. With
/// `force`, every required file is treated as absent and re-copied.
pub fn run_update(ctx: &Context, dry_run: bool, force: bool, refresh: bool) -> Result<()> {
    println!(
        "{} Updating machine assets{}...",
        "=>".blue().bold(),
        if dry_run { " (dry run)" } else { "" }
    );

    let requirements = ctx.requirement_index()?;
    let machine = ctx.machine_index()?;
    let source = ctx.source_index(refresh)?;

    let engine = ReconciliationEngine::new(ctx.machine_root().clone());
    let plan = engine.reconcile(&machine, &source, &requirements, force);

    print_plan_summary(&plan);

    if plan.remediation_count() == 0 && plan.unavailable.is_empty() {
        println!("{} Nothing to do.", "OK".green().bold());
        return Ok(());
    }

    let report = PlanExecutor::new(dry_run).apply(&plan)?;

    for action in &report.actions {
        println!("   {} {}", "+".green(), action);
    }
    for warning in &report.warnings {
        println!("   {} {}", "!".yellow(), warning);
    }

    if dry_run {
        println!(
            "{} Simulation complete, {} file(s) would change.",
            "OK".green().bold(),
            report.files_changed()
        );
    } else {
        println!(
            "{} Update complete, {} file(s) changed.",
            "OK".green().bold(),
            report.files_changed()
        );
    }
    Ok(())
}
