//! Parse command: analyze and report, change nothing.

use colored::Colorize;

use sam_core::{DiffPlan, ReconciliationEngine};

use crate::context::Context;
use crate::error::Result;

/// Print a one-screen summary of a computed plan.
pub(crate) fn print_plan_summary(plan: &DiffPlan) {
    println!(
        "  Found {} assets defined across the mode configs.",
        plan.sounds.len()
    );
    println!(
        "   {} {} files correctly accounted for",
        "-".green(),
        plan.found.len()
    );
    if !plan.misplaced.is_empty() {
        println!(
            "   {} {} misplaced files to move",
            "-".yellow(),
            plan.misplaced.len()
        );
        for (expected, current) in &plan.misplaced {
            println!("     {} -> {}", current.to_string().dimmed(), expected);
        }
    }
    if !plan.duplicated.is_empty() {
        println!(
            "   {} {} duplicate files to remove",
            "-".yellow(),
            plan.duplicated.len()
        );
    }
    if !plan.orphaned.is_empty() {
        println!(
            "   {} {} orphaned files to remove",
            "-".yellow(),
            plan.orphaned.len()
        );
    }
    if !plan.available.is_empty() {
        println!(
            "   {} {} missing files available for copy",
            "-".yellow(),
            plan.available.len()
        );
    }
    if !plan.unavailable.is_empty() {
        println!(
            "   {} {} files missing and unavailable:",
            "!".red(),
            plan.unavailable.len()
        );
        for filename in &plan.unavailable {
            let mode = plan
                .sounds
                .get(filename)
                .map(|d| d.mode.as_str())
                .unwrap_or("?");
            println!("     {} ({})", filename.cyan(), mode.dimmed());
        }
    }
}

/// Run the parse command
///
/// Builds all three indexes, reconciles them, and prints the plan without
/// touching the filesystem.
pub fn run_parse(ctx: &Context, refresh: bool) -> Result<()> {
    println!("{} Analyzing machine assets...", "=>".blue().bold());

    let requirements = ctx.requirement_index()?;
    let machine = ctx.machine_index()?;
    let source = ctx.source_index(refresh)?;

    let engine = ReconciliationEngine::new(ctx.machine_root().clone());
    let plan = engine.reconcile(&machine, &source, &requirements, false);

    print_plan_summary(&plan);

    if plan.is_settled() {
        println!("{} Machine tree matches the configs.", "OK".green().bold());
    } else {
        println!();
        println!("Run {} to apply these changes.", "sam update".cyan());
    }
    Ok(())
}
