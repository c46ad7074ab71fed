//! Applies a remediation plan to the filesystem.
//!
//! Order matters: orphans and duplicates are deleted before misplaced
//! files move, and moves complete before source copies fill the remaining
//! gaps. A failing operation never aborts the batch; failures are
//! collected and surfaced once, together, at the end.

use serde::{Deserialize, Serialize};

use sam_fs::{FileTreeIndex, NormalizedPath, io};

use crate::error::Result;
use crate::reconcile::plan::DiffPlan;

/// One failed file operation inside an apply batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyFailure {
    /// What was being attempted ("remove", "move", "copy", "backup").
    pub operation: &'static str,
    /// The file the operation was attempted on.
    pub path: NormalizedPath,
    /// The underlying cause.
    pub message: String,
}

impl std::fmt::Display for ApplyFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}: {}", self.operation, self.path, self.message)
    }
}

/// Aggregated failures from one apply batch. Carries the report so callers
/// can still see what did complete.
#[derive(Debug)]
pub struct ApplyError {
    pub report: ApplyReport,
    pub failures: Vec<ApplyFailure>,
}

impl std::fmt::Display for ApplyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} file operation(s) failed", self.failures.len())?;
        for failure in &self.failures {
            write!(f, "\n  - {}", failure)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApplyError {}

/// Change counts and action log from one apply batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplyReport {
    pub orphans_removed: usize,
    pub duplicates_removed: usize,
    pub moved: usize,
    pub copied: usize,
    pub converted: usize,
    /// Human-readable description of each action taken (or simulated).
    pub actions: Vec<String>,
    /// Non-fatal conditions, e.g. files unavailable in the source tree.
    pub warnings: Vec<String>,
}

impl ApplyReport {
    /// Total files changed (or that would change, under dry-run).
    pub fn files_changed(&self) -> usize {
        self.orphans_removed + self.duplicates_removed + self.moved + self.copied + self.converted
    }
}

/// Applies [`DiffPlan`]s to the filesystem.
///
/// With `dry_run` set, no mutation happens but the reported counts are
/// identical to what a real run on the same tree would produce.
pub struct PlanExecutor {
    dry_run: bool,
}

impl PlanExecutor {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Apply a plan: delete orphans, delete duplicates, move misplaced
    /// files, copy available files from the source tree.
    ///
    /// # Errors
    ///
    /// Returns an aggregated [`ApplyError`] when any individual operation
    /// failed; all independent operations were still attempted.
    pub fn apply(&self, plan: &DiffPlan) -> Result<ApplyReport> {
        let mut report = ApplyReport::default();
        let mut failures: Vec<ApplyFailure> = Vec::new();

        for path in &plan.orphaned {
            if self.dry_run {
                report.actions.push(format!("[dry-run] Would remove orphaned {path}"));
                report.orphans_removed += 1;
                continue;
            }
            match io::remove_file(path) {
                Ok(()) => {
                    report.actions.push(format!("Removed orphaned {path}"));
                    report.orphans_removed += 1;
                }
                Err(e) => failures.push(ApplyFailure {
                    operation: "remove",
                    path: path.clone(),
                    message: e.to_string(),
                }),
            }
        }

        for path in &plan.duplicated {
            if self.dry_run {
                report.actions.push(format!("[dry-run] Would remove duplicate {path}"));
                report.duplicates_removed += 1;
                continue;
            }
            match io::remove_file(path) {
                Ok(()) => {
                    report.actions.push(format!("Removed duplicate {path}"));
                    report.duplicates_removed += 1;
                }
                Err(e) => failures.push(ApplyFailure {
                    operation: "remove",
                    path: path.clone(),
                    message: e.to_string(),
                }),
            }
        }

        for (expected, current) in &plan.misplaced {
            if self.dry_run {
                report
                    .actions
                    .push(format!("[dry-run] Would move {current} -> {expected}"));
                report.moved += 1;
                continue;
            }
            match io::move_file(current, expected) {
                Ok(()) => {
                    report.actions.push(format!("Moved {current} -> {expected}"));
                    report.moved += 1;
                }
                Err(e) => failures.push(ApplyFailure {
                    operation: "move",
                    path: current.clone(),
                    message: e.to_string(),
                }),
            }
        }

        for (expected, source) in &plan.available {
            if self.dry_run {
                report
                    .actions
                    .push(format!("[dry-run] Would copy {source} -> {expected}"));
                report.copied += 1;
                continue;
            }
            match io::copy_with_mtime(source, expected) {
                Ok(_) => {
                    report.actions.push(format!("Copied {source} -> {expected}"));
                    report.copied += 1;
                }
                Err(e) => failures.push(ApplyFailure {
                    operation: "copy",
                    path: source.clone(),
                    message: e.to_string(),
                }),
            }
        }

        for filename in &plan.unavailable {
            let mode = plan
                .sounds
                .get(filename)
                .map(|detail| detail.mode.as_str())
                .unwrap_or("?");
            report
                .warnings
                .push(format!("{filename} ({mode}) could not be found in the source tree"));
        }

        self.finish(report, failures)
    }

    /// Import converted media back over the files they were produced from.
    ///
    /// For each converted file matching a known requirement, the existing
    /// file at the expected path is renamed to its backup name and the
    /// converted file is copied into its place. Pre-conversion originals
    /// are never deleted. Converted files matching no requirement are
    /// reported as warnings.
    pub fn apply_converted(
        &self,
        converted: &FileTreeIndex,
        plan: &DiffPlan,
    ) -> Result<ApplyReport> {
        let mut report = ApplyReport::default();
        let mut failures: Vec<ApplyFailure> = Vec::new();

        for filename in converted.files() {
            let Some(detail) = plan.sounds.get(filename) else {
                report
                    .warnings
                    .push(format!("{filename} matches no declared requirement, skipping"));
                continue;
            };
            let destination = detail.expected_dir.join(filename);
            let source = match converted.lookup_path(filename) {
                Ok(path) => path,
                Err(e) => {
                    failures.push(ApplyFailure {
                        operation: "copy",
                        path: destination,
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            if self.dry_run {
                report
                    .actions
                    .push(format!("[dry-run] Would back up and replace {destination}"));
                report.converted += 1;
                continue;
            }

            if let Err(e) = io::backup_in_place(&destination) {
                failures.push(ApplyFailure {
                    operation: "backup",
                    path: destination.clone(),
                    message: e.to_string(),
                });
                continue;
            }
            match io::copy_with_mtime(&source, &destination) {
                Ok(_) => {
                    report
                        .actions
                        .push(format!("Replaced {destination} with converted media"));
                    report.converted += 1;
                }
                Err(e) => failures.push(ApplyFailure {
                    operation: "copy",
                    path: source.clone(),
                    message: e.to_string(),
                }),
            }
        }

        self.finish(report, failures)
    }

    fn finish(&self, report: ApplyReport, failures: Vec<ApplyFailure>) -> Result<ApplyReport> {
        for warning in &report.warnings {
            tracing::warn!("{warning}");
        }
        if failures.is_empty() {
            Ok(report)
        } else {
            Err(ApplyError { report, failures }.into())
        }
    }
}
