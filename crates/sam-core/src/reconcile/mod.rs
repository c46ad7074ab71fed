//! Reconciliation: diff computation and plan application.

pub mod engine;
pub mod executor;
pub mod plan;

pub use engine::ReconciliationEngine;
pub use executor::{ApplyError, ApplyFailure, ApplyReport, PlanExecutor};
pub use plan::{DiffPlan, FileStat, SoundDetail};
