//! Core reconciliation engine for the sound asset manager
//!
//! Cross-references three views of an audio-asset collection — declared
//! requirements from mode configuration documents, the actual machine file
//! tree, and a source-media repository — into a categorized remediation
//! plan, and applies that plan to the filesystem.

pub mod cache;
pub mod config;
pub mod error;
pub mod reconcile;

pub use cache::SourceCache;
pub use config::{Mode, ModeDocument, RequirementIndex};
pub use error::{Error, Result};
pub use reconcile::{
    ApplyFailure, ApplyReport, DiffPlan, FileStat, PlanExecutor, ReconciliationEngine, SoundDetail,
};
