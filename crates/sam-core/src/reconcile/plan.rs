//! The computed difference between required and actual asset placement.

use std::collections::BTreeMap;
use std::fs::Metadata;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sam_fs::NormalizedPath;

/// Size and modification time of a file present at its expected path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStat {
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
}

impl FileStat {
    pub fn from_metadata(metadata: &Metadata) -> Self {
        Self {
            size: metadata.len(),
            modified: metadata.modified().ok().map(DateTime::<Utc>::from),
        }
    }
}

/// Per-requirement detail retained alongside the categorized plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundDetail {
    /// The mode that requires the file.
    pub mode: String,
    /// The directory the file is expected in.
    pub expected_dir: NormalizedPath,
    /// Where the source repository can provide the file from, if resolved.
    pub source_path: Option<NormalizedPath>,
    /// Present when the file exists at its expected path.
    pub stat: Option<FileStat>,
}

/// Categorized diff between declared requirements and the machine tree.
///
/// Membership is a pure function of the machine index, the source index,
/// the requirement index, and the force-refetch flag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiffPlan {
    /// Required files present at their expected path.
    pub found: Vec<String>,
    /// Required files absent from their expected path and not already
    /// slated to arrive via a move.
    pub missing: Vec<String>,
    /// Missing files the source repository can provide:
    /// expected path to source path.
    pub available: BTreeMap<NormalizedPath, NormalizedPath>,
    /// Missing files absent from the source repository too.
    pub unavailable: Vec<String>,
    /// Required files present at the wrong path:
    /// expected path to current path.
    pub misplaced: BTreeMap<NormalizedPath, NormalizedPath>,
    /// Non-canonical copies of files that also exist at their expected path.
    pub duplicated: Vec<NormalizedPath>,
    /// Files in the machine tree required by no mode.
    pub orphaned: Vec<NormalizedPath>,
    /// Count of files verified at their expected path during the tree pass.
    pub matched: usize,
    /// Per-requirement detail, keyed by filename.
    pub sounds: BTreeMap<String, SoundDetail>,
}

impl DiffPlan {
    /// Whether the plan contains any remediation work.
    pub fn is_settled(&self) -> bool {
        self.missing.is_empty()
            && self.misplaced.is_empty()
            && self.duplicated.is_empty()
            && self.orphaned.is_empty()
            && self.available.is_empty()
    }

    /// Number of file operations applying this plan would perform.
    pub fn remediation_count(&self) -> usize {
        self.orphaned.len() + self.duplicated.len() + self.misplaced.len() + self.available.len()
    }
}
