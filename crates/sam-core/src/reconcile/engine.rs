//! The reconciliation engine.
//!
//! Cross-references the machine file tree, the source-media tree, and the
//! requirement index into a categorized [`DiffPlan`]. Reconciliation never
//! touches the filesystem beyond stat calls; applying the plan is the
//! executor's job.

use std::collections::BTreeSet;
use std::fs;

use sam_fs::{FileTreeIndex, MachineLayout, NormalizedPath};

use crate::config::RequirementIndex;
use crate::config::mode::DEFAULT_TRACK;
use crate::reconcile::plan::{DiffPlan, FileStat, SoundDetail};

/// Computes the diff between required and actual asset placement.
pub struct ReconciliationEngine {
    layout: MachineLayout,
}

impl ReconciliationEngine {
    pub fn new(machine_root: NormalizedPath) -> Self {
        Self {
            layout: MachineLayout::new(machine_root),
        }
    }

    /// Cross-reference the three indexes into a plan.
    ///
    /// Two passes. The first walks every file actually present in the
    /// machine tree and classifies `orphaned`, `misplaced`, and
    /// `duplicated`. The second walks every declared requirement and
    /// classifies `found`, `missing`, `available`, and `unavailable`;
    /// an expected path that a pending move will fill is not `missing`.
    ///
    /// With `force_refetch` set, every requirement is treated as absent so
    /// the whole collection is re-sourced.
    ///
    /// The result is a pure function of the inputs: repeated calls on an
    /// unchanged tree yield identical plans.
    pub fn reconcile(
        &self,
        machine: &FileTreeIndex,
        source: &FileTreeIndex,
        requirements: &RequirementIndex,
        force_refetch: bool,
    ) -> DiffPlan {
        let mut plan = DiffPlan::default();
        let mut duplicated: BTreeSet<NormalizedPath> = BTreeSet::new();

        tracing::info!(
            machine_files = machine.len(),
            modes = requirements.len(),
            "comparing machine tree to declared requirements"
        );

        // Pass 1: every file actually present in the machine tree.
        for filename in machine.files() {
            let occurrences = machine.occurrences(filename);
            let Some(mode) = requirements.find_owning_mode(filename) else {
                // Required by no mode: every copy goes.
                plan.orphaned.extend(occurrences);
                continue;
            };

            let track = mode.track_for(filename).unwrap_or(DEFAULT_TRACK);
            let top = requirements.top_level_folder(mode.name());
            let expected = self.layout.expected_path(top, track, filename);

            if occurrences.contains(&expected) {
                if occurrences.len() == 1 {
                    plan.matched += 1;
                    tracing::debug!(filename, mode = mode.name(), "matched");
                } else {
                    // The canonical copy stays; every other copy goes.
                    for path in &occurrences {
                        if *path != expected {
                            duplicated.insert(path.clone());
                        }
                    }
                }
            } else {
                let current = occurrences[0].clone();
                tracing::info!(%current, %expected, "file is in the wrong place");
                plan.misplaced.insert(expected, current);
                // Stray extra copies would re-appear as duplicates after
                // the move; slate them for removal now so a second run
                // comes up empty.
                for path in occurrences.iter().skip(1) {
                    duplicated.insert(path.clone());
                }
            }
        }
        plan.duplicated = duplicated.into_iter().collect();

        // Pass 2: every requirement declared by the configs.
        for (mode_name, mode) in requirements.modes() {
            let top = requirements.top_level_folder(mode_name);
            for (track, files) in mode.by_track() {
                let expected_dir = self.layout.sounds_dir(top, track);
                for filename in files {
                    let expected = expected_dir.join(filename);
                    let mut source_path = None;
                    let mut stat = None;

                    let metadata = if force_refetch {
                        None
                    } else {
                        fs::metadata(expected.to_native()).ok()
                    };

                    if let Some(metadata) = metadata {
                        stat = Some(FileStat::from_metadata(&metadata));
                        plan.found.push(filename.clone());
                    } else if plan.misplaced.contains_key(&expected) {
                        // The pending move will satisfy this requirement.
                    } else {
                        plan.missing.push(filename.clone());
                        match source.lookup_path(filename) {
                            Ok(path) => {
                                source_path = Some(path.clone());
                                plan.available.insert(expected, path);
                            }
                            Err(_) => plan.unavailable.push(filename.clone()),
                        }
                    }

                    plan.sounds.insert(
                        filename.clone(),
                        SoundDetail {
                            mode: mode_name.clone(),
                            expected_dir: expected_dir.clone(),
                            source_path,
                            stat,
                        },
                    );
                }
            }
        }

        tracing::info!(
            declared = plan.sounds.len(),
            found = plan.found.len(),
            misplaced = plan.misplaced.len(),
            duplicated = plan.duplicated.len(),
            orphaned = plan.orphaned.len(),
            available = plan.available.len(),
            unavailable = plan.unavailable.len(),
            "reconciliation complete"
        );

        plan
    }
}
