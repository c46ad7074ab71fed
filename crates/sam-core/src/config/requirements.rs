//! The requirement index: every mode's declared assets, inheritance links,
//! and the filename-to-owner reverse index.

use std::collections::BTreeMap;
use std::io;

use walkdir::WalkDir;

use sam_fs::{MachineLayout, NormalizedPath};

use crate::config::document::ModeDocument;
use crate::config::mode::Mode;
use crate::error::{Error, Result};

const CONFIG_SUFFIX: &str = ".yaml";

/// Index of every asset requirement declared under a machine's `modes` tree.
///
/// Construction parses all documents first and only then resolves import
/// links (parse order is unordered) and builds the owner index. An index
/// that builds successfully contains no ownership conflicts, so plan
/// production can no longer abort on one.
#[derive(Debug, Clone)]
pub struct RequirementIndex {
    modes: BTreeMap<String, Mode>,
    /// Child mode name to the mode that imports it.
    parents: BTreeMap<String, String>,
    /// Filename to owning mode name. Built as an explicit one-time step.
    owners: BTreeMap<String, String>,
}

impl RequirementIndex {
    /// Parse every configuration document under `{machine_root}/modes` and
    /// build the index.
    ///
    /// # Errors
    ///
    /// Fails on unreadable or invalid documents, on intra-mode track
    /// conflicts, and on a filename required by two distinct modes.
    pub fn build(machine_root: &NormalizedPath) -> Result<Self> {
        let modes_root = MachineLayout::new(machine_root.clone()).modes_root();

        let mut modes: BTreeMap<String, Mode> = BTreeMap::new();
        let mut parents: BTreeMap<String, String> = BTreeMap::new();

        if modes_root.is_dir() {
            for entry in WalkDir::new(modes_root.to_native())
                .follow_links(false)
                .sort_by_file_name()
            {
                let entry = entry.map_err(|e| {
                    let path = e
                        .path()
                        .map(|p| p.to_path_buf())
                        .unwrap_or_else(|| modes_root.to_native());
                    sam_fs::Error::io(
                        path,
                        e.into_io_error()
                            .unwrap_or_else(|| io::Error::other("directory walk failed")),
                    )
                })?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let filename = entry.file_name().to_string_lossy().to_string();
                let Some(mode_name) = filename.strip_suffix(CONFIG_SUFFIX) else {
                    continue;
                };

                let source = std::fs::read_to_string(entry.path())
                    .map_err(|e| sam_fs::Error::io(entry.path(), e))?;
                let doc = ModeDocument::from_yaml(&source).map_err(|e| Error::ConfigParse {
                    path: entry.path().to_path_buf(),
                    message: e.to_string(),
                })?;

                let mode = Mode::from_document(mode_name, &doc)?;
                if !mode.is_empty() {
                    if modes.contains_key(mode_name) {
                        tracing::warn!(mode = mode_name, "mode config appears more than once");
                    }
                    modes.insert(mode_name.to_string(), mode);
                }

                // Import links are only recorded here; chains are resolved
                // after the walk, once every document has been seen.
                for import in &doc.config {
                    let child = import
                        .strip_suffix(CONFIG_SUFFIX)
                        .unwrap_or(import.as_str());
                    parents.insert(child.to_string(), mode_name.to_string());
                }
            }
        }

        let owners = Self::index_owners(&modes)?;
        tracing::debug!(
            modes = modes.len(),
            requirements = owners.len(),
            "requirement index built"
        );

        Ok(Self {
            modes,
            parents,
            owners,
        })
    }

    /// One-time reverse-index build: filename to owning mode.
    fn index_owners(modes: &BTreeMap<String, Mode>) -> Result<BTreeMap<String, String>> {
        let mut owners: BTreeMap<String, String> = BTreeMap::new();
        for (name, mode) in modes {
            for file in mode.files() {
                if let Some(previous) = owners.get(file) {
                    return Err(Error::OwnershipConflict {
                        filename: file.to_string(),
                        first: previous.clone(),
                        second: name.clone(),
                    });
                }
                owners.insert(file.to_string(), name.clone());
            }
        }
        Ok(owners)
    }

    /// Walk the import chain to the root ancestor; that ancestor's name is
    /// the on-disk folder for all of its descendants' assets.
    pub fn top_level_folder<'a>(&'a self, mode_name: &'a str) -> &'a str {
        let mut name = mode_name;
        let mut hops = 0;
        while let Some(parent) = self.parents.get(name) {
            hops += 1;
            if hops > self.parents.len() {
                tracing::warn!(mode = mode_name, "import cycle detected, stopping at {name}");
                break;
            }
            name = parent;
        }
        name
    }

    /// All modes with at least one requirement, keyed by name.
    pub fn modes(&self) -> &BTreeMap<String, Mode> {
        &self.modes
    }

    /// The mode requiring `filename`, if any.
    pub fn find_owning_mode(&self, filename: &str) -> Option<&Mode> {
        self.owners.get(filename).and_then(|name| self.modes.get(name))
    }

    /// Number of indexed modes.
    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sam_test_utils::TestMachine;

    #[test]
    fn indexes_every_mode_with_sounds() {
        let machine = TestMachine::new();
        machine.add_mode_config(
            "main",
            r#"
sounds:
  boot:
    file: boot.wav
    track: sfx
"#,
        );
        machine.add_mode_config(
            "empty",
            r#"
mode:
  priority: 100
"#,
        );

        let index = RequirementIndex::build(&machine.machine_root()).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(
            index.find_owning_mode("boot.wav").map(Mode::name),
            Some("main")
        );
        assert!(index.find_owning_mode("ghost.ogg").is_none());
    }

    #[test]
    fn import_chains_resolve_to_the_root_ancestor() {
        let machine = TestMachine::new();
        machine.add_mode_config(
            "main",
            r#"
config:
  - attract.yaml
sounds:
  boot:
    file: boot.wav
    track: sfx
"#,
        );
        machine.add_mode_config(
            "attract",
            r#"
config:
  - attract_child.yaml
sounds:
  loop:
    file: mus_loop.ogg
"#,
        );
        machine.add_mode_config(
            "attract_child",
            r#"
sounds:
  sting:
    file: sting.wav
    track: sfx
"#,
        );

        let index = RequirementIndex::build(&machine.machine_root()).unwrap();
        assert_eq!(index.top_level_folder("attract_child"), "main");
        assert_eq!(index.top_level_folder("attract"), "main");
        assert_eq!(index.top_level_folder("main"), "main");
        // Unknown modes are their own top level.
        assert_eq!(index.top_level_folder("elsewhere"), "elsewhere");
    }

    #[test]
    fn cross_mode_ownership_is_a_fatal_conflict() {
        let machine = TestMachine::new();
        machine.add_mode_config(
            "alpha",
            r#"
sounds:
  theme:
    file: theme.ogg
    track: music
"#,
        );
        machine.add_mode_config(
            "beta",
            r#"
sounds:
  theme:
    file: theme.ogg
    track: music
"#,
        );

        let err = RequirementIndex::build(&machine.machine_root()).unwrap_err();
        assert!(matches!(err, Error::OwnershipConflict { .. }));
    }

    #[test]
    fn a_machine_without_a_modes_tree_yields_an_empty_index() {
        let machine = TestMachine::new();
        let index = RequirementIndex::build(&machine.machine_root()).unwrap();
        assert!(index.is_empty());
    }
}
