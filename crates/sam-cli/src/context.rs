//! Resolved invocation context: validated roots and index construction.

use std::path::PathBuf;

use sam_core::{RequirementIndex, SourceCache};
use sam_fs::{FileTreeIndex, MachineLayout, NormalizedPath};

use crate::error::{CliError, Result};

const CACHE_FILE: &str = "source-tree.json";

/// Everything a command needs: two validated absolute roots and the cache
/// location. Path selection and prompting happen out here in the CLI; the
/// core only ever sees directories that exist.
#[derive(Debug)]
pub struct Context {
    machine_root: NormalizedPath,
    source_root: NormalizedPath,
    cache: SourceCache,
}

impl Context {
    /// Validate the configured paths and build a context.
    ///
    /// # Errors
    ///
    /// Fails when either path is not supplied or does not name an existing
    /// directory.
    pub fn resolve(machine: Option<PathBuf>, source: Option<PathBuf>) -> Result<Self> {
        let machine_root = Self::require_dir("machine", machine)?;
        let source_root = Self::require_dir("source media", source)?;
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("sam");

        Ok(Self {
            machine_root,
            source_root,
            cache: SourceCache::new(NormalizedPath::new(cache_dir).join(CACHE_FILE)),
        })
    }

    fn require_dir(label: &str, path: Option<PathBuf>) -> Result<NormalizedPath> {
        let path = path.ok_or_else(|| {
            CliError::user(format!(
                "No {label} folder configured. Pass --{} or set the environment variable.",
                if label == "machine" { "machine" } else { "source" }
            ))
        })?;
        if !path.is_dir() {
            return Err(CliError::user(format!(
                "{label} folder not found: '{}'",
                path.display()
            )));
        }
        let absolute = std::path::absolute(&path).map_err(|e| sam_fs::Error::io(&path, e))?;
        Ok(NormalizedPath::new(absolute))
    }

    pub fn machine_root(&self) -> &NormalizedPath {
        &self.machine_root
    }

    pub fn layout(&self) -> MachineLayout {
        MachineLayout::new(self.machine_root.clone())
    }

    pub fn cache(&self) -> &SourceCache {
        &self.cache
    }

    /// Index the machine tree, skipping the staging directories.
    pub fn machine_index(&self) -> Result<FileTreeIndex> {
        let layout = self.layout();
        Ok(FileTreeIndex::build(
            &self.machine_root,
            &layout.walk_excludes(),
        )?)
    }

    /// Index the source media tree, via the cache unless `refresh` is set.
    pub fn source_index(&self, refresh: bool) -> Result<FileTreeIndex> {
        Ok(self.cache.load_or_rebuild(&self.source_root, refresh)?)
    }

    /// Parse the machine's mode configuration documents.
    pub fn requirement_index(&self) -> Result<RequirementIndex> {
        Ok(RequirementIndex::build(&self.machine_root)?)
    }

    /// Override the cache location (used by tests).
    #[cfg(test)]
    pub fn with_cache_path(mut self, path: &std::path::Path) -> Self {
        self.cache = SourceCache::new(NormalizedPath::new(path));
        self
    }
}
