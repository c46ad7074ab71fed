//! On-disk snapshot of the source-media file-tree index.
//!
//! Walking a large source repository dominates startup time, so the index
//! is serialized after each rebuild and read back on the next run. The
//! snapshot is trusted until it is explicitly cleared or the source root
//! changes; staleness is never auto-detected.

use std::fs;

use chrono::{DateTime, Utc};

use sam_fs::{FileTreeIndex, NormalizedPath};

use crate::error::Result;

/// Loads, stores, and clears the cached source-tree snapshot.
#[derive(Debug, Clone)]
pub struct SourceCache {
    path: NormalizedPath,
}

impl SourceCache {
    pub fn new(path: NormalizedPath) -> Self {
        Self { path }
    }

    /// The snapshot file location.
    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    /// Read the snapshot back, if present and loadable.
    ///
    /// Any failure here is recoverable and simply means the caller walks
    /// the source tree again.
    pub fn load(&self) -> Option<FileTreeIndex> {
        let bytes = match fs::read(self.path.to_native()) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!(path = %self.path, "no usable cache snapshot: {e}");
                return None;
            }
        };
        match serde_json::from_slice::<FileTreeIndex>(&bytes) {
            Ok(index) => {
                if let Ok(modified) = fs::metadata(self.path.to_native()).and_then(|m| m.modified())
                {
                    let stamp: DateTime<Utc> = modified.into();
                    tracing::info!(
                        path = %self.path,
                        written = %stamp.format("%b %d %Y %H:%M:%S"),
                        "loaded source tree from cache"
                    );
                }
                Some(index)
            }
            Err(e) => {
                tracing::warn!(path = %self.path, "cache snapshot unreadable, rebuilding: {e}");
                None
            }
        }
    }

    /// Write a snapshot, creating the parent directory as needed.
    pub fn store(&self, index: &FileTreeIndex) -> Result<()> {
        let native = self.path.to_native();
        if let Some(parent) = native.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec(index)?;
        fs::write(&native, bytes)?;
        Ok(())
    }

    /// Delete the snapshot. Not an error if it is already absent.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(self.path.to_native()) {
            Ok(()) => {
                tracing::info!(path = %self.path, "cache snapshot removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path, "no cache snapshot to remove");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Return the cached index when usable, otherwise walk `source_root`
    /// and refresh the snapshot.
    ///
    /// A snapshot built for a different root is discarded: reconfiguring
    /// the source path invalidates the cache. With `refresh` set the cache
    /// is bypassed outright. Snapshot write failures are non-fatal.
    pub fn load_or_rebuild(
        &self,
        source_root: &NormalizedPath,
        refresh: bool,
    ) -> Result<FileTreeIndex> {
        if !refresh && let Some(index) = self.load() {
            if index.root() == source_root {
                return Ok(index);
            }
            tracing::info!(
                cached = %index.root(),
                requested = %source_root,
                "source root changed, discarding cache"
            );
        }

        tracing::info!(root = %source_root, "walking source media tree");
        let index = FileTreeIndex::build(source_root, &[])?;
        if let Err(e) = self.store(&index) {
            tracing::warn!(path = %self.path, "could not write cache snapshot: {e}");
        }
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn cache_in(dir: &TempDir) -> SourceCache {
        SourceCache::new(NormalizedPath::new(dir.path()).join("cache").join("source.json"))
    }

    #[test]
    fn snapshot_round_trips() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("media");
        fs::create_dir_all(source.join("voice")).unwrap();
        fs::write(source.join("voice/en_us_intro.ogg"), b"x").unwrap();

        let cache = cache_in(&dir);
        let built = FileTreeIndex::build(&NormalizedPath::new(&source), &[]).unwrap();
        cache.store(&built).unwrap();

        let loaded = cache.load().unwrap();
        assert_eq!(loaded, built);
    }

    #[test]
    fn corrupt_snapshot_is_recoverable() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);
        fs::create_dir_all(cache.path().to_native().parent().unwrap()).unwrap();
        fs::write(cache.path().to_native(), b"not json").unwrap();

        assert!(cache.load().is_none());
    }

    #[test]
    fn clear_is_not_an_error_when_absent() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);
        cache.clear().unwrap();
    }

    #[test]
    fn changed_root_discards_the_snapshot() {
        let dir = TempDir::new().unwrap();
        let first_root = dir.path().join("a");
        let second_root = dir.path().join("b");
        fs::create_dir_all(&first_root).unwrap();
        fs::create_dir_all(second_root.join("music")).unwrap();
        fs::write(second_root.join("music/mus_theme.ogg"), b"x").unwrap();

        let cache = cache_in(&dir);
        cache
            .load_or_rebuild(&NormalizedPath::new(&first_root), false)
            .unwrap();

        let rebuilt = cache
            .load_or_rebuild(&NormalizedPath::new(&second_root), false)
            .unwrap();
        assert_eq!(rebuilt.root(), &NormalizedPath::new(&second_root));
        assert!(rebuilt.contains("mus_theme.ogg"));
    }
}
