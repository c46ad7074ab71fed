//! File-tree index over audio assets.
//!
//! Walks a directory once and indexes every audio file by filename. The
//! walk result is sorted by full normalized path before insertion, so
//! "first occurrence" always means lexicographically-first path and index
//! contents are reproducible across runs on an unchanged tree.

use std::collections::BTreeMap;
use std::io;

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::constants::{is_audio_file, is_backup_file};
use crate::error::{Error, Result};
use crate::path::NormalizedPath;

/// Index of audio files under a root directory, keyed by filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTreeIndex {
    root: NormalizedPath,
    /// Filename to containing directories, in lexicographic full-path order.
    files: BTreeMap<String, Vec<NormalizedPath>>,
    /// Backup-named files (`name.original.ext`), tracked separately and
    /// excluded from lookups and duplicate detection.
    backups: BTreeMap<String, Vec<NormalizedPath>>,
}

impl FileTreeIndex {
    /// Walk `root` recursively and index every audio file.
    ///
    /// Files whose containing directory is exactly equal to an entry in
    /// `exclude` are skipped; subdirectories of an excluded directory are
    /// still visited (staging areas list each of their subdirectories
    /// explicitly).
    pub fn build(root: &NormalizedPath, exclude: &[NormalizedPath]) -> Result<Self> {
        let mut entries: Vec<(NormalizedPath, String, bool)> = Vec::new();

        for entry in WalkDir::new(root.to_native()).follow_links(false) {
            let entry = entry.map_err(|e| {
                let path = e
                    .path()
                    .map(|p| p.to_path_buf())
                    .unwrap_or_else(|| root.to_native());
                Error::io(
                    path,
                    e.into_io_error()
                        .unwrap_or_else(|| io::Error::other("directory walk failed")),
                )
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let filename = entry.file_name().to_string_lossy().to_string();
            if !is_audio_file(&filename) {
                continue;
            }
            let dir = match entry.path().parent() {
                Some(parent) => NormalizedPath::new(parent),
                None => continue,
            };
            if exclude.contains(&dir) {
                continue;
            }
            let backup = is_backup_file(&filename);
            entries.push((dir, filename, backup));
        }

        // Sort by full path so first-occurrence semantics do not depend on
        // platform directory-iteration order.
        entries.sort_by(|a, b| a.0.join(&a.1).cmp(&b.0.join(&b.1)));

        let mut files: BTreeMap<String, Vec<NormalizedPath>> = BTreeMap::new();
        let mut backups: BTreeMap<String, Vec<NormalizedPath>> = BTreeMap::new();
        for (dir, filename, is_backup) in entries {
            let bucket = if is_backup { &mut backups } else { &mut files };
            let dirs = bucket.entry(filename.clone()).or_default();
            if let Some(first) = dirs.first() {
                tracing::debug!(
                    filename = %filename,
                    first = %first,
                    also = %dir,
                    "duplicate filename in tree"
                );
            }
            dirs.push(dir);
        }

        Ok(Self {
            root: root.clone(),
            files,
            backups,
        })
    }

    /// The root this index was built over.
    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    /// Full path of the first-discovered occurrence of `filename`.
    pub fn lookup_path(&self, filename: &str) -> Result<NormalizedPath> {
        self.files
            .get(filename)
            .and_then(|dirs| dirs.first())
            .map(|dir| dir.join(filename))
            .ok_or_else(|| Error::not_found(filename, self.root.to_native()))
    }

    /// Every full path at which `filename` occurs, in index order.
    pub fn occurrences(&self, filename: &str) -> Vec<NormalizedPath> {
        self.files
            .get(filename)
            .map(|dirs| dirs.iter().map(|dir| dir.join(filename)).collect())
            .unwrap_or_default()
    }

    /// Filenames occurring more than once, mapped to all of their paths.
    ///
    /// The first element of each list is what [`lookup_path`] returns.
    ///
    /// [`lookup_path`]: Self::lookup_path
    pub fn duplicates(&self) -> BTreeMap<String, Vec<NormalizedPath>> {
        self.files
            .iter()
            .filter(|(_, dirs)| dirs.len() > 1)
            .map(|(name, dirs)| {
                let paths = dirs.iter().map(|dir| dir.join(name)).collect();
                (name.clone(), paths)
            })
            .collect()
    }

    /// Indexed filenames, in lexicographic order.
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Whether `filename` is indexed.
    pub fn contains(&self, filename: &str) -> bool {
        self.files.contains_key(filename)
    }

    /// Number of distinct indexed filenames.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Backup-named files found during the walk, keyed by filename.
    pub fn backups(&self) -> &BTreeMap<String, Vec<NormalizedPath>> {
        &self.backups
    }
}
