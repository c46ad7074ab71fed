//! Error types for sam-fs

use std::path::PathBuf;

/// Result type for sam-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sam-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No indexed file named '{filename}' under {root}")]
    NotFound { filename: String, root: PathBuf },

    #[error("Cannot derive a backup name for {path}: no recognized extension")]
    BackupName { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn not_found(filename: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self::NotFound {
            filename: filename.into(),
            root: root.into(),
        }
    }

    /// Whether this is a recoverable failed-lookup error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
