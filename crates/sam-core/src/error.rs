//! Error types for sam-core

use std::path::PathBuf;

pub use crate::reconcile::executor::ApplyError;

/// Result type for sam-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sam-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The same file is required by two distinct modes. Unrecoverable:
    /// there is no single expected location for the file.
    #[error("Sound file '{filename}' is required by mode '{first}' and also by mode '{second}'")]
    OwnershipConflict {
        filename: String,
        first: String,
        second: String,
    },

    /// A mode's pools assign two different tracks to the same sound name.
    #[error("Sound '{sound}' is pooled onto track '{first}' and track '{second}' in mode '{mode}'")]
    PoolTrackConflict {
        mode: String,
        sound: String,
        first: String,
        second: String,
    },

    /// A sound pool without a track has no folder to resolve to.
    #[error("Sound pool '{pool}' in mode '{mode}' has no track")]
    PoolMissingTrack { mode: String, pool: String },

    /// One file resolves to two different tracks within a single mode.
    #[error("File '{filename}' resolves to track '{first}' and track '{second}' in mode '{mode}'")]
    TrackConflict {
        mode: String,
        filename: String,
        first: String,
        second: String,
    },

    /// A mode configuration document could not be parsed.
    #[error("Failed to parse mode config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// Aggregated per-file failures from applying a plan.
    #[error(transparent)]
    Apply(#[from] ApplyError),

    /// Filesystem error from sam-fs
    #[error(transparent)]
    Fs(#[from] sam_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
