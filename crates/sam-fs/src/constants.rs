//! Audio filename rules and machine directory names.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

/// Extensions recognized as audio assets. Matching is a case-sensitive
/// exact-suffix check; `boot.WAV` is not an asset.
pub const AUDIO_EXTENSIONS: [&str; 5] = ["ogg", "wav", "mp3", "flac", "aac"];

static AUDIO_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(ogg|wav|mp3|flac|aac)$").unwrap());

static BACKUP_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.original\.(ogg|wav|mp3|flac|aac)$").unwrap());

/// Whether a filename carries a recognized audio extension.
pub fn is_audio_file(filename: &str) -> bool {
    AUDIO_SUFFIX.is_match(filename)
}

/// Whether a filename follows the backup convention `name.original.ext`.
///
/// Backup files are tracked separately from active assets and never take
/// part in lookups or duplicate detection.
pub fn is_backup_file(filename: &str) -> bool {
    BACKUP_SUFFIX.is_match(filename)
}

/// Derive the backup name for an audio filename by inserting `.original`
/// before the final extension: `boot.wav` becomes `boot.original.wav`.
///
/// Returns `None` when the filename has no recognized audio extension.
pub fn backup_file_name(filename: &str) -> Option<String> {
    if !is_audio_file(filename) {
        return None;
    }
    let idx = filename.rfind('.')?;
    Some(format!(
        "{}.original{}",
        &filename[..idx],
        &filename[idx..]
    ))
}

/// Well-known directory names inside a machine root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachinePath {
    /// The `modes` directory holding per-mode configuration and assets
    ModesDir,
    /// The `sounds` directory inside each top-level mode
    SoundsDir,
    /// The exports staging directory
    ExportsDir,
    /// The resample working root
    ResampleDir,
    /// Pre-conversion originals inside the resample root
    ResampleOriginals,
    /// Converted media awaiting import inside the resample root
    ResampleConverted,
}

impl MachinePath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ModesDir => "modes",
            Self::SoundsDir => "sounds",
            Self::ExportsDir => "sam_exports",
            Self::ResampleDir => "sam_resample",
            Self::ResampleOriginals => "sam_resample/originals",
            Self::ResampleConverted => "sam_resample/converted",
        }
    }
}

impl AsRef<Path> for MachinePath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for MachinePath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for MachinePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
