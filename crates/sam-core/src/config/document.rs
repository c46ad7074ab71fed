//! Serde model of a mode configuration document.
//!
//! Only the asset-bearing sections are modeled; mode documents carry many
//! other sections that the asset manager ignores.

use std::collections::BTreeMap;

use serde::Deserialize;

/// A parsed mode configuration document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModeDocument {
    /// Names of imported documents. Importing a document makes this mode
    /// the parent of the imported one.
    #[serde(default)]
    pub config: Vec<String>,

    /// Individual sound declarations, keyed by sound name.
    #[serde(default)]
    pub sounds: BTreeMap<String, SoundDecl>,

    /// Pooled sound declarations, keyed by pool name.
    #[serde(default)]
    pub sound_pools: BTreeMap<String, PoolDecl>,
}

impl ModeDocument {
    /// Parse a document from YAML source.
    pub fn from_yaml(source: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(source)
    }
}

/// An individual sound declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct SoundDecl {
    /// The asset filename this sound plays.
    pub file: String,

    /// Explicit track assignment. An empty string counts as unset.
    #[serde(default)]
    pub track: Option<String>,
}

impl SoundDecl {
    /// The explicit track, when set and non-empty.
    pub fn explicit_track(&self) -> Option<&str> {
        self.track.as_deref().filter(|t| !t.is_empty())
    }
}

/// A pooled sound declaration: several sounds sharing one track.
#[derive(Debug, Clone, Deserialize)]
pub struct PoolDecl {
    pub sounds: SoundList,

    #[serde(default)]
    pub track: Option<String>,
}

/// Pool sound lists appear either as a YAML sequence or as a single
/// comma-separated scalar.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SoundList {
    Many(Vec<String>),
    Inline(String),
}

impl SoundList {
    /// The sound names in declaration order, trimmed.
    pub fn names(&self) -> Vec<String> {
        match self {
            Self::Many(names) => names.iter().map(|n| n.trim().to_string()).collect(),
            Self::Inline(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}
