//! A single mode's required assets, grouped by track.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::document::ModeDocument;
use crate::error::{Error, Result};

/// Track used when nothing else determines one.
pub const DEFAULT_TRACK: &str = "unknown";

/// Filename-prefix conventions used as a track fallback: localized voice
/// lines and music beds follow fixed naming prefixes in the asset library.
const PREFIX_TRACKS: [(&str, &str); 2] = [("en_us_", "voice"), ("mus_", "music")];

fn prefix_track(filename: &str) -> Option<&'static str> {
    PREFIX_TRACKS
        .iter()
        .find(|(prefix, _)| filename.starts_with(prefix))
        .map(|(_, track)| *track)
}

/// A configuration unit declaring the audio assets it requires.
///
/// Built from one parsed [`ModeDocument`]; the track of each required file
/// is resolved here, in order: explicit track on the sound, then the track
/// of a pool naming the sound, then filename-prefix conventions, then
/// [`DEFAULT_TRACK`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mode {
    name: String,
    /// Track name to the files required on that track.
    tracks: BTreeMap<String, Vec<String>>,
    /// File to resolved track, for reverse lookups.
    file_tracks: BTreeMap<String, String>,
}

impl Mode {
    /// Build a mode from its parsed configuration document.
    ///
    /// # Errors
    ///
    /// Fails when the document's pools assign two different tracks to one
    /// sound name, when a pool has no track at all, or when one file would
    /// resolve to two different tracks.
    pub fn from_document(name: &str, doc: &ModeDocument) -> Result<Self> {
        let mut pool_tracks: BTreeMap<String, String> = BTreeMap::new();
        for (pool_name, pool) in &doc.sound_pools {
            let track = pool.track.as_deref().filter(|t| !t.is_empty()).ok_or_else(|| {
                Error::PoolMissingTrack {
                    mode: name.to_string(),
                    pool: pool_name.clone(),
                }
            })?;
            for sound in pool.sounds.names() {
                if let Some(previous) = pool_tracks.get(&sound)
                    && previous != track
                {
                    return Err(Error::PoolTrackConflict {
                        mode: name.to_string(),
                        sound,
                        first: previous.clone(),
                        second: track.to_string(),
                    });
                }
                pool_tracks.insert(sound, track.to_string());
            }
        }

        let mut tracks: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut file_tracks: BTreeMap<String, String> = BTreeMap::new();
        for (sound_name, decl) in &doc.sounds {
            let track = decl
                .explicit_track()
                .or_else(|| pool_tracks.get(sound_name).map(String::as_str))
                .or_else(|| prefix_track(&decl.file))
                .unwrap_or(DEFAULT_TRACK);

            match file_tracks.get(&decl.file) {
                Some(previous) if previous != track => {
                    return Err(Error::TrackConflict {
                        mode: name.to_string(),
                        filename: decl.file.clone(),
                        first: previous.clone(),
                        second: track.to_string(),
                    });
                }
                Some(_) => {} // same file, same track: collapse
                None => {
                    file_tracks.insert(decl.file.clone(), track.to_string());
                    tracks.entry(track.to_string()).or_default().push(decl.file.clone());
                }
            }
        }

        Ok(Self {
            name: name.to_string(),
            tracks,
            file_tracks,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The track a required file resolves to, if this mode requires it.
    pub fn track_for(&self, filename: &str) -> Option<&str> {
        self.file_tracks.get(filename).map(String::as_str)
    }

    /// Required files grouped by track.
    pub fn by_track(&self) -> &BTreeMap<String, Vec<String>> {
        &self.tracks
    }

    /// Every file this mode requires.
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.file_tracks.keys().map(String::as_str)
    }

    /// Number of required files.
    pub fn len(&self) -> usize {
        self.file_tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file_tracks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::document::ModeDocument;
    use rstest::rstest;

    fn mode_from(yaml: &str) -> Result<Mode> {
        let doc = ModeDocument::from_yaml(yaml).unwrap();
        Mode::from_document("test", &doc)
    }

    #[test]
    fn explicit_track_wins_over_pool_and_prefix() {
        let mode = mode_from(
            r#"
sounds:
  theme:
    file: mus_theme.ogg
    track: sfx
sound_pools:
  pool:
    sounds: theme
    track: voice
"#,
        )
        .unwrap();
        assert_eq!(mode.track_for("mus_theme.ogg"), Some("sfx"));
    }

    #[test]
    fn pool_track_wins_over_prefix() {
        let mode = mode_from(
            r#"
sounds:
  theme:
    file: mus_theme.ogg
sound_pools:
  pool:
    sounds: theme
    track: attract
"#,
        )
        .unwrap();
        assert_eq!(mode.track_for("mus_theme.ogg"), Some("attract"));
    }

    #[rstest]
    #[case("en_us_intro.ogg", "voice")]
    #[case("mus_theme.ogg", "music")]
    #[case("clank.wav", DEFAULT_TRACK)]
    fn prefix_conventions_then_default(#[case] file: &str, #[case] track: &str) {
        let mode = mode_from(&format!("sounds:\n  s:\n    file: {file}\n")).unwrap();
        assert_eq!(mode.track_for(file), Some(track));
    }

    #[test]
    fn conflicting_pool_tracks_fail() {
        let err = mode_from(
            r#"
sounds:
  a:
    file: a.wav
sound_pools:
  one:
    sounds: a
    track: sfx
  two:
    sounds: a
    track: voice
"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::PoolTrackConflict { .. }));
    }

    #[test]
    fn pool_without_track_fails() {
        let err = mode_from(
            r#"
sounds:
  a:
    file: a.wav
sound_pools:
  one:
    sounds: a
"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::PoolMissingTrack { .. }));
    }

    #[test]
    fn one_file_on_two_tracks_fails() {
        let err = mode_from(
            r#"
sounds:
  a:
    file: shared.wav
    track: sfx
  b:
    file: shared.wav
    track: voice
"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::TrackConflict { .. }));
    }

    #[test]
    fn one_file_declared_twice_on_one_track_collapses() {
        let mode = mode_from(
            r#"
sounds:
  a:
    file: shared.wav
    track: sfx
  b:
    file: shared.wav
    track: sfx
"#,
        )
        .unwrap();
        assert_eq!(mode.len(), 1);
        assert_eq!(mode.by_track()["sfx"], vec!["shared.wav"]);
    }
}
