//! The on-disk layout of a machine root.
//!
//! Every required asset has exactly one expected location:
//!
//! ```text
//! {root}/modes/{top_level_mode}/sounds/{track}/{filename}
//! ```

use crate::constants::MachinePath;
use crate::path::NormalizedPath;

/// Path construction for a machine root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineLayout {
    root: NormalizedPath,
}

impl MachineLayout {
    pub fn new(root: NormalizedPath) -> Self {
        Self { root }
    }

    /// The machine root this layout was built for.
    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    /// The `modes` directory holding configuration documents and assets.
    pub fn modes_root(&self) -> NormalizedPath {
        self.root.join(MachinePath::ModesDir.as_str())
    }

    /// The sounds directory for a track within a top-level mode.
    pub fn sounds_dir(&self, top_level_mode: &str, track: &str) -> NormalizedPath {
        self.modes_root()
            .join(top_level_mode)
            .join(MachinePath::SoundsDir.as_str())
            .join(track)
    }

    /// The expected location of a required asset.
    pub fn expected_path(
        &self,
        top_level_mode: &str,
        track: &str,
        filename: &str,
    ) -> NormalizedPath {
        self.sounds_dir(top_level_mode, track).join(filename)
    }

    /// The exports staging directory.
    pub fn exports_dir(&self) -> NormalizedPath {
        self.root.join(MachinePath::ExportsDir.as_str())
    }

    /// Pre-conversion originals parked by the resample workflow.
    pub fn resample_originals(&self) -> NormalizedPath {
        self.root.join(MachinePath::ResampleOriginals.as_str())
    }

    /// Converted media waiting to be imported back into mode folders.
    pub fn resample_converted(&self) -> NormalizedPath {
        self.root.join(MachinePath::ResampleConverted.as_str())
    }

    /// Directories the machine walk must not index: staging areas hold
    /// copies of mode assets and would otherwise show up as duplicates.
    pub fn walk_excludes(&self) -> Vec<NormalizedPath> {
        vec![
            self.exports_dir(),
            self.resample_originals(),
            self.resample_converted(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_path_follows_the_contract() {
        let layout = MachineLayout::new(NormalizedPath::new("/machine"));
        assert_eq!(
            layout.expected_path("main", "sfx", "boot.wav").as_str(),
            "/machine/modes/main/sounds/sfx/boot.wav"
        );
    }

    #[test]
    fn staging_directories_are_excluded_from_walks() {
        let layout = MachineLayout::new(NormalizedPath::new("/machine"));
        let excludes = layout.walk_excludes();
        assert!(excludes.contains(&NormalizedPath::new("/machine/sam_exports")));
        assert!(excludes.contains(&NormalizedPath::new("/machine/sam_resample/originals")));
        assert!(excludes.contains(&NormalizedPath::new("/machine/sam_resample/converted")));
    }
}
