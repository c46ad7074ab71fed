//! [`TestMachine`] builder for reconciliation test scenarios.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use sam_fs::{MachineLayout, NormalizedPath};

/// A temporary machine root and source-media root with helpers for test
/// setup and assertion.
///
/// # Example
///
/// ```rust,no_run
/// use sam_test_utils::TestMachine;
///
/// let machine = TestMachine::new();
/// machine.add_mode_config("main", "sounds:\n  boot:\n    file: boot.wav\n    track: sfx\n");
/// machine.add_machine_file("modes/main/sounds/sfx/boot.wav");
/// machine.assert_machine_file_exists("modes/main/sounds/sfx/boot.wav");
/// ```
pub struct TestMachine {
    machine_dir: TempDir,
    source_dir: TempDir,
}

impl Default for TestMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl TestMachine {
    /// Create empty machine and source-media directories.
    pub fn new() -> Self {
        Self {
            machine_dir: TempDir::new().unwrap(),
            source_dir: TempDir::new().unwrap(),
        }
    }

    /// The machine root as a normalized path.
    pub fn machine_root(&self) -> NormalizedPath {
        NormalizedPath::new(self.machine_dir.path())
    }

    /// The source-media root as a normalized path.
    pub fn source_root(&self) -> NormalizedPath {
        NormalizedPath::new(self.source_dir.path())
    }

    /// The layout of the machine root.
    pub fn layout(&self) -> MachineLayout {
        MachineLayout::new(self.machine_root())
    }

    /// Write a mode configuration document at the conventional location
    /// `modes/{mode}/config/{mode}.yaml`.
    pub fn add_mode_config(&self, mode: &str, yaml: &str) {
        let dir = self.machine_dir.path().join("modes").join(mode).join("config");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("{mode}.yaml")), yaml).unwrap();
    }

    /// Write a placeholder asset file inside the machine tree.
    pub fn add_machine_file(&self, rel: &str) -> NormalizedPath {
        Self::write_placeholder(self.machine_dir.path(), rel);
        self.machine_root().join(rel)
    }

    /// Write a placeholder asset file inside the source-media tree.
    pub fn add_source_file(&self, rel: &str) -> NormalizedPath {
        Self::write_placeholder(self.source_dir.path(), rel);
        self.source_root().join(rel)
    }

    fn write_placeholder(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"audio-bytes").unwrap();
    }

    /// Assert that `rel` (relative to the machine root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_machine_file_exists(&self, rel: &str) {
        let full = self.machine_dir.path().join(rel);
        assert!(
            full.exists(),
            "Expected machine file to exist: {}",
            full.display()
        );
    }

    /// Assert that `rel` (relative to the machine root) does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_machine_file_not_exists(&self, rel: &str) {
        let full = self.machine_dir.path().join(rel);
        assert!(
            !full.exists(),
            "Expected machine file NOT to exist: {}",
            full.display()
        );
    }
}
