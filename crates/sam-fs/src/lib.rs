//! Filesystem layer for the sound asset manager
//!
//! Provides normalized path handling, the machine directory layout contract,
//! audio filename rules, the file-tree index, and per-file I/O helpers.

pub mod constants;
pub mod error;
pub mod io;
pub mod layout;
pub mod path;
pub mod tree;

pub use constants::{AUDIO_EXTENSIONS, MachinePath, backup_file_name, is_audio_file, is_backup_file};
pub use error::{Error, Result};
pub use layout::MachineLayout;
pub use path::NormalizedPath;
pub use tree::FileTreeIndex;
