//! Mode configuration parsing and the requirement index.

pub mod document;
pub mod mode;
pub mod requirements;

pub use document::{ModeDocument, PoolDecl, SoundDecl};
pub use mode::Mode;
pub use requirements::RequirementIndex;
