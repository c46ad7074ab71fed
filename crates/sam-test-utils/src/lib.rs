//! Shared test utilities for the sound-asset-manager workspace.
//!
//! Provides the [`TestMachine`] fixture builder used across crate test
//! suites. Dev-dependency only — never published.

pub mod machine;

pub use machine::TestMachine;
