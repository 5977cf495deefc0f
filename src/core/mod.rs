//! Core building blocks shared by every target
//!
//! - **ci**: GitHub Actions environment detection
//! - **config**: Layered build configuration (CLI, pack-rail.toml, CI, defaults)
//! - **context**: Immutable pipeline context built once in main.rs
//! - **error**: Error types with contextual help messages and exit codes
//! - **vcs**: Git queries (SystemGit) and branch classification

pub mod ci;
pub mod config;
pub mod context;
pub mod error;
pub mod vcs;
