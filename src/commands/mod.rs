//! CLI commands for pack-rail
//!
//! - **run**: Plan the invoked target and execute it (or print the plan)

pub mod run;

pub use run::{RunOptions, run_pipeline};
