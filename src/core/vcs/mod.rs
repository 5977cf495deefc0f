pub mod branch;
pub mod system_git;

pub use branch::BranchKind;
pub use system_git::{SystemGit, TagDescription, parse_github_remote};
