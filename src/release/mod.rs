//! Versioning, artifacts and release publishing
//!
//! - **version**: Version strings derived from tags, branch and commit distance
//! - **changelog**: Release notes taken from CHANGELOG.md sections
//! - **artifacts**: Package discovery with include/exclude patterns
//! - **github**: GitHub Releases REST client behind the `ReleaseApi` trait
//! - **publish**: Draft, upload and publish sequence for a release

pub mod artifacts;
pub mod changelog;
pub mod github;
pub mod publish;
pub mod version;

pub use artifacts::ArtifactSet;
pub use github::{GitHubClient, NewRelease, ReleaseApi};
pub use publish::{RepoSlug, publish_release};
