//! Version derivation from git state
//!
//! Computes every version string the build stamps into the package from three
//! inputs: the nearest version tag, the branch, and the commit distance.
//!
//! | Branch            | Core version                      | Prerelease label |
//! |-------------------|-----------------------------------|------------------|
//! | main / master     | tag, or patch bump after the tag  | none             |
//! | release/X.Y.Z     | from the branch name              | `beta`           |
//! | dev / develop     | minor bump                        | `alpha`          |
//! | pull request      | minor bump                        | `pr`             |
//! | anything else     | minor bump                        | branch name      |

use crate::core::error::{PipelineResult, ResultExt};
use crate::core::vcs::branch::{self, BranchKind};
use crate::core::vcs::{SystemGit, TagDescription};
use semver::Version;
use serde::Serialize;

/// Everything needed to compute a [`VersionInfo`], gathered from git
#[derive(Debug, Clone)]
pub struct VersionInput {
  /// Nearest version tag, if any
  pub tag: Option<TagDescription>,
  /// Total commits reachable from HEAD (used when there is no tag)
  pub total_commits: u64,
  pub branch: String,
  pub is_pull_request: bool,
  pub sha: String,
  /// Explicit `Major.Minor.Patch` from the command line or config file
  pub override_version: Option<Version>,
}

/// Version strings for one build. Immutable once computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
  pub major_minor_patch: String,
  pub sem_ver: String,
  pub nuget_version_v2: String,
  pub assembly_sem_ver: String,
  pub assembly_sem_file_ver: String,
  pub informational_version: String,
  /// Empty for stable builds
  pub pre_release_tag: String,
  pub commits_since_version_source: u64,
  pub sha: String,
  pub branch: String,
}

impl VersionInfo {
  /// Gather inputs from the repository and derive versions
  pub fn from_git(
    git: &SystemGit,
    branch: &str,
    is_pull_request: bool,
    override_version: Option<Version>,
  ) -> PipelineResult<Self> {
    let sha = git.head_commit().context("Failed to resolve HEAD for versioning")?;
    let tag = git.describe_version_tag()?;
    let total_commits = if tag.is_some() { 0 } else { git.commit_count()? };

    let input = VersionInput {
      tag,
      total_commits,
      branch: branch.to_string(),
      is_pull_request,
      sha,
      override_version,
    };
    Ok(Self::derive(&input))
  }

  /// Pure version computation
  pub fn derive(input: &VersionInput) -> Self {
    let kind = BranchKind::classify(&input.branch);

    let parsed_tag = input
      .tag
      .as_ref()
      .and_then(|t| parse_tag(&t.tag).map(|v| (v, t.commits_since)));

    let (base, commits, base_is_release) = match parsed_tag {
      Some((version, commits)) => {
        let released = version.pre.is_empty();
        (Version::new(version.major, version.minor, version.patch), commits, released)
      }
      None => (Version::new(0, 1, 0), input.total_commits, false),
    };

    // Bumps only apply on top of a version that has actually shipped
    let minor_bump = || {
      if base_is_release {
        Version::new(base.major, base.minor.saturating_add(1), 0)
      } else {
        base.clone()
      }
    };

    let (core, label) = if input.is_pull_request {
      (minor_bump(), Some("pr".to_string()))
    } else {
      match kind {
        BranchKind::Main => {
          let core = if base_is_release && commits > 0 {
            Version::new(base.major, base.minor, base.patch.saturating_add(1))
          } else {
            base.clone()
          };
          (core, None)
        }
        BranchKind::Release => {
          let core = branch::release_branch_version(&input.branch).unwrap_or_else(minor_bump);
          (core, Some("beta".to_string()))
        }
        BranchKind::Develop => (minor_bump(), Some("alpha".to_string())),
        BranchKind::Other => {
          let label = sanitize_label(branch::normalize(&input.branch));
          let label = if label.is_empty() || label == "HEAD" {
            "ci".to_string()
          } else {
            label
          };
          (minor_bump(), Some(label))
        }
      }
    };

    let core = input.override_version.clone().unwrap_or(core);
    let mmp = format!("{}.{}.{}", core.major, core.minor, core.patch);

    let (pre_release_tag, sem_ver, nuget_version_v2) = match &label {
      Some(label) => (
        format!("{}.{}", label, commits),
        format!("{}-{}.{}", mmp, label, commits),
        format!("{}-{}{:04}", mmp, label, commits),
      ),
      None => (String::new(), mmp.clone(), mmp.clone()),
    };

    let assembly = format!("{}.0", mmp);
    let informational_version = format!(
      "{}+Branch.{}.Sha.{}",
      sem_ver,
      sanitize_label(branch::normalize(&input.branch)),
      input.sha
    );

    Self {
      major_minor_patch: mmp,
      sem_ver,
      nuget_version_v2,
      assembly_sem_ver: assembly.clone(),
      assembly_sem_file_ver: assembly,
      informational_version,
      pre_release_tag,
      commits_since_version_source: commits,
      sha: input.sha.clone(),
      branch: input.branch.clone(),
    }
  }

  /// Whether this build produces a prerelease
  pub fn is_prerelease(&self) -> bool {
    !self.pre_release_tag.is_empty()
  }
}

/// Parse a tag as semver, tolerating a leading `v`
fn parse_tag(tag: &str) -> Option<Version> {
  Version::parse(tag.trim_start_matches(['v', 'V'])).ok()
}

/// Keep `[0-9A-Za-z-]`, replacing everything else with `-`
pub fn sanitize_label(text: &str) -> String {
  let replaced: String = text
    .chars()
    .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '-' })
    .collect();
  replaced.trim_matches('-').to_string()
}
