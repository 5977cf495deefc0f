//! Branch classification used by target gates and version labels
//!
//! Follows the git-flow names the publish targets are keyed on:
//! `main`/`master`, `dev`/`develop`/`development`, `release/*`/`releases/*`.

use serde::Serialize;

/// What kind of branch a build runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchKind {
  Main,
  Develop,
  Release,
  Other,
}

impl BranchKind {
  /// Classify a branch name (with or without a `refs/heads/` prefix)
  pub fn classify(branch: &str) -> Self {
    let name = normalize(branch);
    let lower = name.to_ascii_lowercase();

    match lower.as_str() {
      "main" | "master" => BranchKind::Main,
      "dev" | "develop" | "development" => BranchKind::Develop,
      _ if lower.starts_with("release/") || lower.starts_with("releases/") => BranchKind::Release,
      _ => BranchKind::Other,
    }
  }

  pub fn is_main_or_master(self) -> bool {
    self == BranchKind::Main
  }

  pub fn is_develop(self) -> bool {
    self == BranchKind::Develop
  }

  pub fn is_release(self) -> bool {
    self == BranchKind::Release
  }
}

/// Strip `refs/heads/` and `origin/` prefixes
pub fn normalize(branch: &str) -> &str {
  let branch = branch.trim();
  let branch = branch.strip_prefix("refs/heads/").unwrap_or(branch);
  branch.strip_prefix("origin/").unwrap_or(branch)
}

/// Version embedded in a release branch name (`releases/1.4.0` → `1.4.0`)
pub fn release_branch_version(branch: &str) -> Option<semver::Version> {
  let name = normalize(branch);
  let (_, tail) = name.split_once('/')?;
  let tail = tail.trim_start_matches(['v', 'V']);
  semver::Version::parse(tail)
    .ok()
    .or_else(|| parse_partial_version(tail))
}

/// Accept `1.4` as `1.4.0`
fn parse_partial_version(text: &str) -> Option<semver::Version> {
  let mut parts = text.split('.');
  let major = parts.next()?.parse().ok()?;
  let minor = parts.next().map_or(Some(0), |p| p.parse().ok())?;
  if parts.next().is_some() {
    return None;
  }
  Some(semver::Version::new(major, minor, 0))
}
