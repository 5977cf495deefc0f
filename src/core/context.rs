//! Pipeline context - resolve once, pass everywhere
//!
//! Everything the targets read is gathered up front in `main.rs`:
//! configuration, CI environment, repository facts and version strings. The
//! context is immutable afterwards; targets only get `&PipelineContext`.

use crate::core::ci::CiEnvironment;
use crate::core::config::{BuildConfig, ConfigOverrides, FileConfig};
use crate::core::error::PipelineResult;
use crate::core::vcs::{BranchKind, SystemGit, parse_github_remote};
use crate::release::version::VersionInfo;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Facts about the checkout the pipeline runs in
#[derive(Debug, Clone, Serialize)]
pub struct RepositoryInfo {
  pub branch: String,
  pub kind: BranchKind,
  pub head_sha: String,
  pub is_pull_request: bool,
  /// `(owner, name)` on GitHub, when known
  pub github: Option<(String, String)>,
}

impl RepositoryInfo {
  pub fn is_on_develop_branch(&self) -> bool {
    self.kind.is_develop()
  }

  pub fn is_on_release_branch(&self) -> bool {
    self.kind.is_release()
  }

  pub fn is_on_main_or_master_branch(&self) -> bool {
    self.kind.is_main_or_master()
  }
}

/// Immutable state shared by all targets
#[derive(Debug, Clone)]
pub struct PipelineContext {
  /// Repository root (absolute path)
  pub root: PathBuf,
  pub config: BuildConfig,
  pub ci: CiEnvironment,
  pub repo: RepositoryInfo,
  pub version: VersionInfo,
  /// Local timestamp the invocation started at
  pub started_at: chrono::DateTime<chrono::Local>,
}

impl PipelineContext {
  /// Build context for the repository containing `start_dir`
  pub fn build(start_dir: &Path, overrides: ConfigOverrides) -> PipelineResult<Self> {
    let git = SystemGit::open(start_dir)?;
    let root = git.work_tree().to_path_buf();
    let ci = CiEnvironment::detect();

    let file = FileConfig::load(&root)?;
    let config = BuildConfig::resolve(&root, overrides, file, &ci)?;

    let branch = match ci.branch() {
      Some(branch) => branch,
      None => git.current_branch()?,
    };
    let head_sha = git.head_commit()?;
    let is_pull_request = ci.is_pull_request();

    let github = match ci.owner_and_name() {
      Some(pair) => Some(pair),
      None => git.remote_url("origin")?.as_deref().and_then(parse_github_remote),
    };

    let version = VersionInfo::from_git(&git, &branch, is_pull_request, config.version_override.clone())?;
    tracing::debug!(
      branch = %branch,
      version = %version.sem_ver,
      nuget = %version.nuget_version_v2,
      "resolved version"
    );

    let repo = RepositoryInfo {
      kind: BranchKind::classify(&branch),
      branch,
      head_sha,
      is_pull_request,
      github,
    };

    Ok(Self {
      root,
      config,
      ci,
      repo,
      version,
      started_at: chrono::Local::now(),
    })
  }

  /// GitHub package feed (only on GitHub Actions)
  pub fn github_nuget_feed(&self) -> Option<String> {
    self.ci.github_nuget_feed()
  }
}
