//! System git backend - zero dependencies
//!
//! Uses git plumbing commands for every query the pipeline needs:
//! - HEAD commit and branch
//! - Nearest version tag (`git describe`)
//! - Commit counts for prerelease numbering
//! - The `origin` remote URL

use crate::core::error::{GitError, PipelineError, PipelineResult, ResultExt};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;

static DESCRIBE_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^(?P<tag>.+)-(?P<count>\d+)-g(?P<sha>[0-9a-f]+)$").expect("static regex"));

/// Nearest tag reachable from HEAD
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDescription {
  pub tag: String,
  /// Commits between the tag and HEAD
  pub commits_since: u64,
}

impl TagDescription {
  /// Parse `git describe --long` output (`<tag>-<count>-g<sha>`)
  pub fn parse(output: &str) -> Option<Self> {
    let caps = DESCRIBE_RE.captures(output.trim())?;
    Some(Self {
      tag: caps["tag"].to_string(),
      commits_since: caps["count"].parse().ok()?,
    })
  }
}

/// Git backend using system git (zero crate dependencies)
pub struct SystemGit {
  /// Repository working directory
  pub(crate) repo_path: PathBuf,

  /// Working tree root
  pub(crate) work_tree: PathBuf,
}

impl SystemGit {
  /// Open a git repository
  ///
  /// This performs ONE subprocess call to get the repository metadata.
  pub fn open(path: &Path) -> PipelineResult<Self> {
    let output = Command::new("git")
      .arg("-C")
      .arg(path)
      .args(["rev-parse", "--show-toplevel"])
      .output()
      .context("Failed to execute git rev-parse")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      if stderr.contains("not a git repository") {
        return Err(PipelineError::Git(GitError::RepoNotFound {
          path: path.to_path_buf(),
        }));
      }
      return Err(PipelineError::message(format!(
        "Failed to open git repository: {}",
        stderr
      )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let work_tree = stdout.trim();

    Ok(Self {
      repo_path: path.to_path_buf(),
      work_tree: PathBuf::from(work_tree),
    })
  }

  /// Working tree root
  pub fn work_tree(&self) -> &Path {
    &self.work_tree
  }

  /// Get HEAD commit SHA
  pub fn head_commit(&self) -> PipelineResult<String> {
    self.run(&["rev-parse", "HEAD"])
  }

  /// Get current branch name (`HEAD` when detached)
  pub fn current_branch(&self) -> PipelineResult<String> {
    let output = self
      .git_cmd()
      .args(["rev-parse", "--abbrev-ref", "HEAD"])
      .output()
      .context("Failed to get current branch")?;

    if !output.status.success() {
      return Ok("HEAD".to_string()); // Detached HEAD or unborn branch
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Describe HEAD relative to the nearest version-looking tag
  ///
  /// Returns `None` when no tag is reachable.
  pub fn describe_version_tag(&self) -> PipelineResult<Option<TagDescription>> {
    let output = self
      .git_cmd()
      .args([
        "describe",
        "--tags",
        "--long",
        "--abbrev=40",
        "--match",
        "v[0-9]*",
        "--match",
        "[0-9]*",
      ])
      .output()
      .context("Failed to run git describe")?;

    if !output.status.success() {
      tracing::debug!(
        stderr = %String::from_utf8_lossy(&output.stderr).trim(),
        "no version tag reachable from HEAD"
      );
      return Ok(None);
    }

    Ok(TagDescription::parse(&String::from_utf8_lossy(&output.stdout)))
  }

  /// Number of commits reachable from HEAD
  pub fn commit_count(&self) -> PipelineResult<u64> {
    let count = self.run(&["rev-list", "--count", "HEAD"])?;
    count
      .parse()
      .map_err(|_| PipelineError::message(format!("Unexpected rev-list output: {}", count)))
  }

  /// URL of a named remote, `None` if the remote is not configured
  pub fn remote_url(&self, remote: &str) -> PipelineResult<Option<String>> {
    let output = self
      .git_cmd()
      .args(["remote", "get-url", remote])
      .output()
      .context("Failed to read remote URL")?;

    if !output.status.success() {
      return Ok(None);
    }

    let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Ok((!url.is_empty()).then_some(url))
  }

  /// Run a git command and return trimmed stdout
  fn run(&self, args: &[&str]) -> PipelineResult<String> {
    let output = self
      .git_cmd()
      .args(args)
      .output()
      .with_context(|| format!("Failed to execute git {}", args.join(" ")))?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(PipelineError::Git(GitError::CommandFailed {
        command: format!("git {}", args.join(" ")),
        stderr: stderr.to_string(),
      }));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to repo path
  /// - Clears environment variables
  /// - Whitelists only PATH and HOME
  /// - Adds safe configuration overrides
  pub(crate) fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.repo_path);

    // Isolated environment (don't trust global config)
    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }

    cmd.arg("-c").arg("advice.detachedHead=false");
    cmd.arg("-c").arg("core.quotePath=false"); // Don't escape non-ASCII

    cmd
  }
}

/// Extract `(owner, name)` from a GitHub remote URL
///
/// Accepts `https://github.com/owner/name(.git)`, `git@github.com:owner/name(.git)`
/// and `ssh://git@github.com/owner/name(.git)`.
pub fn parse_github_remote(url: &str) -> Option<(String, String)> {
  let url = url.trim();
  let path = if let Some(rest) = url.strip_prefix("git@") {
    rest.split_once(':')?.1
  } else {
    let without_scheme = url.split_once("://")?.1;
    without_scheme.split_once('/')?.1
  };

  let path = path.trim_end_matches('/').trim_end_matches(".git");
  let mut parts = path.rsplitn(2, '/');
  let name = parts.next()?;
  let owner = parts.next()?.rsplit('/').next()?;

  if owner.is_empty() || name.is_empty() {
    return None;
  }
  Some((owner.to_string(), name.to_string()))
}
