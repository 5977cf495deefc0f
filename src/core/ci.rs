//! GitHub Actions environment detection
//!
//! A build is a *server build* when `GITHUB_ACTIONS=true`. Server builds default to
//! the Release configuration and are the only place where the GitHub package feed
//! and token are available.

use std::collections::HashMap;

/// Snapshot of the GitHub Actions variables the pipeline cares about
#[derive(Debug, Clone, Default)]
pub struct CiEnvironment {
  pub is_github_actions: bool,
  /// Full ref, e.g. `refs/heads/dev` or `refs/pull/12/merge`
  pub git_ref: Option<String>,
  /// Source branch of a pull request
  pub head_ref: Option<String>,
  pub sha: Option<String>,
  /// `owner/name`
  pub repository: Option<String>,
  pub repository_owner: Option<String>,
  pub event_name: Option<String>,
  pub token: Option<String>,
  pub api_url: Option<String>,
}

impl CiEnvironment {
  /// Read from the process environment
  pub fn detect() -> Self {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  /// Read from an explicit map (tests, replay)
  #[allow(dead_code)] // Used by tests across modules
  pub fn from_map(vars: &HashMap<String, String>) -> Self {
    Self::from_lookup(|key| vars.get(key).cloned())
  }

  fn from_lookup<F>(lookup: F) -> Self
  where
    F: Fn(&str) -> Option<String>,
  {
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    Self {
      is_github_actions: lookup("GITHUB_ACTIONS").is_some_and(|v| v.eq_ignore_ascii_case("true")),
      git_ref: non_empty("GITHUB_REF"),
      head_ref: non_empty("GITHUB_HEAD_REF"),
      sha: non_empty("GITHUB_SHA"),
      repository: non_empty("GITHUB_REPOSITORY"),
      repository_owner: non_empty("GITHUB_REPOSITORY_OWNER"),
      event_name: non_empty("GITHUB_EVENT_NAME"),
      token: non_empty("GITHUB_TOKEN"),
      api_url: non_empty("GITHUB_API_URL"),
    }
  }

  /// Server builds run under GitHub Actions
  pub fn is_server_build(&self) -> bool {
    self.is_github_actions
  }

  /// Whether the workflow was triggered by a pull request
  pub fn is_pull_request(&self) -> bool {
    matches!(
      self.event_name.as_deref(),
      Some("pull_request") | Some("pull_request_target")
    ) || self.git_ref.as_deref().is_some_and(|r| r.starts_with("refs/pull/"))
  }

  /// Branch named by the CI ref, if it names one
  ///
  /// For pull requests the source branch is reported.
  pub fn branch(&self) -> Option<String> {
    if self.is_pull_request()
      && let Some(head) = &self.head_ref
    {
      return Some(head.clone());
    }
    self
      .git_ref
      .as_deref()
      .and_then(|r| r.strip_prefix("refs/heads/"))
      .map(str::to_string)
  }

  /// `(owner, name)` from `GITHUB_REPOSITORY`
  pub fn owner_and_name(&self) -> Option<(String, String)> {
    let repo = self.repository.as_deref()?;
    let (owner, name) = repo.split_once('/')?;
    if owner.is_empty() || name.is_empty() {
      return None;
    }
    Some((owner.to_string(), name.to_string()))
  }

  /// GitHub-hosted NuGet feed for the repository owner
  pub fn github_nuget_feed(&self) -> Option<String> {
    if !self.is_github_actions {
      return None;
    }
    let owner = self
      .repository_owner
      .clone()
      .or_else(|| self.owner_and_name().map(|(owner, _)| owner))?;
    Some(format!("https://nuget.pkg.github.com/{}/index.json", owner))
  }
}
