//! Info target: print the resolved configuration
//!
//! Secrets are shown masked; only their presence is visible.

use crate::core::context::PipelineContext;
use crate::core::error::PipelineResult;
use crate::utils::describe_secret;

pub fn run(ctx: &PipelineContext) -> PipelineResult<()> {
  for (key, value) in info_lines(ctx) {
    println!("   {:<24} {}", key, value);
  }
  Ok(())
}

/// Key/value pairs shown by the Info target
pub fn info_lines(ctx: &PipelineContext) -> Vec<(&'static str, String)> {
  let config = &ctx.config;
  let optional = |v: Option<&str>| v.unwrap_or("<not set>").to_string();

  vec![
    ("Started", ctx.started_at.format("%Y-%m-%d %H:%M:%S").to_string()),
    ("Configuration", config.configuration.to_string()),
    ("Server build", ctx.ci.is_server_build().to_string()),
    ("Branch", ctx.repo.branch.clone()),
    ("Pull request", ctx.repo.is_pull_request.to_string()),
    ("Commit", ctx.repo.head_sha.clone()),
    (
      "Repository",
      ctx
        .repo
        .github
        .as_ref()
        .map(|(owner, name)| format!("{}/{}", owner, name))
        .unwrap_or_else(|| "<unknown>".to_string()),
    ),
    ("Version", ctx.version.sem_ver.clone()),
    ("Package version", ctx.version.nuget_version_v2.clone()),
    ("Informational version", ctx.version.informational_version.clone()),
    ("Project", config.project.display().to_string()),
    ("Artifacts directory", config.artifacts_dir.display().to_string()),
    ("Artifacts type", config.artifacts_type.clone()),
    ("Excluded artifacts", optional(config.excluded_artifacts_type.as_deref())),
    ("Changelog", config.changelog.display().to_string()),
    ("Copyright", optional(config.copyright.as_deref())),
    ("GitHub feed", optional(ctx.github_nuget_feed().as_deref())),
    ("MyGet feed", optional(config.myget_feed.as_deref())),
    ("MyGet API key", describe_secret(config.myget_api_key.as_deref())),
    ("NuGet feed", optional(config.nuget_feed.as_deref())),
    ("NuGet API key", describe_secret(config.nuget_api_key.as_deref())),
    ("GitHub token", describe_secret(config.github_token.as_deref())),
  ]
}
