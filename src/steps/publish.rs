//! PublishToGithub, PublishToMyGet and PublishToNuGet
//!
//! All three push every discovered artifact to one feed and differ only in
//! where the feed URL and API key come from.

use crate::core::context::PipelineContext;
use crate::core::error::{ConfigError, PipelineError, PipelineResult};
use crate::release::ArtifactSet;
use crate::tools::{PushSettings, Toolchain};
use crate::ui::ArtifactProgress;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
  GitHub,
  MyGet,
  NuGet,
}

impl Feed {
  fn target_name(self) -> &'static str {
    match self {
      Feed::GitHub => "PublishToGithub",
      Feed::MyGet => "PublishToMyGet",
      Feed::NuGet => "PublishToNuGet",
    }
  }

  fn label(self) -> &'static str {
    match self {
      Feed::GitHub => "GitHub",
      Feed::MyGet => "MyGet",
      Feed::NuGet => "NuGet",
    }
  }

  /// Feed URL and API key, or the name of the first missing setting
  fn credentials(self, ctx: &PipelineContext) -> Result<(String, String), &'static str> {
    let config = &ctx.config;
    let (source, source_field, key, key_field) = match self {
      Feed::GitHub => (
        ctx.github_nuget_feed(),
        "GITHUB_REPOSITORY_OWNER (GitHub Actions)",
        config.github_token.clone(),
        "GITHUB_TOKEN",
      ),
      Feed::MyGet => (config.myget_feed.clone(), "myget_feed", config.myget_api_key.clone(), "MYGET_API_KEY"),
      Feed::NuGet => (config.nuget_feed.clone(), "nuget_feed", config.nuget_api_key.clone(), "NUGET_API_KEY"),
    };

    let source = source.ok_or(source_field)?;
    let key = key.ok_or(key_field)?;
    Ok((source, key))
  }
}

pub fn run(feed: Feed, ctx: &PipelineContext, toolchain: &dyn Toolchain) -> PipelineResult<()> {
  let (source, api_key) = feed.credentials(ctx).map_err(|field| {
    PipelineError::Config(ConfigError::MissingField {
      field: field.to_string(),
      target: feed.target_name().to_string(),
    })
  })?;

  let artifacts = ArtifactSet::discover(
    &ctx.config.artifacts_dir,
    &ctx.config.artifacts_type,
    &ctx.config.exclude_filter,
  )?;

  let pushed = push_all(toolchain, &artifacts, &source, &api_key, feed.label())?;
  if pushed > 0 {
    println!("   ✅ Pushed {} package(s) to {}", pushed, feed.label());
  }
  Ok(())
}

/// Push each artifact in order; the first failure stops the batch
pub fn push_all(
  toolchain: &dyn Toolchain,
  artifacts: &ArtifactSet,
  source: &str,
  api_key: &str,
  label: &str,
) -> PipelineResult<usize> {
  if artifacts.is_empty() {
    println!("   ⚠️  No artifacts found; nothing to push to {}", label);
    tracing::warn!(feed = %label, "no artifacts to push");
    return Ok(0);
  }

  let mut progress = ArtifactProgress::new(artifacts.len(), format!("Pushing to {}", label));
  for package in artifacts.iter() {
    toolchain.push(&push_settings(package, source, api_key))?;
    progress.inc();
  }
  Ok(artifacts.len())
}

fn push_settings(package: &Path, source: &str, api_key: &str) -> PushSettings {
  PushSettings {
    package: package.to_path_buf(),
    source: source.to_string(),
    api_key: api_key.to_string(),
  }
}
