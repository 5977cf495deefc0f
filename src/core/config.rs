//! Build configuration for pack-rail
//!
//! Values are layered, highest priority first:
//! 1. Command-line flags (secrets may also come from their environment variables)
//! 2. `pack-rail.toml` (searched in order: pack-rail.toml, .pack-rail.toml, .config/pack-rail.toml)
//! 3. GitHub Actions environment (token, API URL)
//! 4. Built-in defaults
//!
//! API keys are never read from the config file.
//!
//! ```toml
//! configuration = "release"
//! project = "src/MyPack/MyPack.csproj"
//! copyright = "Copyright (c) Acme"
//! artifacts_type = "*.nupkg"
//! excluded_artifacts_type = ".symbols.nupkg"
//!
//! [feeds]
//! myget = "https://www.myget.org/F/acme/api/v3/index.json"
//! nuget = "https://api.nuget.org/v3/index.json"
//! ```

use crate::core::ci::CiEnvironment;
use crate::core::error::{ConfigError, PipelineError, PipelineResult, ResultExt};
use crate::release::artifacts::ExcludeFilter;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_PROJECT: &str = "src/MyPack/MyPack.csproj";
pub const DEFAULT_ARTIFACTS_DIR: &str = ".artifacts";
pub const DEFAULT_CHANGELOG: &str = "CHANGELOG.md";
pub const DEFAULT_ARTIFACTS_TYPE: &str = "*.nupkg";
pub const DEFAULT_NUGET_FEED: &str = "https://api.nuget.org/v3/index.json";
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

/// Build configuration (maps to the toolchain's `--configuration`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Configuration {
  #[serde(alias = "Debug")]
  Debug,
  #[serde(alias = "Release")]
  Release,
}

impl Configuration {
  /// Debug locally, Release on a CI server
  pub fn default_for(ci: &CiEnvironment) -> Self {
    if ci.is_server_build() {
      Configuration::Release
    } else {
      Configuration::Debug
    }
  }
}

impl fmt::Display for Configuration {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Configuration::Debug => write!(f, "Debug"),
      Configuration::Release => write!(f, "Release"),
    }
  }
}

/// `pack-rail.toml` contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
  #[serde(default)]
  pub configuration: Option<Configuration>,
  #[serde(default)]
  pub project: Option<PathBuf>,
  #[serde(default)]
  pub artifacts_dir: Option<PathBuf>,
  #[serde(default)]
  pub changelog: Option<PathBuf>,
  #[serde(default)]
  pub copyright: Option<String>,
  #[serde(default)]
  pub artifacts_type: Option<String>,
  #[serde(default)]
  pub excluded_artifacts_type: Option<String>,
  /// `Major.Minor.Patch` overriding the derived version
  #[serde(default)]
  pub version: Option<String>,
  #[serde(default)]
  pub feeds: FeedsConfig,
  #[serde(default)]
  pub github: GitHubConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedsConfig {
  #[serde(default)]
  pub myget: Option<String>,
  #[serde(default)]
  pub nuget: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GitHubConfig {
  #[serde(default)]
  pub api_url: Option<String>,
  #[serde(default)]
  pub timeout_secs: Option<u64>,
}

impl FileConfig {
  /// Find config file in search order
  pub fn find_config_path(root: &Path) -> Option<PathBuf> {
    let candidates = [
      root.join("pack-rail.toml"),
      root.join(".pack-rail.toml"),
      root.join(".config").join("pack-rail.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load the config file, or defaults when there is none
  pub fn load(root: &Path) -> PipelineResult<Self> {
    let Some(config_path) = Self::find_config_path(root) else {
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: FileConfig = toml_edit::de::from_str(&content).map_err(|e| {
      PipelineError::Config(ConfigError::Parse {
        path: config_path.clone(),
        message: e.to_string(),
      })
    })?;

    tracing::debug!(path = %config_path.display(), "loaded config file");
    Ok(config)
  }
}

/// Values supplied on the command line (or their environment variables)
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
  pub configuration: Option<Configuration>,
  pub project: Option<PathBuf>,
  pub artifacts_dir: Option<PathBuf>,
  pub changelog: Option<PathBuf>,
  pub myget_feed: Option<String>,
  pub myget_api_key: Option<String>,
  pub nuget_feed: Option<String>,
  pub nuget_api_key: Option<String>,
  pub github_token: Option<String>,
  pub copyright: Option<String>,
  pub artifacts_type: Option<String>,
  pub excluded_artifacts_type: Option<String>,
  pub version: Option<String>,
}

/// Fully resolved, immutable configuration for one invocation
#[derive(Debug, Clone)]
pub struct BuildConfig {
  pub configuration: Configuration,
  /// Absolute project path
  pub project: PathBuf,
  /// Absolute artifacts directory
  pub artifacts_dir: PathBuf,
  /// Absolute changelog path
  pub changelog: PathBuf,
  pub myget_feed: Option<String>,
  pub myget_api_key: Option<String>,
  pub nuget_feed: Option<String>,
  pub nuget_api_key: Option<String>,
  pub github_token: Option<String>,
  pub copyright: Option<String>,
  pub artifacts_type: String,
  pub excluded_artifacts_type: Option<String>,
  pub exclude_filter: ExcludeFilter,
  pub version_override: Option<semver::Version>,
  pub github_api_url: String,
  pub http_timeout_secs: u64,
}

impl BuildConfig {
  /// Merge overrides, file, CI environment and defaults
  pub fn resolve(
    root: &Path,
    overrides: ConfigOverrides,
    file: FileConfig,
    ci: &CiEnvironment,
  ) -> PipelineResult<Self> {
    let absolute = |p: PathBuf| if p.is_absolute() { p } else { root.join(p) };
    let non_empty = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

    let configuration = overrides
      .configuration
      .or(file.configuration)
      .unwrap_or_else(|| Configuration::default_for(ci));

    let artifacts_type = non_empty(overrides.artifacts_type)
      .or(non_empty(file.artifacts_type))
      .unwrap_or_else(|| DEFAULT_ARTIFACTS_TYPE.to_string());
    glob::Pattern::new(&artifacts_type).map_err(|e| {
      PipelineError::Config(ConfigError::InvalidValue {
        field: "artifacts_type".to_string(),
        value: artifacts_type.clone(),
        reason: e.to_string(),
      })
    })?;

    let excluded_artifacts_type =
      non_empty(overrides.excluded_artifacts_type).or(non_empty(file.excluded_artifacts_type));
    let exclude_filter = ExcludeFilter::parse(excluded_artifacts_type.as_deref())?;

    let version_override = match non_empty(overrides.version).or(non_empty(file.version)) {
      Some(text) => Some(parse_version_override(&text)?),
      None => None,
    };

    let myget_feed = non_empty(overrides.myget_feed).or(non_empty(file.feeds.myget));
    let nuget_feed = non_empty(overrides.nuget_feed)
      .or(non_empty(file.feeds.nuget))
      .or_else(|| Some(DEFAULT_NUGET_FEED.to_string()));
    for (field, feed) in [("myget_feed", &myget_feed), ("nuget_feed", &nuget_feed)] {
      if let Some(url) = feed {
        validate_feed_url(field, url)?;
      }
    }

    let github_api_url = file
      .github
      .api_url
      .or_else(|| ci.api_url.clone())
      .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string())
      .trim_end_matches('/')
      .to_string();

    Ok(Self {
      configuration,
      project: absolute(
        overrides
          .project
          .or(file.project)
          .unwrap_or_else(|| PathBuf::from(DEFAULT_PROJECT)),
      ),
      artifacts_dir: absolute(
        overrides
          .artifacts_dir
          .or(file.artifacts_dir)
          .unwrap_or_else(|| PathBuf::from(DEFAULT_ARTIFACTS_DIR)),
      ),
      changelog: absolute(
        overrides
          .changelog
          .or(file.changelog)
          .unwrap_or_else(|| PathBuf::from(DEFAULT_CHANGELOG)),
      ),
      myget_feed,
      myget_api_key: non_empty(overrides.myget_api_key),
      nuget_feed,
      nuget_api_key: non_empty(overrides.nuget_api_key),
      github_token: non_empty(overrides.github_token).or_else(|| ci.token.clone()),
      copyright: non_empty(overrides.copyright).or(non_empty(file.copyright)),
      artifacts_type,
      excluded_artifacts_type,
      exclude_filter,
      version_override,
      github_api_url,
      http_timeout_secs: file.github.timeout_secs.unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
    })
  }

  pub fn is_release(&self) -> bool {
    self.configuration == Configuration::Release
  }
}

/// Feeds must be absolute http(s) URLs
fn validate_feed_url(field: &str, url: &str) -> PipelineResult<()> {
  let invalid = |reason: String| {
    PipelineError::Config(ConfigError::InvalidValue {
      field: field.to_string(),
      value: url.to_string(),
      reason,
    })
  };
  let parsed = reqwest::Url::parse(url).map_err(|e| invalid(e.to_string()))?;
  match parsed.scheme() {
    "http" | "https" => Ok(()),
    other => Err(invalid(format!("unsupported scheme '{}'", other))),
  }
}

/// Accept `1.2.3`, `v1.2.3` or `1.2`
fn parse_version_override(text: &str) -> PipelineResult<semver::Version> {
  let trimmed = text.trim_start_matches(['v', 'V']);
  let padded = match trimmed.split('.').count() {
    1 => format!("{}.0.0", trimmed),
    2 => format!("{}.0", trimmed),
    _ => trimmed.to_string(),
  };
  let version = semver::Version::parse(&padded).map_err(|e| {
    PipelineError::Config(ConfigError::InvalidValue {
      field: "version".to_string(),
      value: text.to_string(),
      reason: e.to_string(),
    })
  })?;
  Ok(semver::Version::new(version.major, version.minor, version.patch))
}
