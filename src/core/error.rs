//! Error types for pack-rail with contextual messages and exit codes
//!
//! Every failure in the pipeline funnels into [`PipelineError`]. Variants map to
//! an exit code and, where we know something useful, a help message that is
//! printed under the error.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for pack-rail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, unmet target requirements)
  User = 1,
  /// System error (git, toolchain, network, I/O)
  System = 2,
  /// Validation failure (bad patterns, malformed inputs)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for pack-rail
#[derive(Debug)]
pub enum PipelineError {
  /// Configuration errors
  Config(ConfigError),

  /// Git operation errors
  Git(GitError),

  /// External tool (dotnet) errors
  Tool(ToolError),

  /// GitHub API errors
  Api(ApiError),

  /// A target's requirement was not met before execution started
  Requirement { target: String, requirement: String },

  /// A target failed while executing
  TargetFailed { target: String, source: Box<PipelineError> },

  /// Validation errors (patterns, changelog contents)
  Validation(String),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl PipelineError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    PipelineError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    PipelineError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      PipelineError::Message { message, context, help } => PipelineError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      PipelineError::Io(e) => PipelineError::Message {
        message: ctx_str,
        context: Some(format!("I/O error: {}", e)),
        help: None,
      },
      _ => self,
    }
  }

  /// Wrap an error raised while a target was running
  pub fn in_target(target: impl Into<String>, source: PipelineError) -> Self {
    PipelineError::TargetFailed {
      target: target.into(),
      source: Box::new(source),
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      PipelineError::Config(_) => ExitCode::User,
      PipelineError::Git(_) => ExitCode::System,
      PipelineError::Tool(_) => ExitCode::System,
      PipelineError::Api(_) => ExitCode::System,
      PipelineError::Requirement { .. } => ExitCode::User,
      PipelineError::TargetFailed { source, .. } => source.exit_code(),
      PipelineError::Validation(_) => ExitCode::Validation,
      PipelineError::Io(_) => ExitCode::System,
      PipelineError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      PipelineError::Config(e) => e.help_message(),
      PipelineError::Git(e) => e.help_message(),
      PipelineError::Tool(e) => e.help_message(),
      PipelineError::Api(e) => e.help_message(),
      PipelineError::Requirement { .. } => {
        Some("Pass `--configuration release` or run on a CI server (Release is the default there).".to_string())
      }
      PipelineError::TargetFailed { source, .. } => source.help_message(),
      PipelineError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for PipelineError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PipelineError::Config(e) => write!(f, "{}", e),
      PipelineError::Git(e) => write!(f, "{}", e),
      PipelineError::Tool(e) => write!(f, "{}", e),
      PipelineError::Api(e) => write!(f, "{}", e),
      PipelineError::Requirement { target, requirement } => {
        write!(f, "Target '{}' requires {}", target, requirement)
      }
      PipelineError::TargetFailed { target, source } => write!(f, "Target '{}' failed: {}", target, source),
      PipelineError::Validation(msg) => write!(f, "Validation failed: {}", msg),
      PipelineError::Io(e) => write!(f, "I/O error: {}", e),
      PipelineError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for PipelineError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      PipelineError::Io(e) => Some(e),
      PipelineError::TargetFailed { source, .. } => Some(source.as_ref()),
      _ => None,
    }
  }
}

impl From<io::Error> for PipelineError {
  fn from(err: io::Error) -> Self {
    PipelineError::Io(err)
  }
}

impl From<String> for PipelineError {
  fn from(msg: String) -> Self {
    PipelineError::message(msg)
  }
}

impl From<&str> for PipelineError {
  fn from(msg: &str) -> Self {
    PipelineError::message(msg)
  }
}

impl From<toml_edit::de::Error> for PipelineError {
  fn from(err: toml_edit::de::Error) -> Self {
    PipelineError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for PipelineError {
  fn from(err: serde_json::Error) -> Self {
    PipelineError::message(format!("JSON error: {}", err))
  }
}

impl From<semver::Error> for PipelineError {
  fn from(err: semver::Error) -> Self {
    PipelineError::Validation(format!("invalid semantic version: {}", err))
  }
}

impl From<glob::PatternError> for PipelineError {
  fn from(err: glob::PatternError) -> Self {
    PipelineError::Validation(format!("invalid glob pattern: {}", err))
  }
}

impl From<reqwest::Error> for PipelineError {
  fn from(err: reqwest::Error) -> Self {
    PipelineError::Api(ApiError::Transport {
      message: err.to_string(),
    })
  }
}

/// Configuration errors
#[derive(Debug)]
pub enum ConfigError {
  /// A value needed by a target that is about to run is missing
  MissingField { field: String, target: String },

  /// A value was present but unusable
  InvalidValue { field: String, value: String, reason: String },

  /// Config file could not be parsed
  Parse { path: PathBuf, message: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::MissingField { field, .. } => Some(format!(
        "Set `{}` on the command line, in the environment, or in pack-rail.toml.",
        field
      )),
      ConfigError::Parse { path, .. } => Some(format!("Fix the syntax in {}", path.display())),
      _ => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::MissingField { field, target } => {
        write!(f, "Missing required value `{}` for target '{}'", field, target)
      }
      ConfigError::InvalidValue { field, value, reason } => {
        write!(f, "Invalid value for `{}`: '{}' ({})", field, value, reason)
      }
      ConfigError::Parse { path, message } => {
        write!(f, "Failed to parse config {}: {}", path.display(), message)
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },

  /// Remote URL could not be mapped to a GitHub owner/name
  UnknownRemote { url: String },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::RepoNotFound { path } => Some(format!(
        "Run pack-rail from inside a git checkout (looked at {}).",
        path.display()
      )),
      GitError::UnknownRemote { .. } => {
        Some("Set GITHUB_REPOSITORY=owner/name or point `origin` at a GitHub repository.".to_string())
      }
      GitError::CommandFailed { stderr, .. } if stderr.contains("shallow") => {
        Some("Version calculation needs full history. Fetch with `fetch-depth: 0`.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
      GitError::UnknownRemote { url } => {
        write!(f, "Cannot determine GitHub owner/name from remote '{}'", url)
      }
    }
  }
}

/// External tool errors
#[derive(Debug)]
pub enum ToolError {
  /// The executable could not be started
  NotFound { tool: String, message: String },

  /// The tool ran and exited unsuccessfully
  Failed { command: String, code: Option<i32> },
}

impl ToolError {
  fn help_message(&self) -> Option<String> {
    match self {
      ToolError::NotFound { tool, .. } => Some(format!("Install `{}` and make sure it is on PATH.", tool)),
      ToolError::Failed { .. } => Some("See the tool output above for details.".to_string()),
    }
  }
}

impl fmt::Display for ToolError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ToolError::NotFound { tool, message } => write!(f, "Failed to execute {}: {}", tool, message),
      ToolError::Failed { command, code } => match code {
        Some(code) => write!(f, "`{}` exited with code {}", command, code),
        None => write!(f, "`{}` was terminated by a signal", command),
      },
    }
  }
}

/// GitHub API errors
#[derive(Debug)]
pub enum ApiError {
  /// Request never produced a response
  Transport { message: String },

  /// Non-success HTTP status
  Status { operation: String, status: u16, body: String },

  /// Assets could not all be uploaded; the release was left as a draft
  DraftLeftBehind { url: String, source: Box<PipelineError> },
}

impl ApiError {
  fn help_message(&self) -> Option<String> {
    match self {
      ApiError::Status { status: 401 | 403, .. } => {
        Some("Check that GITHUB_TOKEN is set and has `contents: write` permission.".to_string())
      }
      ApiError::Status { status: 422, .. } => {
        Some("A release for this tag probably exists already. Delete it or bump the version.".to_string())
      }
      ApiError::DraftLeftBehind { url, .. } => {
        Some(format!("Finish or delete the draft release manually: {}", url))
      }
      _ => None,
    }
  }
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Transport { message } => write!(f, "GitHub API request failed: {}", message),
      ApiError::Status {
        operation,
        status,
        body,
      } => write!(f, "GitHub API error {} during {}: {}", status, operation, body),
      ApiError::DraftLeftBehind { url, source } => {
        write!(f, "Release left in draft state ({}): {}", url, source)
      }
    }
  }
}

/// Result type alias for pack-rail
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> PipelineResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> PipelineResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<PipelineError>,
{
  fn context(self, ctx: impl Into<String>) -> PipelineResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> PipelineResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &PipelineError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
