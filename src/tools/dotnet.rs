//! `dotnet` CLI driver
//!
//! Every toolchain call is a single blocking subprocess with inherited stdio, so
//! the tool's own output is what users see on failure. Argument vectors are
//! built by pure functions and tested without a toolchain installed.

use crate::core::config::Configuration;
use crate::core::error::{PipelineError, PipelineResult, ToolError};
use crate::utils::mask_secret;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Version properties stamped into compiled assemblies and packages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionStamp {
  pub version: String,
  pub assembly_version: String,
  pub file_version: String,
  pub informational_version: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSettings {
  pub project: PathBuf,
  pub configuration: Configuration,
  pub stamp: VersionStamp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackSettings {
  pub project: PathBuf,
  pub configuration: Configuration,
  pub output_dir: PathBuf,
  pub copyright: Option<String>,
  pub stamp: VersionStamp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushSettings {
  pub package: PathBuf,
  pub source: String,
  pub api_key: String,
}

/// The package toolchain the pipeline drives
pub trait Toolchain {
  fn clean(&self, project: &Path) -> PipelineResult<()>;
  fn restore(&self, project: &Path) -> PipelineResult<()>;
  fn build(&self, settings: &BuildSettings) -> PipelineResult<()>;
  fn pack(&self, settings: &PackSettings) -> PipelineResult<()>;
  /// Push one package; an identical version already on the feed is not an error
  fn push(&self, settings: &PushSettings) -> PipelineResult<()>;
}

/// Real `dotnet` executable
pub struct DotNet {
  executable: PathBuf,
  working_dir: PathBuf,
}

impl DotNet {
  pub fn new(working_dir: &Path) -> Self {
    let executable = std::env::var_os("DOTNET_EXE")
      .map(PathBuf::from)
      .unwrap_or_else(|| PathBuf::from("dotnet"));
    Self {
      executable,
      working_dir: working_dir.to_path_buf(),
    }
  }

  fn run(&self, args: &[String], secrets: &[&str]) -> PipelineResult<()> {
    let rendered = display_command("dotnet", args, secrets);
    tracing::debug!(command = %rendered, "spawning toolchain");
    println!("   $ {}", rendered);

    let status = Command::new(&self.executable)
      .current_dir(&self.working_dir)
      .args(args)
      .env("DOTNET_NOLOGO", "1")
      .env("DOTNET_CLI_TELEMETRY_OPTOUT", "1")
      .status()
      .map_err(|e| {
        PipelineError::Tool(ToolError::NotFound {
          tool: self.executable.display().to_string(),
          message: e.to_string(),
        })
      })?;

    if !status.success() {
      return Err(PipelineError::Tool(ToolError::Failed {
        command: rendered,
        code: status.code(),
      }));
    }
    Ok(())
  }
}

impl Toolchain for DotNet {
  fn clean(&self, project: &Path) -> PipelineResult<()> {
    self.run(&clean_args(project), &[])
  }

  fn restore(&self, project: &Path) -> PipelineResult<()> {
    self.run(&restore_args(project), &[])
  }

  fn build(&self, settings: &BuildSettings) -> PipelineResult<()> {
    self.run(&build_args(settings), &[])
  }

  fn pack(&self, settings: &PackSettings) -> PipelineResult<()> {
    self.run(&pack_args(settings), &[])
  }

  fn push(&self, settings: &PushSettings) -> PipelineResult<()> {
    self.run(&push_args(settings), &[settings.api_key.as_str()])
  }
}

pub fn clean_args(project: &Path) -> Vec<String> {
  vec!["clean".to_string(), project.display().to_string()]
}

pub fn restore_args(project: &Path) -> Vec<String> {
  vec!["restore".to_string(), project.display().to_string()]
}

pub fn build_args(settings: &BuildSettings) -> Vec<String> {
  let mut args = vec![
    "build".to_string(),
    settings.project.display().to_string(),
    "--configuration".to_string(),
    settings.configuration.to_string(),
    "--no-restore".to_string(),
  ];
  args.extend(stamp_properties(&settings.stamp));
  args
}

pub fn pack_args(settings: &PackSettings) -> Vec<String> {
  let mut args = vec![
    "pack".to_string(),
    settings.project.display().to_string(),
    "--configuration".to_string(),
    settings.configuration.to_string(),
    "--output".to_string(),
    settings.output_dir.display().to_string(),
    "--no-build".to_string(),
    "--no-restore".to_string(),
  ];
  if let Some(copyright) = settings.copyright.as_deref().filter(|c| !c.is_empty()) {
    args.push(property("Copyright", copyright));
  }
  args.extend(stamp_properties(&settings.stamp));
  args
}

pub fn push_args(settings: &PushSettings) -> Vec<String> {
  vec![
    "nuget".to_string(),
    "push".to_string(),
    settings.package.display().to_string(),
    "--source".to_string(),
    settings.source.clone(),
    "--api-key".to_string(),
    settings.api_key.clone(),
    "--skip-duplicate".to_string(),
  ]
}

fn stamp_properties(stamp: &VersionStamp) -> Vec<String> {
  vec![
    property("Version", &stamp.version),
    property("AssemblyVersion", &stamp.assembly_version),
    property("FileVersion", &stamp.file_version),
    property("InformationalVersion", &stamp.informational_version),
  ]
}

/// `-p:Name=Value` with MSBuild list separators escaped
fn property(name: &str, value: &str) -> String {
  let escaped = value.replace('%', "%25").replace(';', "%3B").replace(',', "%2C");
  format!("-p:{}={}", name, escaped)
}

/// Command line for logs, secrets replaced
pub fn display_command(program: &str, args: &[String], secrets: &[&str]) -> String {
  let mut rendered = String::from(program);
  for arg in args {
    rendered.push(' ');
    if secrets.iter().any(|s| !s.is_empty() && arg == s) {
      rendered.push_str(&mask_secret(arg));
    } else if arg.contains(' ') {
      rendered.push_str(&format!("\"{}\"", arg));
    } else {
      rendered.push_str(arg);
    }
  }
  rendered
}
