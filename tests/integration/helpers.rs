//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Environment that would change CI detection or leak credentials into a run
const SCRUBBED_ENV: &[&str] = &[
  "GITHUB_ACTIONS",
  "GITHUB_REF",
  "GITHUB_HEAD_REF",
  "GITHUB_SHA",
  "GITHUB_REPOSITORY",
  "GITHUB_REPOSITORY_OWNER",
  "GITHUB_EVENT_NAME",
  "GITHUB_TOKEN",
  "GITHUB_API_URL",
  "MYGET_API_KEY",
  "NUGET_API_KEY",
  "DOTNET_EXE",
  "RUST_LOG",
];

/// A git repository laid out like a single-package .NET project
pub struct TestWorkspace {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestWorkspace {
  /// Create a repository on `main` with one commit
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    git(&path, &["init", "--initial-branch=main"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;
    git(&path, &["config", "commit.gpgsign", "false"])?;

    std::fs::create_dir_all(path.join("src/MyPack"))?;
    std::fs::write(
      path.join("src/MyPack/MyPack.csproj"),
      r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <TargetFramework>net8.0</TargetFramework>
  </PropertyGroup>
</Project>
"#,
    )?;
    std::fs::write(
      path.join("CHANGELOG.md"),
      "# Changelog\n\n## [Unreleased]\n\n## [0.1.0]\n\n- Initial release\n",
    )?;
    std::fs::write(path.join(".gitignore"), ".artifacts/\n")?;

    git(&path, &["add", "."])?;
    git(&path, &["commit", "-m", "Initial project setup"])?;

    Ok(Self { _root: root, path })
  }

  /// Create and switch to a branch
  pub fn checkout_new(&self, branch: &str) -> Result<()> {
    git(&self.path, &["checkout", "-b", branch])?;
    Ok(())
  }

  /// Commit current changes
  pub fn commit(&self, message: &str) -> Result<String> {
    git(&self.path, &["add", "."])?;
    git(&self.path, &["commit", "--allow-empty", "-m", message])?;

    let output = git(&self.path, &["rev-parse", "HEAD"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Tag HEAD
  pub fn tag(&self, name: &str) -> Result<()> {
    git(&self.path, &["tag", name])?;
    Ok(())
  }

  /// Write a file relative to the repository root
  pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
    let file_path = self.path.join(path);
    if let Some(parent) = file_path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
  }

  /// Check if a file exists
  pub fn file_exists(&self, path: &str) -> bool {
    self.path.join(path).exists()
  }

  /// Read a file
  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }

  /// Install a stand-in `dotnet` that logs its arguments and fakes `pack` output
  ///
  /// Returns `(executable, log_file)`.
  #[cfg(unix)]
  pub fn fake_dotnet(&self) -> Result<(PathBuf, PathBuf)> {
    use std::os::unix::fs::PermissionsExt;

    let bin_dir = self.path.join(".test-bin");
    std::fs::create_dir_all(&bin_dir)?;
    let log = bin_dir.join("dotnet.log");
    let script = bin_dir.join("dotnet");
    std::fs::write(
      &script,
      format!(
        r#"#!/bin/sh
echo "$@" >> "{log}"
if [ "$1" = "pack" ]; then
  out=""
  prev=""
  for arg in "$@"; do
    if [ "$prev" = "--output" ]; then out="$arg"; fi
    prev="$arg"
  done
  mkdir -p "$out"
  touch "$out/MyPack.0.1.0.nupkg" "$out/MyPack.0.1.0.symbols.nupkg"
fi
exit 0
"#,
        log = log.display()
      ),
    )?;
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))?;

    Ok((script, log))
  }
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run pack-rail with a scrubbed environment, whatever the exit status
pub fn run_pack_rail_raw(cwd: &Path, args: &[&str], env: &[(&str, &Path)]) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_pack-rail");

  let mut command = Command::new(bin);
  command.current_dir(cwd).args(args);
  for key in SCRUBBED_ENV {
    command.env_remove(key);
  }
  for (key, value) in env {
    command.env(key, value);
  }

  command.output().context("Failed to run pack-rail")
}

/// Run pack-rail and require success
pub fn run_pack_rail(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = run_pack_rail_raw(cwd, args, &[])?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "pack-rail command failed: pack-rail {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

/// Run `--plan --json` and parse the document
pub fn plan_json(cwd: &Path, args: &[&str]) -> Result<serde_json::Value> {
  let mut full = args.to_vec();
  full.extend(["--plan", "--json"]);
  let output = run_pack_rail(cwd, &full)?;
  serde_json::from_slice(&output.stdout).context("plan output is not JSON")
}

/// Targets marked `run` in a plan document
pub fn running_targets(plan: &serde_json::Value) -> Vec<String> {
  plan["targets"]
    .as_array()
    .map(|targets| {
      targets
        .iter()
        .filter(|t| t["action"] == "run")
        .filter_map(|t| t["target"].as_str().map(String::from))
        .collect()
    })
    .unwrap_or_default()
}
