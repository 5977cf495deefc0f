//! Integration tests that execute targets against a stand-in `dotnet`

#![cfg(unix)]

use crate::helpers::{TestWorkspace, run_pack_rail_raw};
use anyhow::Result;

#[test]
fn test_pack_on_feature_branch_runs_build_chain() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.checkout_new("feature/widgets")?;
  let (dotnet, log) = ws.fake_dotnet()?;

  let output = run_pack_rail_raw(&ws.path, &["pack", "--configuration", "release"], &[("DOTNET_EXE", &dotnet)])?;
  assert!(
    output.status.success(),
    "stderr: {}",
    String::from_utf8_lossy(&output.stderr)
  );

  let calls: Vec<String> = ws.read_file(".test-bin/dotnet.log")?.lines().map(String::from).collect();
  assert_eq!(calls.len(), 4, "calls: {:?}", calls);
  assert!(calls[0].starts_with("clean "));
  assert!(calls[1].starts_with("restore "));
  assert!(calls[2].starts_with("build "));
  assert!(calls[2].contains("--configuration Release"));
  assert!(calls[2].contains("-p:Version=0.1.0-feature-widgets"));
  assert!(calls[3].starts_with("pack "));
  assert!(ws.file_exists(".artifacts/MyPack.0.1.0.nupkg"));
  assert!(log.exists());

  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("Succeeded"));
  assert!(stdout.contains("Skipped"));
  Ok(())
}

#[test]
fn test_publish_on_main_skips_excluded_artifacts() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let (dotnet, _log) = ws.fake_dotnet()?;

  let output = run_pack_rail_raw(
    &ws.path,
    &[
      "pack",
      "--configuration",
      "release",
      "--nuget-api-key",
      "oy2-test-key-abcdef123456",
      "--excluded-artifacts-type",
      ".symbols.nupkg",
      "--skip",
      "create-release",
    ],
    &[("DOTNET_EXE", &dotnet)],
  )?;
  assert!(
    output.status.success(),
    "stderr: {}",
    String::from_utf8_lossy(&output.stderr)
  );

  let pushes: Vec<String> = ws
    .read_file(".test-bin/dotnet.log")?
    .lines()
    .filter(|l| l.starts_with("nuget push"))
    .map(String::from)
    .collect();
  assert_eq!(pushes.len(), 1, "pushes: {:?}", pushes);
  assert!(pushes[0].contains("MyPack.0.1.0.nupkg"));
  assert!(pushes[0].contains("--source https://api.nuget.org/v3/index.json"));
  assert!(pushes[0].contains("--skip-duplicate"));

  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(!stdout.contains("oy2-test-key-abcdef123456"), "API key leaked to output");
  Ok(())
}

#[test]
fn test_missing_api_key_fails_publish_target() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let (dotnet, _log) = ws.fake_dotnet()?;

  let output = run_pack_rail_raw(&ws.path, &["pack", "--configuration", "release"], &[("DOTNET_EXE", &dotnet)])?;
  assert_eq!(output.status.code(), Some(1));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("PublishToNuGet"), "stderr: {}", stderr);
  assert!(stderr.contains("NUGET_API_KEY"), "stderr: {}", stderr);

  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("NotRun"), "CreateRelease should be reported as not run");
  Ok(())
}

#[test]
fn test_failing_toolchain_stops_pipeline() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.checkout_new("feature/broken")?;
  ws.write_file(".test-bin/dotnet", "#!/bin/sh\nexit 3\n")?;
  let dotnet = ws.path.join(".test-bin/dotnet");
  {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(&dotnet, std::fs::Permissions::from_mode(0o755))?;
  }

  let output = run_pack_rail_raw(&ws.path, &["pack", "--configuration", "release"], &[("DOTNET_EXE", &dotnet)])?;
  assert_eq!(output.status.code(), Some(2));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("Target 'Clean' failed"), "stderr: {}", stderr);
  Ok(())
}
