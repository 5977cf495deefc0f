//! Integration tests for branch gates and configuration requirements

use crate::helpers::{TestWorkspace, plan_json, run_pack_rail_raw, running_targets};
use anyhow::Result;

const RELEASE: &[&str] = &["pack", "--configuration", "release"];

#[test]
fn test_main_publishes_to_nuget_and_releases() -> Result<()> {
  let ws = TestWorkspace::new()?;

  let runs = running_targets(&plan_json(&ws.path, RELEASE)?);
  assert!(runs.contains(&"PublishToNuGet".to_string()));
  assert!(runs.contains(&"CreateRelease".to_string()));
  assert!(!runs.contains(&"PublishToGithub".to_string()));
  assert!(!runs.contains(&"PublishToMyGet".to_string()));
  Ok(())
}

#[test]
fn test_develop_publishes_to_github_only() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.checkout_new("develop")?;

  let plan = plan_json(&ws.path, RELEASE)?;
  let runs = running_targets(&plan);
  assert!(runs.contains(&"PublishToGithub".to_string()));
  assert!(!runs.contains(&"PublishToNuGet".to_string()));
  assert!(!runs.contains(&"CreateRelease".to_string()));
  assert!(
    plan["version"]["nuget_version_v2"]
      .as_str()
      .unwrap()
      .contains("-alpha")
  );
  Ok(())
}

#[test]
fn test_release_branch_publishes_to_myget_and_releases() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.checkout_new("release/2.0.0")?;

  let plan = plan_json(&ws.path, RELEASE)?;
  let runs = running_targets(&plan);
  assert!(runs.contains(&"PublishToMyGet".to_string()));
  assert!(runs.contains(&"CreateRelease".to_string()));
  assert!(!runs.contains(&"PublishToNuGet".to_string()));
  assert_eq!(plan["version"]["major_minor_patch"], "2.0.0");
  Ok(())
}

#[test]
fn test_feature_branch_publishes_nothing() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.checkout_new("feature/widgets")?;

  let runs = running_targets(&plan_json(&ws.path, RELEASE)?);
  assert_eq!(runs, vec!["Info", "Clean", "Restore", "Compile", "Pack"]);
  Ok(())
}

#[test]
fn test_debug_pack_fails_before_running_anything() -> Result<()> {
  let ws = TestWorkspace::new()?;

  let output = run_pack_rail_raw(&ws.path, &["pack", "--configuration", "debug"], &[])?;
  assert_eq!(output.status.code(), Some(1));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("Pack"), "stderr: {}", stderr);
  assert!(!ws.file_exists(".artifacts"), "Clean must not have run");
  Ok(())
}

#[test]
fn test_debug_compile_is_allowed() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let plan = plan_json(&ws.path, &["compile", "--configuration", "debug"])?;
  assert_eq!(running_targets(&plan), vec!["Info", "Clean", "Restore", "Compile"]);
  Ok(())
}

#[test]
fn test_skip_flag_marks_targets() -> Result<()> {
  let ws = TestWorkspace::new()?;

  let plan = plan_json(&ws.path, &["pack", "--configuration", "release", "--skip", "clean,restore"])?;
  let runs = running_targets(&plan);
  assert!(!runs.contains(&"Clean".to_string()));
  assert!(!runs.contains(&"Restore".to_string()));
  assert!(runs.contains(&"Compile".to_string()));
  Ok(())
}
