//! Integration tests for `--plan` output

use crate::helpers::{TestWorkspace, plan_json, run_pack_rail, run_pack_rail_raw};
use anyhow::Result;

#[test]
fn test_plan_lists_whole_chain_in_order() -> Result<()> {
  let ws = TestWorkspace::new()?;

  let plan = plan_json(&ws.path, &["pack", "--configuration", "release"])?;
  let order: Vec<&str> = plan["targets"]
    .as_array()
    .unwrap()
    .iter()
    .map(|t| t["target"].as_str().unwrap())
    .collect();

  assert_eq!(
    order,
    vec![
      "Info",
      "Clean",
      "Restore",
      "Compile",
      "Pack",
      "PublishToGithub",
      "PublishToMyGet",
      "PublishToNuGet",
      "CreateRelease"
    ]
  );
  assert_eq!(plan["invoked"], "Pack");
  assert_eq!(plan["configuration"], "release");
  Ok(())
}

#[test]
fn test_default_target_is_pack() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let plan = plan_json(&ws.path, &["--configuration", "release"])?;
  assert_eq!(plan["invoked"], "Pack");
  Ok(())
}

#[test]
fn test_plan_reports_derived_version() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.tag("v1.2.0")?;

  let plan = plan_json(&ws.path, &["compile"])?;
  assert_eq!(plan["version"]["major_minor_patch"], "1.2.0");
  assert_eq!(plan["version"]["nuget_version_v2"], "1.2.0");

  ws.commit("fix: after the tag")?;
  let plan = plan_json(&ws.path, &["compile"])?;
  assert_eq!(plan["version"]["major_minor_patch"], "1.2.1");
  Ok(())
}

#[test]
fn test_version_override_wins() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.tag("v1.2.0")?;

  let plan = plan_json(&ws.path, &["compile", "--version-override", "3.0.0"])?;
  assert_eq!(plan["version"]["major_minor_patch"], "3.0.0");
  Ok(())
}

#[test]
fn test_text_plan_marks_skips() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.checkout_new("feature/widgets")?;

  let output = run_pack_rail(&ws.path, &["pack", "--configuration", "release", "--plan"])?;
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert!(stdout.contains("Compile"));
  assert!(stdout.contains("skip: requires main/master branch"));
  Ok(())
}

#[test]
fn test_config_file_is_read() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_file("pack-rail.toml", "configuration = \"release\"\n")?;

  let plan = plan_json(&ws.path, &["compile"])?;
  assert_eq!(plan["configuration"], "release");
  Ok(())
}

#[test]
fn test_broken_config_file_fails() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_file(".config/pack-rail.toml", "configuration = [\n")?;

  let output = run_pack_rail_raw(&ws.path, &["compile", "--plan"], &[])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(String::from_utf8_lossy(&output.stderr).contains("pack-rail.toml"));
  Ok(())
}

#[test]
fn test_outside_git_repository_fails() -> Result<()> {
  let dir = tempfile::TempDir::new()?;
  let output = run_pack_rail_raw(dir.path(), &["compile", "--plan"], &[])?;
  assert!(!output.status.success());
  Ok(())
}
