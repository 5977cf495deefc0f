//! Clean, Restore, Compile and Pack

use crate::core::context::PipelineContext;
use crate::core::error::{PipelineError, PipelineResult, ResultExt};
use crate::steps::version_stamp;
use crate::tools::{BuildSettings, PackSettings, Toolchain};
use crate::utils::resolve_path;
use std::fs;

/// Clean toolchain outputs and reset the artifacts directory to empty
pub fn clean(ctx: &PipelineContext, toolchain: &dyn Toolchain) -> PipelineResult<()> {
  let artifacts = &ctx.config.artifacts_dir;
  // Only a directory strictly inside the repository may be emptied
  let root = resolve_path(&ctx.root);
  let resolved = resolve_path(artifacts);
  if resolved == root || !resolved.starts_with(&root) {
    return Err(PipelineError::with_help(
      format!("Refusing to clean artifacts directory {}", artifacts.display()),
      "Point --artifacts-dir at a directory inside the repository, e.g. .artifacts",
    ));
  }

  toolchain.clean(&ctx.config.project)?;

  if resolved.exists() {
    fs::remove_dir_all(&resolved).with_context(|| format!("Failed to remove {}", resolved.display()))?;
  }
  fs::create_dir_all(&resolved).with_context(|| format!("Failed to create {}", resolved.display()))?;
  println!("   🧹 Emptied {}", artifacts.display());
  Ok(())
}

pub fn restore(ctx: &PipelineContext, toolchain: &dyn Toolchain) -> PipelineResult<()> {
  toolchain.restore(&ctx.config.project)
}

pub fn compile(ctx: &PipelineContext, toolchain: &dyn Toolchain) -> PipelineResult<()> {
  println!("   Version: {}", ctx.version.nuget_version_v2);
  toolchain.build(&BuildSettings {
    project: ctx.config.project.clone(),
    configuration: ctx.config.configuration,
    stamp: version_stamp(&ctx.version),
  })
}

pub fn pack(ctx: &PipelineContext, toolchain: &dyn Toolchain) -> PipelineResult<()> {
  toolchain.pack(&PackSettings {
    project: ctx.config.project.clone(),
    configuration: ctx.config.configuration,
    output_dir: ctx.config.artifacts_dir.clone(),
    copyright: ctx.config.copyright.clone(),
    stamp: version_stamp(&ctx.version),
  })?;
  println!("   📦 Packages written to {}", ctx.config.artifacts_dir.display());
  Ok(())
}
