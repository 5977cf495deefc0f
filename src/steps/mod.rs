//! Target bodies
//!
//! Each target is a plain function over the immutable context plus the
//! external services it drives. Services are trait objects so the bodies can
//! be exercised against recording fakes.

pub mod build;
pub mod info;
pub mod publish;
pub mod release;

use crate::core::context::PipelineContext;
use crate::core::error::PipelineResult;
use crate::pipeline::Target;
use crate::release::ReleaseApi;
use crate::release::version::VersionInfo;
use crate::tools::{Toolchain, VersionStamp};

/// External collaborators the targets call into
pub struct Services<'a> {
  pub toolchain: &'a dyn Toolchain,
  /// Absent when no GitHub token is configured
  pub releases: Option<&'a dyn ReleaseApi>,
}

/// Execute the body of one target
pub fn run_target(target: Target, ctx: &PipelineContext, services: &Services<'_>) -> PipelineResult<()> {
  match target {
    Target::Info => info::run(ctx),
    Target::Clean => build::clean(ctx, services.toolchain),
    Target::Restore => build::restore(ctx, services.toolchain),
    Target::Compile => build::compile(ctx, services.toolchain),
    Target::Pack => build::pack(ctx, services.toolchain),
    Target::PublishToGithub => publish::run(publish::Feed::GitHub, ctx, services.toolchain),
    Target::PublishToMyGet => publish::run(publish::Feed::MyGet, ctx, services.toolchain),
    Target::PublishToNuGet => publish::run(publish::Feed::NuGet, ctx, services.toolchain),
    Target::CreateRelease => release::run(ctx, services.releases),
  }
}

/// Version properties stamped by Compile and Pack
pub fn version_stamp(version: &VersionInfo) -> VersionStamp {
  VersionStamp {
    version: version.nuget_version_v2.clone(),
    assembly_version: version.assembly_sem_ver.clone(),
    file_version: version.assembly_sem_file_ver.clone(),
    informational_version: version.informational_version.clone(),
  }
}
