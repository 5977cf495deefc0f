//! Run command: plan the invoked target, then execute or print the plan

use crate::core::config::ConfigOverrides;
use crate::core::context::PipelineContext;
use crate::core::error::PipelineResult;
use crate::pipeline::{ExecutionPlan, Target, execute};
use crate::release::{GitHubClient, ReleaseApi};
use crate::steps::{Services, run_target};
use crate::tools::DotNet;
use crate::utils::format_duration;
use std::path::Path;
use std::time::{Duration, Instant};

/// What the user asked for on the command line
#[derive(Debug, Clone)]
pub struct RunOptions {
  pub target: Target,
  pub skip: Vec<Target>,
  pub plan_only: bool,
  pub json: bool,
}

pub fn run_pipeline(start_dir: &Path, overrides: ConfigOverrides, options: RunOptions) -> PipelineResult<()> {
  let ctx = PipelineContext::build(start_dir, overrides)?;
  let plan = ExecutionPlan::build(options.target, &ctx.repo, &options.skip)?;

  if options.plan_only {
    if options.json {
      println!("{}", serde_json::to_string_pretty(&plan_report(&ctx, &plan))?);
    } else {
      plan.print();
    }
    // Report requirement violations even when only planning
    return plan.check_requirements(&ctx.config);
  }

  plan.check_requirements(&ctx.config)?;

  println!(
    "🚂 pack-rail {} | {} | {} | {}",
    options.target, ctx.version.nuget_version_v2, ctx.config.configuration, ctx.repo.branch
  );

  let toolchain = DotNet::new(&ctx.root);
  let client = match ctx.config.github_token.as_deref() {
    Some(token) => Some(GitHubClient::new(
      &ctx.config.github_api_url,
      token,
      Duration::from_secs(ctx.config.http_timeout_secs),
    )?),
    None => None,
  };
  let services = Services {
    toolchain: &toolchain,
    releases: client.as_ref().map(|c| c as &dyn ReleaseApi),
  };

  let started = Instant::now();
  let (report, failure) = execute(&plan, |target| run_target(target, &ctx, &services));
  report.print_summary();

  match failure {
    Some(err) => Err(err),
    None => {
      println!();
      println!("✅ Build succeeded in {}", format_duration(started.elapsed()));
      Ok(())
    }
  }
}

/// JSON document for `--plan --json`
fn plan_report(ctx: &PipelineContext, plan: &ExecutionPlan) -> serde_json::Value {
  serde_json::json!({
    "invoked": plan.invoked,
    "configuration": ctx.config.configuration,
    "branch": ctx.repo.branch,
    "branch_kind": ctx.repo.kind,
    "pull_request": ctx.repo.is_pull_request,
    "version": ctx.version,
    "targets": plan.targets,
  })
}
