//! Execution plan: ordered targets with their run/skip decision
//!
//! Gates and requirements are evaluated once, before anything executes. A
//! plan that violates a requirement fails without running a single target.

use crate::core::config::{BuildConfig, Configuration};
use crate::core::context::RepositoryInfo;
use crate::core::error::{PipelineError, PipelineResult};
use crate::pipeline::graph::TargetGraph;
use crate::pipeline::target::Target;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "reason", rename_all = "lowercase")]
pub enum Decision {
  Run,
  Skip(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
  /// Branch condition not met
  Condition(String),
  /// Named with `--skip`
  Requested,
}

impl fmt::Display for SkipReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SkipReason::Condition(gate) => write!(f, "requires {}", gate),
      SkipReason::Requested => write!(f, "skipped by request"),
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlannedTarget {
  pub target: Target,
  pub description: &'static str,
  #[serde(flatten)]
  pub decision: Decision,
}

impl PlannedTarget {
  pub fn will_run(&self) -> bool {
    self.decision == Decision::Run
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExecutionPlan {
  pub invoked: Target,
  pub targets: Vec<PlannedTarget>,
}

impl ExecutionPlan {
  pub fn build(invoked: Target, repo: &RepositoryInfo, skip: &[Target]) -> PipelineResult<Self> {
    let order = TargetGraph::new().order(invoked)?;

    let targets = order
      .into_iter()
      .map(|target| {
        let def = target.definition();
        let decision = if skip.contains(&target) {
          Decision::Skip(SkipReason::Requested)
        } else {
          match def.gate {
            Some(gate) if !gate.allows(repo) => Decision::Skip(SkipReason::Condition(gate.describe().to_string())),
            _ => Decision::Run,
          }
        };
        PlannedTarget {
          target,
          description: def.description,
          decision,
        }
      })
      .collect();

    Ok(Self { invoked, targets })
  }

  /// Fail when a target that will run needs a Release configuration
  pub fn check_requirements(&self, config: &BuildConfig) -> PipelineResult<()> {
    if config.is_release() {
      return Ok(());
    }

    match self.runnable().find(|p| p.target.definition().requires_release) {
      Some(planned) => Err(PipelineError::Requirement {
        target: planned.target.to_string(),
        requirement: format!(
          "Configuration == {} (current: {})",
          Configuration::Release,
          config.configuration
        ),
      }),
      None => Ok(()),
    }
  }

  pub fn runnable(&self) -> impl Iterator<Item = &PlannedTarget> {
    self.targets.iter().filter(|p| p.will_run())
  }

  /// Human-readable listing for `--plan`
  pub fn print(&self) {
    println!("📋 Plan for '{}':", self.invoked);
    for (i, planned) in self.targets.iter().enumerate() {
      match &planned.decision {
        Decision::Run => println!("  {}. {:<16} {}", i + 1, planned.target.name(), planned.description),
        Decision::Skip(reason) => println!("  {}. {:<16} (skip: {})", i + 1, planned.target.name(), reason),
      }
    }
  }
}
