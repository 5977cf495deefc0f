//! Sequential plan execution
//!
//! Targets run one at a time in plan order. The first failure stops the
//! run; later targets are reported as not run.

use crate::core::error::{PipelineError, PipelineResult};
use crate::pipeline::plan::{Decision, ExecutionPlan};
use crate::pipeline::target::Target;
use crate::utils::format_duration;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetStatus {
  Succeeded,
  Skipped(String),
  Failed,
  NotRun,
}

#[derive(Debug, Clone)]
pub struct TargetOutcome {
  pub target: Target,
  pub status: TargetStatus,
  pub duration: Duration,
}

#[derive(Debug, Default)]
pub struct RunReport {
  pub outcomes: Vec<TargetOutcome>,
}

impl RunReport {
  #[cfg(test)]
  pub fn status_of(&self, target: Target) -> Option<&TargetStatus> {
    self.outcomes.iter().find(|o| o.target == target).map(|o| &o.status)
  }

  pub fn total_duration(&self) -> Duration {
    self.outcomes.iter().map(|o| o.duration).sum()
  }

  pub fn print_summary(&self) {
    println!();
    println!("═══════════════════════════════════════");
    println!("{:<18} {:<12} {:>10}", "Target", "Status", "Duration");
    println!("───────────────────────────────────────");
    for outcome in &self.outcomes {
      let (status, duration) = match &outcome.status {
        TargetStatus::Succeeded => ("Succeeded".to_string(), format_duration(outcome.duration)),
        TargetStatus::Skipped(reason) => (format!("Skipped ({})", reason), String::new()),
        TargetStatus::Failed => ("Failed".to_string(), format_duration(outcome.duration)),
        TargetStatus::NotRun => ("NotRun".to_string(), String::new()),
      };
      println!("{:<18} {:<12} {:>10}", outcome.target.name(), status, duration);
    }
    println!("───────────────────────────────────────");
    println!("{:<31} {:>10}", "Total", format_duration(self.total_duration()));
    println!("═══════════════════════════════════════");
  }
}

/// Run every target in the plan through `step`
///
/// Returns the report plus the first error, if any. The error is wrapped with
/// the name of the target that raised it.
pub fn execute<F>(plan: &ExecutionPlan, mut step: F) -> (RunReport, Option<PipelineError>)
where
  F: FnMut(Target) -> PipelineResult<()>,
{
  let mut report = RunReport::default();
  let mut failure: Option<PipelineError> = None;

  for planned in &plan.targets {
    let target = planned.target;

    if failure.is_some() {
      report.outcomes.push(TargetOutcome {
        target,
        status: TargetStatus::NotRun,
        duration: Duration::ZERO,
      });
      continue;
    }

    if let Decision::Skip(reason) = &planned.decision {
      tracing::info!(name = %target, %reason, "skipping target");
      report.outcomes.push(TargetOutcome {
        target,
        status: TargetStatus::Skipped(reason.to_string()),
        duration: Duration::ZERO,
      });
      continue;
    }

    println!();
    println!("▶ {} - {}", target.name(), planned.description);
    let started = Instant::now();
    let result = step(target);
    let duration = started.elapsed();

    match result {
      Ok(()) => {
        tracing::debug!(name = %target, elapsed_ms = duration.as_millis() as u64, "target succeeded");
        report.outcomes.push(TargetOutcome {
          target,
          status: TargetStatus::Succeeded,
          duration,
        });
      }
      Err(err) => {
        tracing::debug!(name = %target, error = %err, "target failed");
        report.outcomes.push(TargetOutcome {
          target,
          status: TargetStatus::Failed,
          duration,
        });
        failure = Some(PipelineError::in_target(target.name(), err));
      }
    }
  }

  (report, failure)
}
