use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::plan::Step;
use crate::runner::CommandRunner;

// ---------------------------------------------------------------------------
// StepResult / PipelineReport
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub name: String,
    pub passed: bool,
    /// None for wait steps, spawn failures, and signal-terminated processes.
    pub exit_code: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    pub pipeline: String,
    pub started_at: DateTime<Utc>,
    pub steps: Vec<StepResult>,
    /// True only if every planned step ran and passed.
    pub passed: bool,
}

impl PipelineReport {
    pub fn failed_step(&self) -> Option<&StepResult> {
        self.steps.iter().find(|s| !s.passed)
    }
}

// ---------------------------------------------------------------------------
// StepObserver
// ---------------------------------------------------------------------------

/// Progress callbacks for console banners. `()` ignores everything.
pub trait StepObserver {
    fn on_start(&mut self, _step: &Step) {}
    fn on_finish(&mut self, _step: &Step, _result: &StepResult) {}
}

impl StepObserver for () {}

// ---------------------------------------------------------------------------
// execute
// ---------------------------------------------------------------------------

/// Run `steps` in order, stopping at the first step that fails.
///
/// A step fails when its process exits non-zero, is killed by a signal, or
/// cannot be spawned. Steps after the failure are never started and do not
/// appear in the report.
pub fn execute(
    pipeline: &str,
    steps: &[Step],
    runner: &mut dyn CommandRunner,
    observer: &mut dyn StepObserver,
) -> PipelineReport {
    let started_at = Utc::now();
    let mut results = Vec::with_capacity(steps.len());

    for step in steps {
        observer.on_start(step);
        tracing::info!(pipeline, step = step.name(), "starting step");

        let start = Instant::now();
        let mut result = match step {
            Step::Wait { name, seconds } => {
                runner.wait(Duration::from_secs(*seconds));
                StepResult {
                    name: name.clone(),
                    passed: true,
                    exit_code: None,
                    error: None,
                    duration_ms: 0,
                }
            }
            Step::Exec { name, command } => match runner.run(command) {
                Ok(outcome) => StepResult {
                    name: name.clone(),
                    passed: outcome.success,
                    exit_code: outcome.code,
                    error: None,
                    duration_ms: 0,
                },
                Err(e) => StepResult {
                    name: name.clone(),
                    passed: false,
                    exit_code: None,
                    error: Some(e.to_string()),
                    duration_ms: 0,
                },
            },
        };
        result.duration_ms = elapsed_ms(start.elapsed());

        if result.passed {
            tracing::info!(
                pipeline,
                step = step.name(),
                duration_ms = result.duration_ms,
                "step passed"
            );
        } else {
            tracing::warn!(
                pipeline,
                step = step.name(),
                exit_code = ?result.exit_code,
                error = result.error.as_deref().unwrap_or(""),
                "step failed"
            );
        }

        observer.on_finish(step, &result);
        let passed = result.passed;
        results.push(result);
        if !passed {
            break;
        }
    }

    let passed = results.len() == steps.len() && results.iter().all(|r| r.passed);
    PipelineReport {
        pipeline: pipeline.to_string(),
        started_at,
        steps: results,
        passed,
    }
}

/// Whole milliseconds in `d`, saturating at `u64::MAX`.
fn elapsed_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
