//! Test-suite dispatch.
//!
//! Unit tests run first, then integration tests. End-to-end tests only run
//! when asked for, after bringing the compose environment up and waiting a
//! fixed startup delay. Outside the app container every pytest invocation
//! is wrapped in `compose exec -T <service>`.

use crate::config::TestConfig;
use crate::plan::{CommandSpec, Step};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ExecutionContext
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionContext {
    InContainer,
    Host,
}

impl ExecutionContext {
    /// The sentinel file exists only inside the app container.
    pub fn detect(sentinel: &Path) -> Self {
        if sentinel.exists() {
            ExecutionContext::InContainer
        } else {
            ExecutionContext::Host
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionContext::InContainer => "in_container",
            ExecutionContext::Host => "host",
        }
    }
}

// ---------------------------------------------------------------------------
// TestStage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStage {
    Unit,
    Integration,
    E2e,
}

impl TestStage {
    pub fn label(&self) -> &'static str {
        match self {
            TestStage::Unit => "Unit tests",
            TestStage::Integration => "Integration tests",
            TestStage::E2e => "E2E tests",
        }
    }

    pub fn dir<'a>(&self, tests: &'a TestConfig) -> &'a str {
        match self {
            TestStage::Unit => &tests.unit_dir,
            TestStage::Integration => &tests.integration_dir,
            TestStage::E2e => &tests.e2e_dir,
        }
    }
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuiteOptions {
    pub e2e: bool,
}

pub const ENVIRONMENT_UP: &str = "Start test environment";
pub const STARTUP_DELAY: &str = "Wait for services";

/// Plan the test stages in order: unit, integration, then optionally
/// environment bring-up, startup delay and e2e.
pub fn plan(opts: SuiteOptions, tests: &TestConfig, ctx: ExecutionContext) -> Vec<Step> {
    let mut steps = vec![
        stage_step(TestStage::Unit, tests, ctx),
        stage_step(TestStage::Integration, tests, ctx),
    ];

    if opts.e2e {
        if let Some(up) = compose(tests).map(|c| c.args(["up", "-d"])) {
            steps.push(Step::exec(ENVIRONMENT_UP, up));
        }
        let delay = tests.container.startup_delay_seconds;
        if delay > 0 {
            steps.push(Step::wait(STARTUP_DELAY, delay));
        }
        steps.push(stage_step(TestStage::E2e, tests, ctx));
    }

    steps
}

fn stage_step(stage: TestStage, tests: &TestConfig, ctx: ExecutionContext) -> Step {
    let runner_args = std::iter::once(stage.dir(tests).to_string())
        .chain(tests.runner_args.iter().cloned());

    let command = match (ctx, compose(tests)) {
        (ExecutionContext::Host, Some(compose)) => compose
            .args(["exec", "-T", tests.container.service.as_str()])
            .arg(&tests.runner)
            .args(runner_args),
        _ => CommandSpec::new(&tests.runner).args(runner_args),
    };

    Step::exec(stage.label(), command)
}

fn compose(tests: &TestConfig) -> Option<CommandSpec> {
    CommandSpec::from_argv(
        tests
            .container
            .compose
            .iter()
            .filter(|s| !s.trim().is_empty())
            .cloned(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn names(steps: &[Step]) -> Vec<&str> {
        steps.iter().map(Step::name).collect()
    }

    #[test]
    fn detect_uses_sentinel_presence() {
        let dir = TempDir::new().unwrap();
        let sentinel = dir.path().join(".dockerenv");
        assert_eq!(ExecutionContext::detect(&sentinel), ExecutionContext::Host);
        std::fs::write(&sentinel, b"").unwrap();
        assert_eq!(
            ExecutionContext::detect(&sentinel),
            ExecutionContext::InContainer
        );
    }

    #[test]
    fn default_plan_is_unit_then_integration() {
        let steps = plan(
            SuiteOptions::default(),
            &TestConfig::default(),
            ExecutionContext::InContainer,
        );
        assert_eq!(names(&steps), vec!["Unit tests", "Integration tests"]);
        assert_eq!(steps[0].display(), "pytest tests/unit -v");
        assert_eq!(steps[1].display(), "pytest tests/integration -v");
    }

    #[test]
    fn host_wraps_runner_in_compose_exec() {
        let steps = plan(
            SuiteOptions::default(),
            &TestConfig::default(),
            ExecutionContext::Host,
        );
        assert_eq!(
            steps[0].display(),
            "docker-compose exec -T web pytest tests/unit -v"
        );
    }

    #[test]
    fn e2e_comes_after_unit_and_integration() {
        let steps = plan(
            SuiteOptions { e2e: true },
            &TestConfig::default(),
            ExecutionContext::Host,
        );
        assert_eq!(
            names(&steps),
            vec![
                "Unit tests",
                "Integration tests",
                ENVIRONMENT_UP,
                STARTUP_DELAY,
                "E2E tests"
            ]
        );
        assert_eq!(steps[2].display(), "docker-compose up -d");
        assert_eq!(steps[3], Step::wait(STARTUP_DELAY, 10));
    }

    #[test]
    fn zero_delay_skips_wait_step() {
        let mut tests = TestConfig::default();
        tests.container.startup_delay_seconds = 0;
        let steps = plan(SuiteOptions { e2e: true }, &tests, ExecutionContext::InContainer);
        assert!(!names(&steps).contains(&STARTUP_DELAY));
    }

    #[test]
    fn compose_v2_argv_is_supported() {
        let mut tests = TestConfig::default();
        tests.container.compose = vec!["docker".to_string(), "compose".to_string()];
        let steps = plan(SuiteOptions::default(), &tests, ExecutionContext::Host);
        assert_eq!(
            steps[0].display(),
            "docker compose exec -T web pytest tests/unit -v"
        );
    }
}
