pub mod build;
pub mod config;

use crate::banner::{self, ConsoleBanners};
use crate::output::{print_json, print_table};
use jrw_core::pipeline::{self, PipelineReport};
use jrw_core::plan::Step;
use jrw_core::runner::SystemRunner;
use std::path::Path;

/// Flags shared by every pipeline-running command.
#[derive(Debug, Clone, Copy)]
pub struct RunFlags {
    pub json: bool,
    pub dry_run: bool,
}

/// Print or execute `steps`, failing on the first step that does not pass.
pub fn run_pipeline(
    root: &Path,
    name: &str,
    steps: &[Step],
    flags: RunFlags,
    success_message: &str,
) -> anyhow::Result<()> {
    if flags.dry_run {
        return print_plan(steps, flags.json);
    }

    let mut runner = SystemRunner::new(root).stdout_to_stderr(flags.json);
    let report = if flags.json {
        pipeline::execute(name, steps, &mut runner, &mut ())
    } else {
        pipeline::execute(name, steps, &mut runner, &mut ConsoleBanners)
    };

    if flags.json {
        print_json(&report)?;
    } else if report.passed {
        banner::success(success_message);
    }

    check(&report)
}

fn check(report: &PipelineReport) -> anyhow::Result<()> {
    match report.failed_step() {
        None => Ok(()),
        Some(step) => match (&step.error, step.exit_code) {
            (Some(err), _) => anyhow::bail!("{} aborted at '{}': {err}", report.pipeline, step.name),
            (None, Some(code)) => anyhow::bail!(
                "{} aborted at '{}' (exit code {code})",
                report.pipeline,
                step.name
            ),
            (None, None) => anyhow::bail!(
                "{} aborted at '{}' (terminated by signal)",
                report.pipeline,
                step.name
            ),
        },
    }
}

fn print_plan(steps: &[Step], json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&steps);
    }
    let rows = steps
        .iter()
        .map(|s| vec![s.name().to_string(), s.display()])
        .collect();
    print_table(&["STEP", "COMMAND"], rows);
    Ok(())
}
