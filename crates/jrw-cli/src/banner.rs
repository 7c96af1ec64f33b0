//! Colored console banners for pipeline progress.

use colored::Colorize;
use jrw_core::pipeline::{StepObserver, StepResult};
use jrw_core::plan::Step;

/// Prints a yellow "running" line before each step and a green or red
/// verdict after it.
pub struct ConsoleBanners;

impl StepObserver for ConsoleBanners {
    fn on_start(&mut self, step: &Step) {
        match step {
            Step::Wait { seconds, .. } => {
                println!(
                    "{}",
                    format!("Waiting {seconds}s for services to start...").yellow()
                );
            }
            Step::Exec { name, .. } => {
                println!("{}", format!("Running {name}...").yellow());
            }
        }
    }

    fn on_finish(&mut self, step: &Step, result: &StepResult) {
        if matches!(step, Step::Wait { .. }) {
            return;
        }
        if result.passed {
            println!("{}", format!("\u{2713} {} passed", result.name).green());
        } else {
            eprintln!("{}", failure_line(result).red());
        }
    }
}

pub fn failure_line(result: &StepResult) -> String {
    match (&result.error, result.exit_code) {
        (Some(err), _) => format!("\u{2717} {} failed: {err}", result.name),
        (None, Some(code)) => format!("\u{2717} {} failed (exit code {code})", result.name),
        (None, None) => format!("\u{2717} {} failed (terminated by signal)", result.name),
    }
}

pub fn success(message: &str) {
    println!("{}", message.green().bold());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(exit_code: Option<i32>, error: Option<&str>) -> StepResult {
        StepResult {
            name: "Unit tests".to_string(),
            passed: false,
            exit_code,
            error: error.map(str::to_string),
            duration_ms: 12,
        }
    }

    #[test]
    fn failure_line_prefers_spawn_error() {
        let line = failure_line(&result(None, Some("program not found on PATH: pytest")));
        assert_eq!(line, "\u{2717} Unit tests failed: program not found on PATH: pytest");
    }

    #[test]
    fn failure_line_shows_exit_code() {
        assert_eq!(
            failure_line(&result(Some(4), None)),
            "\u{2717} Unit tests failed (exit code 4)"
        );
        assert!(failure_line(&result(None, None)).contains("signal"));
    }
}
