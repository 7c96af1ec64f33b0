//! Subprocess execution behind a small trait so the pipeline can be driven
//! by real processes or by an in-memory recorder in tests.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use crate::error::{JrwError, Result};
use crate::plan::CommandSpec;

/// How a finished subprocess exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
    pub success: bool,
    /// None when the process was terminated by a signal.
    pub code: Option<i32>,
}

impl ExitOutcome {
    pub fn from_code(code: i32) -> Self {
        Self {
            success: code == 0,
            code: Some(code),
        }
    }
}

pub trait CommandRunner {
    /// Run `cmd` to completion. An `Err` means the process never started.
    fn run(&mut self, cmd: &CommandSpec) -> Result<ExitOutcome>;

    fn wait(&mut self, duration: Duration);
}

// ---------------------------------------------------------------------------
// SystemRunner
// ---------------------------------------------------------------------------

/// Spawns real processes in `cwd`. Output is streamed to the terminal,
/// never captured.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    cwd: PathBuf,
    stdout_to_stderr: bool,
}

impl SystemRunner {
    pub fn new(cwd: &Path) -> Self {
        Self {
            cwd: cwd.to_path_buf(),
            stdout_to_stderr: false,
        }
    }

    /// Send child stdout to our stderr, keeping stdout free for a JSON report.
    pub fn stdout_to_stderr(mut self, enabled: bool) -> Self {
        self.stdout_to_stderr = enabled;
        self
    }
}

impl CommandRunner for SystemRunner {
    fn run(&mut self, cmd: &CommandSpec) -> Result<ExitOutcome> {
        let program = resolve_program(&cmd.program, &self.cwd)?;
        tracing::debug!(program = %program.display(), args = ?cmd.args, "spawning");

        let stdout = if self.stdout_to_stderr {
            Stdio::from(std::io::stderr())
        } else {
            Stdio::inherit()
        };

        let status = Command::new(&program)
            .args(&cmd.args)
            .current_dir(&self.cwd)
            .stdin(Stdio::inherit())
            .stdout(stdout)
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| JrwError::SpawnFailed {
                program: cmd.program.clone(),
                message: e.to_string(),
            })?;

        Ok(ExitOutcome {
            success: status.success(),
            code: status.code(),
        })
    }

    fn wait(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Resolve `program` against PATH, or against `cwd` when it is a relative path.
fn resolve_program(program: &str, cwd: &Path) -> Result<PathBuf> {
    if program.trim().is_empty() {
        return Err(JrwError::ProgramNotFound(program.to_string()));
    }
    let found = if program.contains(std::path::MAIN_SEPARATOR) || program.contains('/') {
        which::which_in(program, None::<&str>, cwd)
    } else {
        which::which(program)
    };
    found.map_err(|_| JrwError::ProgramNotFound(program.to_string()))
}

// ---------------------------------------------------------------------------
// RecordingRunner
// ---------------------------------------------------------------------------

/// Records every invocation and answers with scripted exit codes.
/// Commands not listed in `exit_codes` succeed.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingRunner {
    pub(crate) invocations: Vec<CommandSpec>,
    pub(crate) waits: Vec<Duration>,
    exit_codes: Vec<(String, i32)>,
    missing: Vec<String>,
}

#[cfg(test)]
impl RecordingRunner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Exit with `code` for any command whose rendering contains `needle`.
    pub(crate) fn fail_when(mut self, needle: impl Into<String>, code: i32) -> Self {
        self.exit_codes.push((needle.into(), code));
        self
    }

    /// Treat `program` as absent from PATH.
    pub(crate) fn missing_program(mut self, program: impl Into<String>) -> Self {
        self.missing.push(program.into());
        self
    }
}

#[cfg(test)]
impl CommandRunner for RecordingRunner {
    fn run(&mut self, cmd: &CommandSpec) -> Result<ExitOutcome> {
        if self.missing.iter().any(|p| *p == cmd.program) {
            return Err(JrwError::ProgramNotFound(cmd.program.clone()));
        }
        self.invocations.push(cmd.clone());
        let line = cmd.display();
        let code = self
            .exit_codes
            .iter()
            .find(|(needle, _)| line.contains(needle.as_str()))
            .map(|(_, code)| *code)
            .unwrap_or(0);
        Ok(ExitOutcome::from_code(code))
    }

    fn wait(&mut self, duration: Duration) {
        self.waits.push(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn system_runner_reports_exit_codes() {
        let mut runner = SystemRunner::new(Path::new("/tmp"));
        let ok = runner.run(&CommandSpec::new("true")).unwrap();
        assert!(ok.success);
        assert_eq!(ok.code, Some(0));

        let failed = runner
            .run(&CommandSpec::new("sh").args(["-c", "exit 3"]))
            .unwrap();
        assert!(!failed.success);
        assert_eq!(failed.code, Some(3));
    }

    #[test]
    fn system_runner_rejects_unknown_program() {
        let mut runner = SystemRunner::new(Path::new("."));
        let err = runner
            .run(&CommandSpec::new("jrw-definitely-not-installed"))
            .unwrap_err();
        assert!(matches!(err, JrwError::ProgramNotFound(_)));
    }

    #[cfg(unix)]
    #[test]
    fn relative_program_resolves_against_cwd() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::TempDir::new().unwrap();
        let script = dir.path().join("fake-docker");
        std::fs::write(&script, "#!/bin/sh\nexit 0\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let mut runner = SystemRunner::new(dir.path());
        let outcome = runner.run(&CommandSpec::new("./fake-docker")).unwrap();
        assert!(outcome.success);
    }

    #[test]
    fn recording_runner_scripts_failures() {
        let mut runner = RecordingRunner::new().fail_when("tests/unit", 1);
        let unit = runner
            .run(&CommandSpec::new("pytest").arg("tests/unit"))
            .unwrap();
        let integration = runner
            .run(&CommandSpec::new("pytest").arg("tests/integration"))
            .unwrap();
        assert_eq!(unit, ExitOutcome::from_code(1));
        assert!(integration.success);
        assert_eq!(runner.invocations.len(), 2);
    }
}
