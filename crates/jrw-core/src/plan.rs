//! The step model shared by the build and test dispatchers.
//!
//! A dispatch is planned up front as an ordered `Vec<Step>` and then handed
//! to [`crate::pipeline::execute`]. Planning is pure so dry runs and tests
//! can inspect exactly what would be spawned.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// CommandSpec
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Build a command from an argv vector. Returns None for an empty vector.
    pub fn from_argv<I, S>(argv: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut iter = argv.into_iter().map(Into::into);
        let program = iter.next()?;
        Some(Self {
            program,
            args: iter.collect(),
        })
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Shell-like rendering, quoting arguments that contain whitespace.
    pub fn display(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|part| quote(part))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

fn quote(part: &str) -> String {
    if part.is_empty() {
        return "''".to_string();
    }
    if part.chars().any(|c| c.is_whitespace() || c == '\'' || c == '"') {
        format!("'{}'", part.replace('\'', r"'\''"))
    } else {
        part.to_string()
    }
}

// ---------------------------------------------------------------------------
// Step
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Step {
    Exec { name: String, command: CommandSpec },
    Wait { name: String, seconds: u64 },
}

impl Step {
    pub fn exec(name: impl Into<String>, command: CommandSpec) -> Self {
        Step::Exec {
            name: name.into(),
            command,
        }
    }

    pub fn wait(name: impl Into<String>, seconds: u64) -> Self {
        Step::Wait {
            name: name.into(),
            seconds,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Step::Exec { name, .. } | Step::Wait { name, .. } => name,
        }
    }

    pub fn command(&self) -> Option<&CommandSpec> {
        match self {
            Step::Exec { command, .. } => Some(command),
            Step::Wait { .. } => None,
        }
    }

    /// The line a dry run prints for this step.
    pub fn display(&self) -> String {
        match self {
            Step::Exec { command, .. } => command.display(),
            Step::Wait { seconds, .. } => format!("sleep {seconds}"),
        }
    }
}
