//! Running external tools (git, package managers, node).

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::Error;

/// One external command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl Invocation {
    pub fn new(program: &str, cwd: &Path) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
            cwd: cwd.to_path_buf(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<str>) -> Self {
        self.args.push(arg.as_ref().to_string());
        self
    }

    /// Shell-like rendering for messages.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Executes invocations. The child inherits the terminal.
pub trait Runner {
    /// Run to completion and return the exit code (`None` if killed by a signal).
    fn status(&self, invocation: &Invocation) -> Result<Option<i32>>;

    /// Run quietly and capture stdout. `None` when the program is missing or fails.
    fn capture(&self, invocation: &Invocation) -> Option<String>;
}

/// Runs commands with `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl Runner for SystemRunner {
    fn status(&self, invocation: &Invocation) -> Result<Option<i32>> {
        tracing::debug!(command = %invocation.display(), cwd = %invocation.cwd.display(), "spawning");
        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .status()
            .with_context(|| format!("Failed to run {}", invocation.program))?;
        Ok(status.code())
    }

    fn capture(&self, invocation: &Invocation) -> Option<String> {
        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .output()
            .ok()?;
        output
            .status
            .success()
            .then(|| String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Run `invocation`, turning a non-zero exit into [`Error::CommandFailed`].
pub fn run_checked(runner: &dyn Runner, invocation: &Invocation) -> Result<()> {
    match runner.status(invocation)? {
        Some(0) => Ok(()),
        code => Err(Error::CommandFailed {
            command: invocation.display(),
            code,
        }
        .into()),
    }
}
