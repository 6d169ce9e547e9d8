//! Shared helpers for the orchestrator integration tests.

#![allow(dead_code)]

use bootstrap_cli::process::{Invocation, Runner, SystemRunner};
use bootstrap_cli::prompt::LinePrompter;
use bootstrap_cli::{Context, Orchestrator};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub fn fixtures_dir() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    // bootstrap-cli is at src/bootstrap-cli, workspace root is two levels up
    manifest_dir
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests/fixtures")
}

/// A context rooted at `cwd` whose installation carries the fixture template.
pub fn context(cwd: &Path) -> Context {
    Context {
        cwd: cwd.to_path_buf(),
        install_dir: fixtures_dir().join("install"),
        template_repo: "https://example.invalid/clawdbot-ui.git".to_string(),
        terminal: false,
    }
}

/// Runs `git` for real and records everything else without executing it.
#[derive(Default)]
pub struct Recorder {
    pub calls: RefCell<Vec<Invocation>>,
    /// Exit codes by program name; unlisted programs exit 0.
    pub exit_codes: BTreeMap<String, i32>,
}

impl Recorder {
    pub fn failing(program: &str, code: i32) -> Self {
        Self {
            exit_codes: BTreeMap::from([(program.to_string(), code)]),
            ..Default::default()
        }
    }

    /// Recorded non-git invocations, rendered.
    pub fn commands(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.program != "git")
            .map(Invocation::display)
            .collect()
    }
}

impl Runner for Recorder {
    fn status(&self, invocation: &Invocation) -> anyhow::Result<Option<i32>> {
        self.calls.borrow_mut().push(invocation.clone());
        if invocation.program == "git" {
            return SystemRunner.status(invocation);
        }
        Ok(Some(
            self.exit_codes
                .get(&invocation.program)
                .copied()
                .unwrap_or(0),
        ))
    }

    fn capture(&self, _: &Invocation) -> Option<String> {
        None
    }
}

pub fn git_available() -> bool {
    which::which("git").is_ok()
}

/// Run one invocation with scripted prompt answers.
pub fn run(ctx: &Context, runner: &Recorder, tokens: &[&str], answers: &str) -> anyhow::Result<()> {
    let args = bootstrap_cli::parse(tokens.iter().copied());
    let mut prompter = LinePrompter::new(answers.as_bytes(), Vec::new());
    Orchestrator::new(ctx, runner, &mut prompter).run(&args)
}

pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()))
}
