//! Bootstrap engine for clawdbot UI projects.
//!
//! Provisions a working copy of the UI template into a directory, collects
//! the gateway settings (from flags, prompts or defaults), writes them to the
//! project's env file and optionally installs dependencies and starts the dev
//! server. Also forwards `dev`/`build`/`preview`/`test`/`lint` to the
//! project's own scripts and checks the machine with `doctor`.

use console::style;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

pub mod args;
pub mod commands;
pub mod config;
pub mod context;
pub mod doctor;
pub mod env_file;
pub mod git;
pub mod manifest;
pub mod process;
pub mod project;
pub mod prompt;
pub mod provision;
pub mod template;

pub use args::{ParsedArguments, parse};
pub use commands::Orchestrator;
pub use config::{BootstrapConfig, EnvValues};
pub use context::Context;
pub use project::{PackageManager, ProjectMode, ProjectRootInfo};

/// Filter directives for diagnostic logging, e.g. `CLAWDBOT_BOOTSTRAP_LOG=debug`.
pub const LOG_ENV: &str = "CLAWDBOT_BOOTSTRAP_LOG";

// ============================================================================
// Error type
// ============================================================================

/// Failures with a defined exit behavior.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("target directory {} is not empty (use --force to replace its contents)", .path.display())]
    TargetNotEmpty { path: PathBuf },

    #[error(
        "refusing to --force overwrite {}: it is or contains the current directory",
        .path.display()
    )]
    ForceCurrentDirectory { path: PathBuf },

    #[error(
        "no project found in {}; run `{}` to create one, or cd into a project directory",
        .path.display(),
        commands::BIN_NAME
    )]
    NoProject { path: PathBuf },

    #[error("`{command}` {}", describe_exit(.code))]
    CommandFailed { command: String, code: Option<i32> },

    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("doctor found {0} issue(s)")]
    DoctorIssues(usize),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with status {code}"),
        None => "was terminated by a signal".to_string(),
    }
}

impl Error {
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::CommandFailed {
                code: Some(code), ..
            } => *code,
            _ => 1,
        }
    }
}

/// Exit code for any error reaching the top level.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<Error>().map_or(1, Error::exit_code)
}

// ============================================================================
// Entry point
// ============================================================================

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

/// Main entry point for the CLI.
pub fn main() -> ExitCode {
    init_tracing();

    let args = args::parse(
        std::env::args_os()
            .skip(1)
            .map(|arg| arg.to_string_lossy().into_owned()),
    );
    let result = Context::from_process().and_then(|ctx| {
        let mut prompter = prompt::TerminalPrompter;
        Orchestrator::new(&ctx, &process::SystemRunner, &mut prompter).run(&args)
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", style("error:").red().bold());
            ExitCode::from(u8::try_from(exit_code(&err)).unwrap_or(1))
        }
    }
}
