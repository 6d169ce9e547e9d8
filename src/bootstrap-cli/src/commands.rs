//! Command dispatch and the bootstrap/init flows.

use anyhow::Result;
use clap::{Arg, ArgAction};
use console::style;
use std::path::{Path, PathBuf};

use crate::Error;
use crate::args::ParsedArguments;
use crate::config::{self, BootstrapConfig, DEFAULT_PORT, EnvValues, Mode};
use crate::context::Context;
use crate::process::{Invocation, Runner, run_checked};
use crate::project::{self, PackageManager, ProjectMode, ProjectRootInfo};
use crate::prompt::Prompter;
use crate::{doctor, env_file, git, manifest, provision, template};

pub const BIN_NAME: &str = "clawdbot-bootstrap";

/// Project scripts reachable as top-level commands.
pub const PASSTHROUGH_SCRIPTS: &[&str] = &["dev", "build", "preview", "test", "lint"];

const GATEWAY_OPTIONS: &[&str] = &["gateway-url", "gateway-token", "gateway-password"];

/// What an invocation asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Bootstrap,
    Init { dir: Option<String> },
    Doctor,
    Passthrough(&'static str),
    Unknown(String),
}

impl Command {
    pub fn select(args: &ParsedArguments) -> Self {
        if args.wants_help() {
            return Command::Help;
        }
        match args.command() {
            None => Command::Bootstrap,
            Some("init") => Command::Init {
                dir: args.positionals.get(1).cloned(),
            },
            Some("doctor") => Command::Doctor,
            Some(name) => match PASSTHROUGH_SCRIPTS.iter().find(|script| **script == name) {
                Some(script) => Command::Passthrough(*script),
                None => Command::Unknown(name.to_string()),
            },
        }
    }
}

// ============================================================================
// Usage
// ============================================================================

fn usage_command() -> clap::Command {
    let option = |name: &'static str, value: &'static str, help: &'static str| {
        Arg::new(name).long(name).value_name(value).help(help)
    };
    let switch = |name: &'static str, help: &'static str| {
        Arg::new(name).long(name).action(ArgAction::SetTrue).help(help)
    };

    clap::Command::new(BIN_NAME)
        .about("Create, configure and run clawdbot UI projects")
        .override_usage(format!(
            "{BIN_NAME} [options]\n       {BIN_NAME} <command> [options]"
        ))
        .disable_help_subcommand(true)
        .subcommand(
            clap::Command::new("init")
                .about("Provision a project in DIR (default: current directory) without starting it")
                .arg(Arg::new("dir").value_name("DIR")),
        )
        .subcommand(
            clap::Command::new("doctor")
                .about("Check the Node.js version and that pnpm is installed"),
        )
        .subcommands(PASSTHROUGH_SCRIPTS.iter().map(|script| {
            clap::Command::new(*script).about(format!("Run the project's `{script}` script"))
        }))
        .arg(option("project-name", "NAME", "Project name"))
        .arg(option("gateway-url", "URL", "Gateway URL"))
        .arg(option("gateway-token", "TOKEN", "Gateway token"))
        .arg(option("gateway-password", "PASSWORD", "Gateway password"))
        .arg(option("port", "PORT", "Dev server port (1-65535)"))
        .arg(switch("yes", "Accept defaults without prompting"))
        .arg(switch("no-start", "Do not install dependencies or start the dev server"))
        .arg(switch("force", "Replace the contents of a non-empty target directory"))
        .arg(switch("skip-env", "Do not write the gateway env file"))
}

/// Rendered help text.
pub fn usage() -> String {
    usage_command().render_help().to_string()
}

// ============================================================================
// Orchestration
// ============================================================================

/// Sequences the components for one invocation.
pub struct Orchestrator<'a> {
    ctx: &'a Context,
    runner: &'a dyn Runner,
    prompter: &'a mut dyn Prompter,
}

impl<'a> Orchestrator<'a> {
    pub fn new(ctx: &'a Context, runner: &'a dyn Runner, prompter: &'a mut dyn Prompter) -> Self {
        Self {
            ctx,
            runner,
            prompter,
        }
    }

    pub fn run(&mut self, args: &ParsedArguments) -> Result<()> {
        let command = Command::select(args);
        tracing::debug!(?command, "dispatching");

        match command {
            Command::Help => {
                print!("{}", usage());
                Ok(())
            }
            Command::Bootstrap => self.bootstrap(args),
            Command::Init { dir } => self.init(args, dir.as_deref().unwrap_or(".")),
            Command::Doctor => doctor::run(self.ctx, self.runner),
            Command::Passthrough(script) => self.passthrough(script),
            Command::Unknown(name) => {
                eprint!("{}", usage());
                Err(Error::UnknownCommand(name).into())
            }
        }
    }

    /// Default flow: configure, provision, write env, then install and start.
    fn bootstrap(&mut self, args: &ParsedArguments) -> Result<()> {
        let mode = Mode::select(args, self.ctx.terminal);
        let config = config::collect(args, mode, &mut *self.prompter)?;

        let target = if provision::is_empty(&self.ctx.cwd)? {
            self.ctx.cwd.clone()
        } else {
            self.ctx.resolve(&config.project_name)
        };

        self.provision(&target, args.has_flag("force"))?;
        self.patch_port(&target, config.port)?;
        if args.has_flag("skip-env") {
            tracing::debug!("skipping env file");
        } else {
            self.write_env(&target, &config.env, mode)?;
        }

        if config.auto_start {
            self.install_and_start(&target)
        } else {
            print_next_steps(self.ctx, &target);
            Ok(())
        }
    }

    /// `init [dir]`: provision only; env and port follow the flags given.
    fn init(&mut self, args: &ParsedArguments, dir: &str) -> Result<()> {
        let target = self.ctx.resolve(dir);
        self.provision(&target, args.has_flag("force"))?;

        let mode = Mode::select(args, self.ctx.terminal);
        let gateway_flags = GATEWAY_OPTIONS.iter().any(|name| args.value(name).is_some());
        let skip_env = args.has_flag("skip-env");

        let config: Option<BootstrapConfig> =
            if !skip_env && (gateway_flags || mode == Mode::Interactive) {
                Some(config::collect_for_directory(
                    args,
                    mode,
                    &mut *self.prompter,
                )?)
            } else {
                None
            };

        let port = match &config {
            Some(config) if mode == Mode::Interactive || args.value("port").is_some() => {
                Some(config.port)
            }
            Some(_) => None,
            None => args
                .value("port")
                .map(|value| config::parse_port(value, DEFAULT_PORT)),
        };
        if let Some(port) = port {
            self.patch_port(&target, port)?;
        }

        match &config {
            Some(config) => self.write_env(&target, &config.env, mode)?,
            None if !skip_env => println!(
                "{} No gateway settings given; pass --gateway-url/--gateway-token to write {}",
                style("!").yellow(),
                env_file::ENV_FILE
            ),
            None => {}
        }

        print_next_steps(self.ctx, &target);
        Ok(())
    }

    /// Guard the target, then fill it with the template and make it a repository.
    fn provision(&self, target: &Path, force: bool) -> Result<()> {
        let is_cwd = self.ctx.is_cwd(target);

        if !provision::is_empty(target)? {
            if !force {
                return Err(Error::TargetNotEmpty {
                    path: target.to_path_buf(),
                }
                .into());
            }
            if self.ctx.contains_cwd(target) {
                return Err(Error::ForceCurrentDirectory {
                    path: target.to_path_buf(),
                }
                .into());
            }
            tracing::debug!(target = %target.display(), "clearing target for --force");
            provision::clear_directory(target)?;
        }

        provision::ensure_directory(target)?;
        let source = self.ctx.template_source();
        template::populate(self.runner, &source, target, is_cwd)?;
        println!(
            "{} Created project in {}",
            style("✓").green(),
            style(target.display()).bold()
        );

        git::ensure_repository(self.runner, target);
        Ok(())
    }

    fn patch_port(&self, target: &Path, port: u16) -> Result<()> {
        if manifest::patch_dev_port(target, port)? {
            println!("{} Dev server port set to {port}", style("✓").green());
        }
        Ok(())
    }

    fn write_env(&mut self, target: &Path, values: &EnvValues, mode: Mode) -> Result<()> {
        let path = env_file::resolve_env_path(target);
        if path.exists() && mode == Mode::Interactive {
            let overwrite = self
                .prompter
                .confirm(&format!("{} already exists. Overwrite?", path.display()), false)?;
            if !overwrite {
                println!("Keeping existing {}", path.display());
                return Ok(());
            }
        }
        let path = env_file::write(target, values)?;
        println!("{} Wrote {}", style("✓").green(), path.display());
        Ok(())
    }

    fn install_and_start(&self, target: &Path) -> Result<()> {
        let info = project::resolve_root(target).ok_or_else(|| Error::NoProject {
            path: target.to_path_buf(),
        })?;
        let manager = project::detect_package_manager(&info.root);

        println!("Installing dependencies with {manager}...");
        run_checked(self.runner, &Invocation::new(manager.program(), &info.root).arg("install"))?;

        println!("Starting dev server...");
        run_checked(self.runner, &script_invocation(&info, manager, "dev"))
    }

    fn passthrough(&self, script: &str) -> Result<()> {
        let info = project::resolve_root(&self.ctx.cwd).ok_or_else(|| Error::NoProject {
            path: self.ctx.cwd.clone(),
        })?;
        let manager = project::detect_package_manager(&info.root);
        run_checked(self.runner, &script_invocation(&info, manager, script))
    }
}

/// How `script` gets run for the project in `info`.
///
/// A pnpm monorepo is driven from the root with `--dir` pointing at the app;
/// everything else runs from the app directory itself.
pub fn script_invocation(
    info: &ProjectRootInfo,
    manager: PackageManager,
    script: &str,
) -> Invocation {
    match (info.mode, manager) {
        (ProjectMode::Monorepo, PackageManager::Pnpm) => Invocation::new("pnpm", &info.root)
            .arg("--dir")
            .arg(info.app_dir.to_string_lossy())
            .arg("run")
            .arg(script),
        _ => Invocation::new(manager.program(), &info.app_dir)
            .arg("run")
            .arg(script),
    }
}

fn print_next_steps(ctx: &Context, target: &Path) {
    let manager = project::detect_package_manager(target);
    println!();
    println!("Next steps:");
    if !ctx.is_cwd(target) {
        println!("  cd {}", display_relative(ctx, target).display());
    }
    println!("  {manager} install");
    println!("  {manager} run dev");
}

fn display_relative(ctx: &Context, target: &Path) -> PathBuf {
    target
        .strip_prefix(&ctx.cwd)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| target.to_path_buf())
}
