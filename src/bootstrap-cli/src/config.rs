//! Bootstrap configuration: flag values, prompts and built-in defaults.
//!
//! Every field resolves through the same chain, `--flag` value first, then
//! the built-in default. In an interactive session that resolved value is
//! only the pre-filled answer; the operator's response wins when non-empty.

use anyhow::Result;

use crate::args::ParsedArguments;
use crate::prompt::Prompter;

pub const DEFAULT_PROJECT_NAME: &str = "clawdbot-ui";
pub const DEFAULT_GATEWAY_URL: &str = "ws://127.0.0.1:18789";
pub const DEFAULT_PORT: u16 = 5173;

/// Gateway settings persisted to the project's env file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvValues {
    pub gateway_url: String,
    pub gateway_token: String,
    pub gateway_password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapConfig {
    pub project_name: String,
    pub env: EnvValues,
    pub port: u16,
    pub auto_start: bool,
}

/// How configuration gets collected for this invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Interactive,
    NonInteractive,
}

impl Mode {
    /// `--yes` or a non-terminal stdin/stdout rules out prompting.
    pub fn select(args: &ParsedArguments, terminal: bool) -> Self {
        if args.has_flag("yes") || !terminal {
            Mode::NonInteractive
        } else {
            Mode::Interactive
        }
    }
}

/// Parse a port in 1..=65535, or fall back to `default`.
pub fn parse_port(input: &str, default: u16) -> u16 {
    match input.trim().parse::<u16>() {
        Ok(port) if port != 0 => port,
        _ => default,
    }
}

/// Flag-or-default values, before any prompting.
#[derive(Debug, Clone)]
struct Defaults {
    project_name: String,
    gateway_url: String,
    gateway_token: String,
    gateway_password: String,
    port: u16,
}

impl Defaults {
    fn from_args(args: &ParsedArguments) -> Self {
        let text = |name: &str, fallback: &str| {
            args.value(name)
                .filter(|v| !v.is_empty())
                .unwrap_or(fallback)
                .to_string()
        };
        Self {
            project_name: text("project-name", DEFAULT_PROJECT_NAME),
            gateway_url: text("gateway-url", DEFAULT_GATEWAY_URL),
            gateway_token: text("gateway-token", ""),
            gateway_password: text("gateway-password", ""),
            port: args
                .value("port")
                .map_or(DEFAULT_PORT, |v| parse_port(v, DEFAULT_PORT)),
        }
    }
}

/// Build the configuration for this invocation.
pub fn collect(
    args: &ParsedArguments,
    mode: Mode,
    prompter: &mut dyn Prompter,
) -> Result<BootstrapConfig> {
    gather(args, mode, prompter, true)
}

/// Like [`collect`], for a target directory that is already chosen: the
/// project name is not asked for.
pub fn collect_for_directory(
    args: &ParsedArguments,
    mode: Mode,
    prompter: &mut dyn Prompter,
) -> Result<BootstrapConfig> {
    gather(args, mode, prompter, false)
}

fn gather(
    args: &ParsedArguments,
    mode: Mode,
    prompter: &mut dyn Prompter,
    ask_name: bool,
) -> Result<BootstrapConfig> {
    let defaults = Defaults::from_args(args);
    let auto_start = !args.has_flag("no-start");

    if mode == Mode::NonInteractive {
        tracing::debug!("collecting configuration without prompts");
        return Ok(BootstrapConfig {
            project_name: defaults.project_name,
            env: EnvValues {
                gateway_url: defaults.gateway_url,
                gateway_token: defaults.gateway_token,
                gateway_password: defaults.gateway_password,
            },
            port: defaults.port,
            auto_start,
        });
    }

    let project_name = if ask_name {
        or_default(
            prompter.input("Project name", &defaults.project_name)?,
            defaults.project_name,
        )
    } else {
        defaults.project_name
    };
    let gateway_url = or_default(
        prompter.input("Gateway URL", &defaults.gateway_url)?,
        defaults.gateway_url,
    );
    let gateway_token = or_default(
        prompter.input("Gateway token (optional)", &defaults.gateway_token)?,
        defaults.gateway_token,
    );
    let has_password = !defaults.gateway_password.is_empty();
    let gateway_password = or_default(
        prompter.secret("Gateway password (optional)", has_password)?,
        defaults.gateway_password,
    );
    let port_default = defaults.port.to_string();
    let port = parse_port(
        &prompter.input("Dev server port", &port_default)?,
        defaults.port,
    );

    Ok(BootstrapConfig {
        project_name,
        env: EnvValues {
            gateway_url,
            gateway_token,
            gateway_password,
        },
        port,
        auto_start,
    })
}

fn or_default(response: String, default: String) -> String {
    if response.is_empty() { default } else { response }
}
