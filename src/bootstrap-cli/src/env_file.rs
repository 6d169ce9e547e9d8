//! Writing gateway settings to the project's env file.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::EnvValues;
use crate::project::{self, ProjectMode};
use crate::provision;

pub const ENV_FILE: &str = ".env.local";

pub const GATEWAY_URL_KEY: &str = "CLAWDBOT_GATEWAY_URL";
pub const GATEWAY_TOKEN_KEY: &str = "CLAWDBOT_GATEWAY_TOKEN";
pub const GATEWAY_PASSWORD_KEY: &str = "CLAWDBOT_GATEWAY_PASSWORD";

/// Env file location for the layout found in `target`.
pub fn resolve_env_path(target: &Path) -> PathBuf {
    match project::resolve_root(target) {
        Some(info) if info.mode == ProjectMode::Monorepo => info.app_dir.join(ENV_FILE),
        _ => target.join(ENV_FILE),
    }
}

/// Render `KEY=VALUE` lines. An empty password gets no line at all.
pub fn render(values: &EnvValues) -> String {
    let mut out = format!(
        "{GATEWAY_URL_KEY}={}\n{GATEWAY_TOKEN_KEY}={}\n",
        values.gateway_url, values.gateway_token
    );
    if !values.gateway_password.is_empty() {
        out.push_str(&format!("{GATEWAY_PASSWORD_KEY}={}\n", values.gateway_password));
    }
    out
}

/// Write the env file for `target`, replacing any existing one. Returns its path.
pub fn write(target: &Path, values: &EnvValues) -> Result<PathBuf> {
    let path = resolve_env_path(target);
    if let Some(parent) = path.parent() {
        provision::ensure_directory(parent)?;
    }
    std::fs::write(&path, render(values))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), "wrote env file");
    Ok(path)
}
