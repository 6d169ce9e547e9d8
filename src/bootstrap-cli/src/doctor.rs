//! `doctor`: is this machine ready to run a project?

use console::style;
use semver::Version;

use crate::Error;
use crate::context::Context;
use crate::process::{Invocation, Runner};

pub const MIN_NODE_VERSION: Version = Version::new(22, 0, 0);
pub const PREFERRED_PACKAGE_MANAGER: &str = "pnpm";

/// Check `node --version` output against [`MIN_NODE_VERSION`].
pub fn check_node(version_output: Option<&str>) -> Option<String> {
    let Some(output) = version_output else {
        return Some(format!(
            "Node.js not found. Install Node.js {MIN_NODE_VERSION} or newer."
        ));
    };
    let raw = output.trim().trim_start_matches('v');
    match Version::parse(raw) {
        Ok(version) if version >= MIN_NODE_VERSION => None,
        Ok(version) => Some(format!(
            "Node.js {version} is too old. Install Node.js {MIN_NODE_VERSION} or newer."
        )),
        Err(_) => Some(format!("Could not parse Node.js version from '{raw}'.")),
    }
}

/// Report a missing preferred package manager.
pub fn check_package_manager(found: bool) -> Option<String> {
    (!found).then(|| {
        format!(
            "{PREFERRED_PACKAGE_MANAGER} not found on PATH. Install it with `npm install -g {PREFERRED_PACKAGE_MANAGER}` or `corepack enable`."
        )
    })
}

/// Every issue found on this machine, in check order.
pub fn collect_issues(ctx: &Context, runner: &dyn Runner) -> Vec<String> {
    let node = runner.capture(&Invocation::new("node", &ctx.cwd).arg("--version"));
    let pnpm = which::which(PREFERRED_PACKAGE_MANAGER).is_ok();
    tracing::debug!(node = ?node.as_deref().map(str::trim), pnpm, "doctor probes");

    [check_node(node.as_deref()), check_package_manager(pnpm)]
        .into_iter()
        .flatten()
        .collect()
}

pub fn run(ctx: &Context, runner: &dyn Runner) -> anyhow::Result<()> {
    let issues = collect_issues(ctx, runner);
    if issues.is_empty() {
        println!("{} Environment looks good", style("✓").green());
        return Ok(());
    }
    for issue in &issues {
        eprintln!("{} {issue}", style("✗").red());
    }
    Err(Error::DoctorIssues(issues.len()).into())
}
