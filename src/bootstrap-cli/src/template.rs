//! Template acquisition: local copy, direct clone, or clone-then-copy.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::process::{Invocation, Runner, run_checked};
use crate::project::{MANIFEST_FILE, MONOREPO_APP_DIR};
use crate::provision;

/// Name of the template directory shipped next to the executable.
pub const LOCAL_TEMPLATE_DIR: &str = "template";

pub const DEFAULT_TEMPLATE_REPO: &str = "https://github.com/clawdbot/clawdbot-ui.git";

/// Where template content comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    Local(PathBuf),
    Remote(String),
}

/// How a target directory gets populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    CopyLocal,
    Clone,
    CloneViaStaging,
}

/// The local template under `install_dir`, if both of its manifests exist.
pub fn local_template(install_dir: &Path) -> Option<PathBuf> {
    let root = install_dir.join(LOCAL_TEMPLATE_DIR);
    let available = root.join(MANIFEST_FILE).is_file()
        && root.join(MONOREPO_APP_DIR).join(MANIFEST_FILE).is_file();
    available.then_some(root)
}

/// Choose the strategy for `target`.
///
/// Git refuses to clone into an occupied path, so the current directory, and
/// any target that already has entries, go through a staging directory.
pub fn choose_strategy(
    source: &TemplateSource,
    target: &Path,
    is_current_directory: bool,
) -> Result<Strategy> {
    Ok(match source {
        TemplateSource::Local(_) => Strategy::CopyLocal,
        TemplateSource::Remote(_) if is_current_directory => Strategy::CloneViaStaging,
        TemplateSource::Remote(_) if provision::has_entries(target)? => Strategy::CloneViaStaging,
        TemplateSource::Remote(_) => Strategy::Clone,
    })
}

/// Fill `target` with template content.
pub fn populate(
    runner: &dyn Runner,
    source: &TemplateSource,
    target: &Path,
    is_current_directory: bool,
) -> Result<()> {
    let strategy = choose_strategy(source, target, is_current_directory)?;
    tracing::debug!(?strategy, target = %target.display(), "populating template");

    match source {
        TemplateSource::Local(root) => provision::copy_tree(root, target),
        TemplateSource::Remote(repo) if strategy == Strategy::CloneViaStaging => {
            clone_via_staging(runner, repo, target)
        }
        TemplateSource::Remote(repo) => clone_direct(runner, repo, target),
    }
}

fn clone_invocation(repo: &str, dest: &Path, cwd: &Path) -> Invocation {
    Invocation::new("git", cwd)
        .arg("clone")
        .arg("--depth")
        .arg("1")
        .arg(repo)
        .arg(dest.to_string_lossy())
}

fn clone_direct(runner: &dyn Runner, repo: &str, target: &Path) -> Result<()> {
    let parent = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    provision::ensure_directory(parent)?;

    run_checked(runner, &clone_invocation(repo, target, parent))?;

    // The clone carries the template's history; the project gets its own.
    let cloned_git = target.join(".git");
    if cloned_git.is_dir() {
        std::fs::remove_dir_all(&cloned_git)
            .with_context(|| format!("Failed to remove {}", cloned_git.display()))?;
    }
    Ok(())
}

fn clone_via_staging(runner: &dyn Runner, repo: &str, target: &Path) -> Result<()> {
    // Dropping the TempDir removes it on every exit path, failed copy included.
    let staging = tempfile::Builder::new()
        .prefix("clawdbot-template-")
        .tempdir()
        .context("Failed to create staging directory")?;
    let checkout = staging.path().join("checkout");

    run_checked(runner, &clone_invocation(repo, &checkout, staging.path()))?;
    provision::copy_tree(&checkout, target)?;

    staging
        .close()
        .context("Failed to remove staging directory")
}
