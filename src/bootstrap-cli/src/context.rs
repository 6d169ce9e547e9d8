//! Process-wide state made explicit.

use anyhow::{Context as _, Result};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use crate::template::{self, DEFAULT_TEMPLATE_REPO, TemplateSource};

/// Overrides the remote template repository.
pub const TEMPLATE_REPO_ENV: &str = "CLAWDBOT_TEMPLATE_REPO";

/// Everything the orchestrator would otherwise read from the process.
#[derive(Debug, Clone)]
pub struct Context {
    /// Working directory relative paths resolve against. Must be absolute.
    pub cwd: PathBuf,
    /// Directory of the running executable; the local template lives here.
    pub install_dir: PathBuf,
    pub template_repo: String,
    /// Both stdin and stdout are terminals.
    pub terminal: bool,
}

impl Context {
    pub fn from_process() -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        let exe = std::env::current_exe().context("Failed to locate executable")?;
        let install_dir = exe
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| cwd.clone());
        let template_repo = std::env::var(TEMPLATE_REPO_ENV)
            .ok()
            .filter(|repo| !repo.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TEMPLATE_REPO.to_string());
        let terminal = std::io::stdin().is_terminal() && std::io::stdout().is_terminal();

        Ok(Self {
            cwd,
            install_dir,
            template_repo,
            terminal,
        })
    }

    /// Resolve `path` against [`Context::cwd`].
    pub fn resolve(&self, path: &str) -> PathBuf {
        let joined = self.cwd.join(path);
        normalize(&joined)
    }

    pub fn is_cwd(&self, path: &Path) -> bool {
        match (path.canonicalize(), self.cwd.canonicalize()) {
            (Ok(a), Ok(b)) => a == b,
            _ => normalize(path) == normalize(&self.cwd),
        }
    }

    /// Whether `path` is the working directory or one of its ancestors.
    pub fn contains_cwd(&self, path: &Path) -> bool {
        match (path.canonicalize(), self.cwd.canonicalize()) {
            (Ok(path), Ok(cwd)) => cwd.starts_with(path),
            _ => normalize(&self.cwd).starts_with(normalize(path)),
        }
    }

    /// Local template if installed, else the remote repository.
    pub fn template_source(&self) -> TemplateSource {
        match template::local_template(&self.install_dir) {
            Some(root) => TemplateSource::Local(root),
            None => TemplateSource::Remote(self.template_repo.clone()),
        }
    }
}

/// Drop `.` components and fold `..` without touching the filesystem.
///
/// Expects an absolute path: `..` at the root stays at the root.
fn normalize(path: &Path) -> PathBuf {
    use std::path::Component;

    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}
