//! Project layout and package manager detection.

use std::fmt;
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "package.json";

/// Nested application directory of a monorepo layout, relative to the root.
pub const MONOREPO_APP_DIR: &str = "apps/web";

/// Where a directory's application lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectMode {
    /// Application under [`MONOREPO_APP_DIR`].
    Monorepo,
    /// Manifest at the root.
    Single,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRootInfo {
    pub mode: ProjectMode,
    pub root: PathBuf,
    pub app_dir: PathBuf,
}

impl ProjectRootInfo {
    pub fn manifest_path(&self) -> PathBuf {
        self.app_dir.join(MANIFEST_FILE)
    }
}

/// Work out the layout of `dir`. `None` when it holds no project.
pub fn resolve_root(dir: &Path) -> Option<ProjectRootInfo> {
    let root = std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf());
    let nested = root.join(MONOREPO_APP_DIR);

    let info = if nested.join(MANIFEST_FILE).is_file() {
        ProjectRootInfo {
            mode: ProjectMode::Monorepo,
            app_dir: nested,
            root,
        }
    } else if root.join(MANIFEST_FILE).is_file() {
        ProjectRootInfo {
            mode: ProjectMode::Single,
            app_dir: root.clone(),
            root,
        }
    } else {
        tracing::debug!(dir = %dir.display(), "no project manifest found");
        return None;
    };

    tracing::debug!(mode = ?info.mode, app_dir = %info.app_dir.display(), "resolved project root");
    Some(info)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Pnpm,
    Yarn,
    Npm,
}

impl PackageManager {
    pub fn program(self) -> &'static str {
        match self {
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "yarn",
            PackageManager::Npm => "npm",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

/// Pick a package manager from the lockfiles in `dir`.
pub fn detect_package_manager(dir: &Path) -> PackageManager {
    let manager = if dir.join("pnpm-lock.yaml").is_file() {
        PackageManager::Pnpm
    } else if dir.join("yarn.lock").is_file() {
        PackageManager::Yarn
    } else {
        PackageManager::Npm
    };
    tracing::debug!(dir = %dir.display(), %manager, "detected package manager");
    manager
}
