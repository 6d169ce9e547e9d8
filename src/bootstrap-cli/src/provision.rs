//! Directory checks and template tree copying.

use anyhow::{Context, Result};
use std::path::Path;
use walkdir::WalkDir;

/// Entries that do not make a directory "occupied".
pub const IGNORED_ENTRIES: &[&str] = &[".git", ".DS_Store", "Thumbs.db"];

/// Entries never copied out of a template, at any depth.
pub const COPY_EXCLUDES: &[&str] = &[
    "node_modules",
    ".git",
    ".env.local",
    ".turbo",
    ".vite",
    ".cache",
    ".pnpm-store",
    "dist",
    ".DS_Store",
    "Thumbs.db",
];

/// Create `path` and its parents. No-op when it already exists.
pub fn ensure_directory(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)
        .with_context(|| format!("Failed to create directory {}", path.display()))
}

/// True when `path` is missing, or holds nothing besides [`IGNORED_ENTRIES`].
pub fn is_empty(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    for entry in std::fs::read_dir(path)
        .with_context(|| format!("Failed to read directory {}", path.display()))?
    {
        let entry = entry?;
        let name = entry.file_name();
        if !IGNORED_ENTRIES.iter().any(|ignored| name == *ignored) {
            return Ok(false);
        }
    }
    Ok(true)
}

/// True when `path` exists and has any entry at all, ignored ones included.
pub fn has_entries(path: &Path) -> Result<bool> {
    if !path.is_dir() {
        return Ok(false);
    }
    let mut entries = std::fs::read_dir(path)
        .with_context(|| format!("Failed to read directory {}", path.display()))?;
    Ok(entries.next().is_some())
}

/// Remove everything inside `path` except [`IGNORED_ENTRIES`], keeping the
/// directory itself (and any existing repository).
pub fn clear_directory(path: &Path) -> Result<()> {
    for entry in std::fs::read_dir(path)
        .with_context(|| format!("Failed to read directory {}", path.display()))?
    {
        let entry = entry?;
        if IGNORED_ENTRIES.iter().any(|ignored| entry.file_name() == *ignored) {
            continue;
        }
        let entry_path = entry.path();
        let result = if entry.file_type()?.is_dir() {
            std::fs::remove_dir_all(&entry_path)
        } else {
            std::fs::remove_file(&entry_path)
        };
        result.with_context(|| format!("Failed to remove {}", entry_path.display()))?;
    }
    Ok(())
}

/// Recursively copy `source` into `dest`, skipping [`COPY_EXCLUDES`] by name
/// at every level. Existing files in `dest` are overwritten.
pub fn copy_tree(source: &Path, dest: &Path) -> Result<()> {
    ensure_directory(dest)?;

    let walker = WalkDir::new(source)
        .min_depth(1)
        .into_iter()
        .filter_entry(|entry| !is_excluded(entry.file_name()));

    let mut copied = 0usize;
    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to walk {}", source.display()))?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .with_context(|| format!("{} escaped {}", entry.path().display(), source.display()))?;
        let target = dest.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            ensure_directory(&target)?;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)?;
            copied += 1;
        } else {
            std::fs::copy(entry.path(), &target).with_context(|| {
                format!(
                    "Failed to copy {} to {}",
                    entry.path().display(),
                    target.display()
                )
            })?;
            copied += 1;
        }
    }

    tracing::debug!(
        source = %source.display(),
        dest = %dest.display(),
        files = copied,
        "copied template tree"
    );
    Ok(())
}

fn is_excluded(name: &std::ffi::OsStr) -> bool {
    COPY_EXCLUDES.iter().any(|excluded| name == *excluded)
}

#[cfg(unix)]
fn copy_symlink(link: &Path, target: &Path) -> Result<()> {
    let points_to = std::fs::read_link(link)
        .with_context(|| format!("Failed to read link {}", link.display()))?;
    if target.symlink_metadata().is_ok() {
        std::fs::remove_file(target)
            .with_context(|| format!("Failed to replace {}", target.display()))?;
    }
    std::os::unix::fs::symlink(&points_to, target)
        .with_context(|| format!("Failed to create link {}", target.display()))
}

#[cfg(not(unix))]
fn copy_symlink(link: &Path, target: &Path) -> Result<()> {
    std::fs::copy(link, target)
        .map(|_| ())
        .with_context(|| format!("Failed to copy {} to {}", link.display(), target.display()))
}
