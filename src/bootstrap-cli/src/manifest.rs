//! Patching the dev-server port into the project's `package.json`.

use anyhow::{Context, Result};
use regex::Regex;
use serde_json::Value;
use std::path::Path;
use std::sync::LazyLock;

use crate::project;

static PORT_ARG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"--port(?:=|\s+)\d+").expect("valid port regex"));

/// Rewrite (or append) `--port <port>` in a dev script command line.
pub fn with_port(script: &str, port: u16) -> String {
    let replacement = format!("--port {port}");
    if PORT_ARG.is_match(script) {
        PORT_ARG
            .replace_all(script, regex::NoExpand(&replacement))
            .into_owned()
    } else if script.trim().is_empty() {
        replacement
    } else {
        format!("{} {replacement}", script.trim_end())
    }
}

/// Set the dev port in the manifest of the project at `target`.
///
/// Returns `false` without touching anything when there is no manifest or
/// the manifest has no `scripts.dev`.
pub fn patch_dev_port(target: &Path, port: u16) -> Result<bool> {
    let Some(info) = project::resolve_root(target) else {
        return Ok(false);
    };
    let path = info.manifest_path();
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mut manifest: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    let Some(dev) = manifest
        .get_mut("scripts")
        .and_then(|scripts| scripts.get_mut("dev"))
    else {
        return Ok(false);
    };
    let Some(script) = dev.as_str() else {
        return Ok(false);
    };

    *dev = Value::String(with_port(script, port));

    let mut out = serde_json::to_string_pretty(&manifest)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;
    out.push('\n');
    std::fs::write(&path, out).with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::debug!(path = %path.display(), port, "patched dev port");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;
    use indoc::indoc;

    #[test]
    fn existing_port_is_replaced_in_place() {
        assert_eq!(with_port("vite --port 5173 --host", 4000), "vite --port 4000 --host");
        assert_eq!(with_port("vite --port=5173", 4000), "vite --port 4000");
    }

    #[test]
    fn missing_port_is_appended() {
        assert_eq!(with_port("vite", 4000), "vite --port 4000");
        assert_eq!(with_port("vite  ", 4000), "vite --port 4000");
    }

    #[test]
    fn patch_rewrites_monorepo_app_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("package.json"), r#"{"name":"root"}"#).unwrap();
        std::fs::create_dir_all(tmp.path().join("apps/web")).unwrap();
        std::fs::write(
            tmp.path().join("apps/web/package.json"),
            indoc! {r#"
                {
                  "name": "web",
                  "private": true,
                  "scripts": {
                    "dev": "vite --port 5173",
                    "build": "vite build"
                  }
                }
            "#},
        )
        .unwrap();

        assert!(patch_dev_port(tmp.path(), 4000).unwrap());

        let written = std::fs::read_to_string(tmp.path().join("apps/web/package.json")).unwrap();
        expect![[r#"
            {
              "name": "web",
              "private": true,
              "scripts": {
                "dev": "vite --port 4000",
                "build": "vite build"
              }
            }
        "#]]
        .assert_eq(&written);
    }

    #[test]
    fn manifest_without_dev_script_is_untouched() {
        let tmp = tempfile::tempdir().unwrap();
        let original = "{\"scripts\": {\"build\": \"vite build\"}}";
        std::fs::write(tmp.path().join("package.json"), original).unwrap();

        assert!(!patch_dev_port(tmp.path(), 4000).unwrap());
        assert_eq!(
            std::fs::read_to_string(tmp.path().join("package.json")).unwrap(),
            original
        );
    }

    #[test]
    fn missing_manifest_is_a_no_op() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(!patch_dev_port(tmp.path(), 4000).unwrap());
    }
}
