//! Making sure a new project starts life as a git repository.

use console::style;
use std::path::Path;

use crate::process::{Invocation, Runner};

/// Initialize a repository in `dir` unless one is already there.
///
/// Failure is tolerated: the project is usable without git, so a missing
/// binary or a failing `git init` only gets logged.
pub fn ensure_repository(runner: &dyn Runner, dir: &Path) {
    if dir.join(".git").exists() {
        tracing::debug!(dir = %dir.display(), "git repository already present");
        return;
    }

    let init = Invocation::new("git", dir).arg("init").arg("--quiet");
    match runner.status(&init) {
        Ok(Some(0)) => println!("{} Initialized git repository", style("✓").green()),
        Ok(code) => tracing::warn!(?code, "git init exited unsuccessfully; continuing"),
        Err(e) => tracing::warn!("git init could not run: {e:#}; continuing"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<Invocation>>,
        result: Option<i32>,
        spawn_error: bool,
    }

    impl Runner for Recorder {
        fn status(&self, invocation: &Invocation) -> anyhow::Result<Option<i32>> {
            self.calls.borrow_mut().push(invocation.clone());
            if self.spawn_error {
                anyhow::bail!("git: not found");
            }
            Ok(self.result)
        }

        fn capture(&self, _: &Invocation) -> Option<String> {
            None
        }
    }

    #[test]
    fn existing_repository_is_left_alone() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join(".git")).unwrap();
        let runner = Recorder::default();

        ensure_repository(&runner, tmp.path());

        assert!(runner.calls.borrow().is_empty());
    }

    #[test]
    fn missing_repository_runs_git_init_in_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = Recorder {
            result: Some(0),
            ..Default::default()
        };

        ensure_repository(&runner, tmp.path());

        let calls = runner.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].display(), "git init --quiet");
        assert_eq!(calls[0].cwd, tmp.path());
    }

    #[test]
    fn failures_are_not_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        ensure_repository(
            &Recorder {
                result: Some(128),
                ..Default::default()
            },
            tmp.path(),
        );
        ensure_repository(
            &Recorder {
                spawn_error: true,
                ..Default::default()
            },
            tmp.path(),
        );
    }
}
