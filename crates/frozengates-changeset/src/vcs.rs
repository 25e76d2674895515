//! Version-control seam.
//!
//! [`VcsQuery`] is the only way the resolver learns about working-tree state,
//! so the merge logic can be tested without a real repository. [`GitCli`]
//! implements it by shelling out to `git` with a bounded timeout.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::errors::VcsError;

/// Default bound on each git invocation.
pub const GIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Paths (relative to the repository root) reported by the working tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkingTreeChanges {
    /// Modified in the working tree but not staged.
    pub unstaged: Vec<String>,
    /// Staged in the index.
    pub staged: Vec<String>,
    /// Untracked and not ignored.
    pub untracked: Vec<String>,
}

impl WorkingTreeChanges {
    /// All reported entries, in source order, possibly with duplicates.
    pub fn all(&self) -> impl Iterator<Item = &str> {
        self.unstaged
            .iter()
            .chain(&self.staged)
            .chain(&self.untracked)
            .map(String::as_str)
    }

    /// Whether no source reported anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.unstaged.is_empty() && self.staged.is_empty() && self.untracked.is_empty()
    }
}

/// Narrow interface to the version-control system.
///
/// Implementations never fail: a missing repository or a failing command
/// yields `None` or empty lists.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VcsQuery: Send + Sync {
    /// Root of the repository containing `dir`.
    async fn toplevel(&self, dir: &Path) -> Option<PathBuf>;

    /// Changed paths of the repository rooted at `root`.
    async fn changed_paths(&self, root: &Path) -> WorkingTreeChanges;
}

/// [`VcsQuery`] backed by the `git` command line.
#[derive(Debug, Clone)]
pub struct GitCli {
    timeout: Duration,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new(GIT_TIMEOUT)
    }
}

impl GitCli {
    /// Create a runner with a per-command timeout.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Run `git -C <dir> <args>` and return its stdout.
    ///
    /// The child is killed if the timeout elapses.
    pub async fn run(&self, dir: &Path, args: &[&str]) -> Result<String, VcsError> {
        let command = args.first().copied().unwrap_or_default().to_string();

        let mut cmd = tokio::process::Command::new("git");
        let _ = cmd
            .arg("-C")
            .arg(dir)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, cmd.output()).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(VcsError::Timeout {
                    command,
                    timeout: self.timeout,
                });
            }
        };

        if !output.status.success() {
            return Err(VcsError::Failed {
                command,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Run a `-z` listing command, degrading failures to an empty list.
    async fn list(&self, root: &Path, args: &[&str]) -> Vec<String> {
        match self.run(root, args).await {
            Ok(stdout) => split_nul(&stdout),
            Err(e) => {
                debug!(error = %e, "git listing unavailable");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl VcsQuery for GitCli {
    async fn toplevel(&self, dir: &Path) -> Option<PathBuf> {
        match self.run(dir, &["rev-parse", "--show-toplevel"]).await {
            Ok(stdout) => {
                let root = stdout.trim();
                (!root.is_empty()).then(|| PathBuf::from(root))
            }
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "no git repository");
                None
            }
        }
    }

    async fn changed_paths(&self, root: &Path) -> WorkingTreeChanges {
        let (unstaged, staged, untracked) = tokio::join!(
            self.list(root, &["diff", "--name-only", "-z"]),
            self.list(root, &["diff", "--cached", "--name-only", "-z"]),
            self.list(root, &["ls-files", "--others", "--exclude-standard", "-z"]),
        );
        debug!(
            unstaged = unstaged.len(),
            staged = staged.len(),
            untracked = untracked.len(),
            "working tree changes"
        );
        WorkingTreeChanges {
            unstaged,
            staged,
            untracked,
        }
    }
}

/// Split NUL-separated output, dropping empty entries.
fn split_nul(output: &str) -> Vec<String> {
    output
        .split('\0')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn git_available() -> bool {
        std::process::Command::new("git")
            .arg("--version")
            .output()
            .is_ok_and(|o| o.status.success())
    }

    fn git(dir: &Path, args: &[&str]) {
        let status = std::process::Command::new("git")
            .arg("-C")
            .arg(dir)
            .args(args)
            .output()
            .unwrap()
            .status;
        assert!(status.success(), "git {args:?} failed");
    }

    #[test]
    fn split_nul_entries() {
        assert_eq!(split_nul("a.rs\0dir/b.rs\0"), vec!["a.rs", "dir/b.rs"]);
        assert_eq!(split_nul("with space.ts\0"), vec!["with space.ts"]);
        assert!(split_nul("").is_empty());
        assert!(split_nul("\0\0").is_empty());
    }

    #[test]
    fn working_tree_changes_all() {
        let changes = WorkingTreeChanges {
            unstaged: vec!["a".into()],
            staged: vec!["b".into(), "a".into()],
            untracked: vec!["c".into()],
        };
        assert_eq!(changes.all().collect::<Vec<_>>(), vec!["a", "b", "a", "c"]);
        assert!(!changes.is_empty());
        assert!(WorkingTreeChanges::default().is_empty());
    }

    #[tokio::test]
    async fn toplevel_outside_repository_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(GitCli::default().toplevel(dir.path()).await.is_none());
    }

    #[tokio::test]
    async fn changed_paths_outside_repository_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(GitCli::default().changed_paths(dir.path()).await.is_empty());
    }

    #[tokio::test]
    async fn run_reports_non_zero_exit() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let err = GitCli::default()
            .run(dir.path(), &["rev-parse", "--show-toplevel"])
            .await
            .unwrap_err();
        assert_matches!(err, VcsError::Failed { ref command, code: Some(_), .. } if command == "rev-parse");
    }

    #[tokio::test]
    async fn run_times_out() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let err = GitCli::new(Duration::ZERO)
            .run(dir.path(), &["--version"])
            .await
            .unwrap_err();
        assert_matches!(err, VcsError::Timeout { .. });
    }

    #[tokio::test]
    async fn reports_staged_and_untracked_files() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        git(dir.path(), &["init", "-q"]);
        std::fs::write(dir.path().join("staged.rs"), "fn a() {}\n").unwrap();
        std::fs::write(dir.path().join("new file.py"), "x = 1\n").unwrap();
        std::fs::write(dir.path().join(".gitignore"), "ignored.log\n").unwrap();
        std::fs::write(dir.path().join("ignored.log"), "noise\n").unwrap();
        git(dir.path(), &["add", "staged.rs"]);

        let git = GitCli::default();
        let root = git.toplevel(dir.path()).await.unwrap();
        let changes = git.changed_paths(&root).await;

        assert_eq!(changes.staged, vec!["staged.rs"]);
        assert!(changes.untracked.contains(&"new file.py".to_string()));
        assert!(changes.untracked.contains(&".gitignore".to_string()));
        assert!(!changes.untracked.contains(&"ignored.log".to_string()));
        assert!(changes.unstaged.is_empty());
    }
}
