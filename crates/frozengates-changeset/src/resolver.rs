//! Change-set resolution.
//!
//! [`ChangeSetResolver`] unions the working-tree listing of the repository
//! containing the session's working directory with the paths replayed from
//! the session transcripts. Each source is optional and fails open.
//!
//! Every path is symlink-resolved before insertion, so a file reached through
//! a linked working directory and the same file reported by git collapse to
//! one entry.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use frozengates_core::paths::resolve_physical;
use frozengates_core::{ChangeSet, HookInput, PathContext};
use tracing::debug;

use crate::transcript::TranscriptReplay;
use crate::vcs::VcsQuery;

/// Which sources contribute to the change set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Ask the version-control system for changed files.
    pub inspect_working_tree: bool,
    /// Replay write/edit calls from the session transcripts.
    pub replay_transcripts: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            inspect_working_tree: true,
            replay_transcripts: true,
        }
    }
}

/// Where a session's changes can be found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSources {
    /// Primary transcript of the session.
    pub transcript_path: Option<PathBuf>,
    /// Current session id, used to attribute sub-agent transcripts.
    pub session_id: Option<String>,
    /// Working directory of the session.
    pub working_dir: PathBuf,
}

impl SessionSources {
    /// Derive sources from a stop event, falling back to `paths.cwd` for
    /// the working directory.
    #[must_use]
    pub fn from_hook(input: &HookInput, paths: &PathContext) -> Self {
        let working_dir = input
            .cwd()
            .map_or_else(|| paths.cwd.clone(), |cwd| paths.absolutize(cwd));
        Self {
            transcript_path: input
                .transcript_path()
                .map(|raw| paths.with_cwd(&working_dir).absolutize(raw)),
            session_id: input.session_id().map(str::to_string),
            working_dir,
        }
    }
}

/// Builds the [`ChangeSet`] for a session.
pub struct ChangeSetResolver {
    vcs: Arc<dyn VcsQuery>,
    paths: PathContext,
    options: ResolverOptions,
}

impl ChangeSetResolver {
    /// Resolver using both sources.
    pub fn new(vcs: Arc<dyn VcsQuery>, paths: PathContext) -> Self {
        Self::with_options(vcs, paths, ResolverOptions::default())
    }

    /// Resolver with explicit source toggles.
    pub fn with_options(vcs: Arc<dyn VcsQuery>, paths: PathContext, options: ResolverOptions) -> Self {
        Self { vcs, paths, options }
    }

    /// Union of every enabled source. Never fails.
    pub async fn resolve(&self, sources: &SessionSources) -> ChangeSet {
        let mut changes = ChangeSet::new();

        if self.options.inspect_working_tree {
            changes.merge(self.working_tree_changes(&sources.working_dir).await);
        }
        if self.options.replay_transcripts {
            changes.merge(self.replayed_changes(sources));
        }

        debug!(
            count = changes.len(),
            vcs_root = ?changes.vcs_root(),
            "resolved change set"
        );
        changes
    }

    /// Changed files of the repository containing `dir`, made absolute.
    async fn working_tree_changes(&self, dir: &Path) -> ChangeSet {
        let Some(root) = self.vcs.toplevel(dir).await else {
            return ChangeSet::new();
        };
        let root = resolve_physical(&root);

        let listing = self.vcs.changed_paths(&root).await;
        if listing.is_empty() {
            debug!(root = %root.display(), "working tree clean");
        }
        let mut changes: ChangeSet = listing
            .all()
            .map(|entry| resolve_physical(&root.join(entry)))
            .collect();
        changes.set_vcs_root(root);
        changes
    }

    /// Paths written or edited according to the session transcripts.
    fn replayed_changes(&self, sources: &SessionSources) -> ChangeSet {
        let Some(transcript) = &sources.transcript_path else {
            debug!("no transcript to replay");
            return ChangeSet::new();
        };

        let anchor = self.paths.with_cwd(&sources.working_dir);
        TranscriptReplay::new(transcript, sources.session_id.clone())
            .mutated_paths()
            .iter()
            .map(|raw| resolve_physical(&anchor.absolutize(raw)))
            .collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vcs::{MockVcsQuery, WorkingTreeChanges};
    use serde_json::json;

    fn paths() -> PathContext {
        PathContext::new("/proj", "/home/user")
    }

    fn vcs_with(root: Option<&str>, changes: WorkingTreeChanges) -> Arc<dyn VcsQuery> {
        let root = root.map(PathBuf::from);
        let mut mock = MockVcsQuery::new();
        let _ = mock.expect_toplevel().returning(move |_| root.clone());
        let _ = mock
            .expect_changed_paths()
            .returning(move |_| changes.clone());
        Arc::new(mock)
    }

    fn untracked(entries: &[&str]) -> WorkingTreeChanges {
        WorkingTreeChanges {
            untracked: entries.iter().map(|s| (*s).to_string()).collect(),
            ..WorkingTreeChanges::default()
        }
    }

    fn tool_line(session: &str, name: &str, path: &str) -> String {
        json!({
            "sessionId": session,
            "message": {"content": [
                {"type": "tool_use", "name": name, "input": {"file_path": path}}
            ]}
        })
        .to_string()
    }

    fn write_lines(path: &Path, lines: &[String]) {
        std::fs::write(path, lines.join("\n")).unwrap();
    }

    fn as_set(changes: &ChangeSet) -> Vec<PathBuf> {
        changes.iter().map(Path::to_path_buf).collect()
    }

    #[tokio::test]
    async fn unions_transcripts_subagents_and_working_tree() {
        let dir = tempfile::tempdir().unwrap();
        let primary = dir.path().join("s1.jsonl");
        write_lines(&primary, &[tool_line("s1", "Write", "/proj/x.py")]);
        write_lines(
            &dir.path().join("agent-a.jsonl"),
            &[tool_line("s1", "Edit", "/proj/y.py")],
        );

        let resolver = ChangeSetResolver::new(vcs_with(Some("/proj"), untracked(&["z.py"])), paths());
        let sources = SessionSources {
            transcript_path: Some(primary),
            session_id: Some("s1".into()),
            working_dir: PathBuf::from("/proj"),
        };

        let changes = resolver.resolve(&sources).await;
        assert_eq!(
            as_set(&changes),
            vec![
                PathBuf::from("/proj/x.py"),
                PathBuf::from("/proj/y.py"),
                PathBuf::from("/proj/z.py"),
            ]
        );
        assert_eq!(changes.vcs_root(), Some(Path::new("/proj")));
    }

    #[tokio::test]
    async fn resolving_twice_is_identical() {
        let dir = tempfile::tempdir().unwrap();
        let primary = dir.path().join("s1.jsonl");
        write_lines(
            &primary,
            &[
                tool_line("s1", "Write", "/proj/a.rs"),
                tool_line("s1", "Edit", "/proj/a.rs"),
            ],
        );
        let listing = WorkingTreeChanges {
            unstaged: vec!["a.rs".into()],
            staged: vec!["a.rs".into(), "b.rs".into()],
            untracked: vec![],
        };
        let resolver = ChangeSetResolver::new(vcs_with(Some("/proj"), listing), paths());
        let sources = SessionSources {
            transcript_path: Some(primary),
            session_id: None,
            working_dir: PathBuf::from("/proj"),
        };

        let first = resolver.resolve(&sources).await;
        let second = resolver.resolve(&sources).await;
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[tokio::test]
    async fn no_repository_contributes_nothing() {
        let mut mock = MockVcsQuery::new();
        let _ = mock.expect_toplevel().returning(|_| None);
        let _ = mock.expect_changed_paths().never();
        let resolver = ChangeSetResolver::new(Arc::new(mock), paths());

        let changes = resolver
            .resolve(&SessionSources {
                transcript_path: None,
                session_id: None,
                working_dir: PathBuf::from("/proj"),
            })
            .await;
        assert!(changes.is_empty());
        assert!(changes.vcs_root().is_none());
    }

    #[tokio::test]
    async fn missing_transcript_contributes_nothing() {
        let resolver = ChangeSetResolver::new(vcs_with(Some("/proj"), untracked(&["z.py"])), paths());
        let sources = SessionSources {
            transcript_path: Some(PathBuf::from("/nonexistent/s.jsonl")),
            session_id: Some("s".into()),
            working_dir: PathBuf::from("/proj"),
        };
        let changes = resolver.resolve(&sources).await;
        assert_eq!(as_set(&changes), vec![PathBuf::from("/proj/z.py")]);
    }

    #[tokio::test]
    async fn relative_replayed_paths_anchor_at_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let primary = dir.path().join("s1.jsonl");
        write_lines(
            &primary,
            &[
                tool_line("s1", "Write", "src/lib.rs"),
                tool_line("s1", "Write", "~/notes.md"),
            ],
        );
        let options = ResolverOptions {
            inspect_working_tree: false,
            replay_transcripts: true,
        };
        let resolver = ChangeSetResolver::with_options(
            vcs_with(None, WorkingTreeChanges::default()),
            paths(),
            options,
        );
        let sources = SessionSources {
            transcript_path: Some(primary),
            session_id: None,
            working_dir: PathBuf::from("/work/app"),
        };
        let changes = resolver.resolve(&sources).await;
        assert_eq!(
            as_set(&changes),
            vec![
                PathBuf::from("/home/user/notes.md"),
                PathBuf::from("/work/app/src/lib.rs"),
            ]
        );
    }

    #[tokio::test]
    async fn toggles_disable_sources() {
        let dir = tempfile::tempdir().unwrap();
        let primary = dir.path().join("s1.jsonl");
        write_lines(&primary, &[tool_line("s1", "Write", "/proj/x.py")]);
        let sources = SessionSources {
            transcript_path: Some(primary),
            session_id: None,
            working_dir: PathBuf::from("/proj"),
        };

        let git_only = ChangeSetResolver::with_options(
            vcs_with(Some("/proj"), untracked(&["z.py"])),
            paths(),
            ResolverOptions {
                inspect_working_tree: true,
                replay_transcripts: false,
            },
        );
        assert_eq!(
            as_set(&git_only.resolve(&sources).await),
            vec![PathBuf::from("/proj/z.py")]
        );

        let mut mock = MockVcsQuery::new();
        let _ = mock.expect_toplevel().never();
        let replay_only = ChangeSetResolver::with_options(
            Arc::new(mock),
            paths(),
            ResolverOptions {
                inspect_working_tree: false,
                replay_transcripts: true,
            },
        );
        assert_eq!(
            as_set(&replay_only.resolve(&sources).await),
            vec![PathBuf::from("/proj/x.py")]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn linked_working_dir_collapses_to_one_entry() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("real");
        std::fs::create_dir_all(&real).unwrap();
        std::fs::write(real.join("big.py"), "a\nb\nc\nd\n").unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&real, &link).unwrap();
        let real = real.canonicalize().unwrap();

        let primary = dir.path().join("s1.jsonl");
        write_lines(
            &primary,
            &[
                tool_line("s1", "Write", &link.join("big.py").to_string_lossy()),
                tool_line("s1", "Edit", "big.py"),
            ],
        );

        let resolver = ChangeSetResolver::new(
            vcs_with(Some(real.to_str().unwrap()), untracked(&["big.py"])),
            paths(),
        );
        let sources = SessionSources {
            transcript_path: Some(primary),
            session_id: Some("s1".into()),
            working_dir: link,
        };

        let changes = resolver.resolve(&sources).await;
        assert_eq!(as_set(&changes), vec![real.join("big.py")]);
        assert_eq!(changes.vcs_root(), Some(real.as_path()));
    }

    #[test]
    fn sources_from_hook_input() {
        let input = HookInput::parse(
            r#"{"session_id":"s1","transcript_path":"logs/s1.jsonl","cwd":"/proj/sub"}"#,
        );
        let sources = SessionSources::from_hook(&input, &paths());
        assert_eq!(sources.working_dir, PathBuf::from("/proj/sub"));
        assert_eq!(
            sources.transcript_path,
            Some(PathBuf::from("/proj/sub/logs/s1.jsonl"))
        );
        assert_eq!(sources.session_id.as_deref(), Some("s1"));

        let bare = SessionSources::from_hook(&HookInput::default(), &paths());
        assert_eq!(bare.working_dir, PathBuf::from("/proj"));
        assert!(bare.transcript_path.is_none());
        assert!(bare.session_id.is_none());
    }
}
