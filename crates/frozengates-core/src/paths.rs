//! Path expansion and lexical normalization.
//!
//! `~` is expanded against an explicit home directory, relative paths are
//! joined onto an explicit working directory, and `.`/`..` components are
//! resolved lexically. Only [`resolve_physical`] touches the filesystem.

use std::path::{Component, Path, PathBuf};

/// Home and working directory used to turn user-supplied paths into
/// absolute, normalized ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathContext {
    /// Directory relative paths are resolved against.
    pub cwd: PathBuf,
    /// Directory `~` expands to.
    pub home: PathBuf,
}

impl PathContext {
    /// Create a context from explicit directories.
    pub fn new(cwd: impl Into<PathBuf>, home: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            home: home.into(),
        }
    }

    /// Build a context from the process working directory and `$HOME`.
    ///
    /// Falls back to `/` when the working directory cannot be read.
    #[must_use]
    pub fn from_env() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        Self::new(cwd, home_dir())
    }

    /// Same home directory, different working directory.
    #[must_use]
    pub fn with_cwd(&self, cwd: impl Into<PathBuf>) -> Self {
        Self::new(cwd, self.home.clone())
    }

    /// Expand `~`, anchor relative paths at `cwd`, and normalize.
    #[must_use]
    pub fn absolutize(&self, raw: &str) -> PathBuf {
        let expanded = expand_home(raw, &self.home);
        if expanded.is_absolute() {
            normalize_path(&expanded)
        } else {
            normalize_path(&self.cwd.join(expanded))
        }
    }
}

/// Expand a leading `~` or `~/` to `home`. Other paths are returned as-is.
#[must_use]
pub fn expand_home(path: &str, home: &Path) -> PathBuf {
    if path == "~" {
        return home.to_path_buf();
    }
    match path.strip_prefix("~/") {
        Some(rest) => home.join(rest),
        None => PathBuf::from(path),
    }
}

/// Normalize a path by resolving `.` and `..` components.
///
/// `..` never climbs above the root. Trailing separators are dropped.
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    let _ = parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            Component::CurDir => {}
            Component::RootDir | Component::Prefix(_) | Component::Normal(_) => {
                parts.push(component);
            }
        }
    }
    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.into_iter().collect()
}

/// Whether `path` equals `root` or lies beneath it.
///
/// Comparison is per component, so `/repo-legacy` is not within `/repo`.
#[must_use]
pub fn is_within(path: &Path, root: &Path) -> bool {
    path.starts_with(root)
}

/// `path` relative to `root` when it lies beneath it, otherwise `path` itself.
#[must_use]
pub fn relative_to<'a>(path: &'a Path, root: Option<&Path>) -> &'a Path {
    root.and_then(|r| path.strip_prefix(r).ok())
        .filter(|rel| !rel.as_os_str().is_empty())
        .unwrap_or(path)
}

/// Resolve symlinks in the longest existing prefix of `path`.
///
/// The remaining components are appended unchanged, so a deleted file still
/// lands under its resolved parent. Falls back to the lexical form when no
/// prefix can be resolved.
#[must_use]
pub fn resolve_physical(path: &Path) -> PathBuf {
    let lexical = normalize_path(path);
    for ancestor in lexical.ancestors() {
        let Ok(resolved) = std::fs::canonicalize(ancestor) else {
            continue;
        };
        return match lexical.strip_prefix(ancestor) {
            Ok(rest) if !rest.as_os_str().is_empty() => resolved.join(rest),
            _ => resolved,
        };
    }
    lexical
}

/// The home directory from `$HOME`.
#[must_use]
pub fn home_dir() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| "/root".to_string()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
