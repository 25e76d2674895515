//! Typed policy configuration.

use std::path::{Path, PathBuf};

use frozengates_core::paths::is_within;

/// LOC limit applied when neither the repository nor the defaults set one.
pub const DEFAULT_LOC_LIMIT: usize = 500;

/// File extensions checked against the LOC limit by default.
pub const DEFAULT_LOC_EXTENSIONS: &[&str] =
    &[".ts", ".tsx", ".js", ".jsx", ".py", ".rs", ".go", ".vue"];

/// Parsed policy document. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GatesConfig {
    /// Global LOC defaults.
    pub defaults: LocDefaults,
    /// Repository rules in document order.
    pub repos: Vec<RepoRule>,
}

impl GatesConfig {
    /// First repository (in document order) whose root contains `path`.
    #[must_use]
    pub fn repo_containing(&self, path: &Path) -> Option<&RepoRule> {
        self.repos.iter().find(|repo| repo.contains(path))
    }
}

/// Global LOC defaults inherited by every repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocDefaults {
    /// Maximum non-blank lines per file.
    pub limit: usize,
    /// Extensions (with leading dot) subject to the limit.
    pub extensions: Vec<String>,
}

impl Default for LocDefaults {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LOC_LIMIT,
            extensions: DEFAULT_LOC_EXTENSIONS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

/// Which paths of a repository are protected from mutation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FrozenSpec {
    /// Nothing is frozen.
    #[default]
    Unfrozen,
    /// The root and every descendant are frozen.
    EntireDirectory,
    /// Glob patterns relative to the root, in document order.
    Patterns(Vec<String>),
}

/// Per-repository LOC settings. Absent values inherit [`LocDefaults`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RepoLoc {
    /// Repository-specific limit.
    pub limit: Option<usize>,
    /// Repository-specific extensions.
    pub extensions: Option<Vec<String>>,
    /// Glob patterns (relative to the version-control root) never checked.
    pub exclude: Vec<String>,
}

/// A named policy bundle scoped to a root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRule {
    /// Unique key from the document.
    pub name: String,
    /// Absolute, normalized root. Never empty.
    pub root: PathBuf,
    /// Frozen paths.
    pub frozen: FrozenSpec,
    /// LOC overrides.
    pub loc: RepoLoc,
}

impl RepoRule {
    /// Whether `path` equals the root or lies beneath it.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        is_within(path, &self.root)
    }

    /// LOC limit after inheriting from `defaults`.
    #[must_use]
    pub fn loc_limit(&self, defaults: &LocDefaults) -> usize {
        self.loc.limit.unwrap_or(defaults.limit)
    }

    /// LOC-eligible extensions after inheriting from `defaults`.
    #[must_use]
    pub fn loc_extensions<'a>(&'a self, defaults: &'a LocDefaults) -> &'a [String] {
        self.loc.extensions.as_deref().unwrap_or(defaults.extensions.as_slice())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str, root: &str) -> RepoRule {
        RepoRule {
            name: name.to_string(),
            root: PathBuf::from(root),
            frozen: FrozenSpec::Unfrozen,
            loc: RepoLoc::default(),
        }
    }

    #[test]
    fn default_loc_settings() {
        let defaults = LocDefaults::default();
        assert_eq!(defaults.limit, 500);
        assert_eq!(defaults.extensions.len(), 8);
        assert!(defaults.extensions.iter().any(|e| e == ".vue"));
    }

    #[test]
    fn repo_inherits_defaults() {
        let defaults = LocDefaults::default();
        let repo = rule("api", "/r");
        assert_eq!(repo.loc_limit(&defaults), 500);
        assert_eq!(repo.loc_extensions(&defaults), defaults.extensions.as_slice());
    }

    #[test]
    fn repo_overrides_defaults() {
        let defaults = LocDefaults::default();
        let mut repo = rule("api", "/r");
        repo.loc.limit = Some(120);
        repo.loc.extensions = Some(vec![".go".to_string()]);
        assert_eq!(repo.loc_limit(&defaults), 120);
        assert_eq!(repo.loc_extensions(&defaults), [".go".to_string()].as_slice());
    }

    #[test]
    fn repo_containing_is_first_match() {
        let config = GatesConfig {
            defaults: LocDefaults::default(),
            repos: vec![rule("outer", "/code"), rule("inner", "/code/api")],
        };
        let hit = config.repo_containing(Path::new("/code/api/main.go")).unwrap();
        assert_eq!(hit.name, "outer");
    }

    #[test]
    fn repo_containing_respects_segments() {
        let config = GatesConfig {
            defaults: LocDefaults::default(),
            repos: vec![rule("a", "/repoA")],
        };
        assert!(config.repo_containing(Path::new("/repoA-legacy/x.ts")).is_none());
        assert!(config.repo_containing(Path::new("/repoA")).is_some());
    }
}
