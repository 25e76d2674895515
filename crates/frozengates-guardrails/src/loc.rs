//! LOC budget evaluation.
//!
//! For every changed file:
//! 1. Resolve the policy of the first repository whose root contains it
//!    (falling back to the global defaults)
//! 2. Skip files whose extension is not LOC-eligible
//! 3. Skip files matching an exclusion glob, tested against the path
//!    relative to the version-control root
//! 4. Count non-blank lines and report the file if the count exceeds the limit
//!
//! Extension filtering always happens before exclusion filtering.

use std::collections::HashMap;
use std::path::Path;

use frozengates_core::ChangeSet;
use frozengates_core::paths::{relative_to, resolve_physical};
use frozengates_settings::{GatesConfig, RepoRule};
use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, warn};

use crate::errors::GuardrailError;

/// A file over its LOC budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Path relative to the version-control root (absolute when outside it).
    pub path: String,
    /// Observed non-blank lines.
    pub lines: usize,
    /// Limit that was exceeded.
    pub limit: usize,
    /// Repository whose policy applied, if any.
    pub repo: Option<String>,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} lines (limit: {})", self.path, self.lines, self.limit)?;
        if let Some(repo) = &self.repo {
            write!(f, " [{repo}]")?;
        }
        Ok(())
    }
}

/// The LOC policy that applies to one path.
#[derive(Debug, Clone, Copy)]
pub struct LocPolicy<'a> {
    /// Maximum non-blank lines.
    pub limit: usize,
    /// Extensions (with leading dot) subject to the limit.
    pub extensions: &'a [String],
    /// Repository the policy came from.
    pub repo: Option<&'a RepoRule>,
    exclusions: Option<&'a GlobSet>,
}

impl LocPolicy<'_> {
    /// Whether the file's extension is LOC-eligible.
    #[must_use]
    pub fn is_eligible(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.extensions
            .iter()
            .any(|allowed| allowed.strip_prefix('.') == Some(ext))
    }

    /// Whether a version-control-relative path matches an exclusion glob.
    #[must_use]
    pub fn is_excluded(&self, relative: &Path) -> bool {
        self.exclusions.is_some_and(|set| set.is_match(relative))
    }
}

/// Evaluates a [`ChangeSet`] against per-repository LOC budgets.
///
/// Repository roots, changed paths, and the version-control root are all
/// compared in symlink-resolved form.
#[derive(Debug)]
pub struct LocPolicyEvaluator {
    config: GatesConfig,
    /// Exclusion globs keyed by repository name.
    exclusions: HashMap<String, GlobSet>,
}

impl LocPolicyEvaluator {
    /// Resolve repository roots and compile their exclusion globs.
    ///
    /// Invalid patterns are dropped with a warning; the rest of the set
    /// still applies.
    #[must_use]
    pub fn new(config: &GatesConfig) -> Self {
        let mut config = config.clone();
        for repo in &mut config.repos {
            repo.root = resolve_physical(&repo.root);
        }
        let exclusions = config
            .repos
            .iter()
            .map(|repo| (repo.name.clone(), build_exclusions(&repo.name, &repo.loc.exclude)))
            .collect();
        Self { config, exclusions }
    }

    /// Resolve the policy for an absolute, symlink-resolved path.
    #[must_use]
    pub fn policy_for(&self, path: &Path) -> LocPolicy<'_> {
        let defaults = &self.config.defaults;
        match self.config.repo_containing(path) {
            Some(repo) => LocPolicy {
                limit: repo.loc_limit(defaults),
                extensions: repo.loc_extensions(defaults),
                repo: Some(repo),
                exclusions: self.exclusions.get(&repo.name),
            },
            None => LocPolicy {
                limit: defaults.limit,
                extensions: &defaults.extensions,
                repo: None,
                exclusions: None,
            },
        }
    }

    /// Check every file of the change set, in iteration order.
    #[must_use]
    pub fn evaluate(&self, changes: &ChangeSet) -> Vec<Violation> {
        let violations: Vec<Violation> = changes
            .iter()
            .filter_map(|path| self.check_file(path, changes.vcs_root()))
            .collect();
        debug!(
            files = changes.len(),
            violations = violations.len(),
            "LOC evaluation complete"
        );
        violations
    }

    /// Check a single file. Missing files and non-regular files are skipped.
    #[must_use]
    pub fn check_file(&self, path: &Path, vcs_root: Option<&Path>) -> Option<Violation> {
        if !path.is_file() {
            return None;
        }
        let path = resolve_physical(path);
        let vcs_root = vcs_root.map(resolve_physical);

        let policy = self.policy_for(&path);
        if !policy.is_eligible(&path) {
            return None;
        }

        let relative = relative_to(&path, vcs_root.as_deref());
        if policy.is_excluded(relative) {
            debug!(path = %relative.display(), "excluded from LOC check");
            return None;
        }

        let lines = count_loc(&path);
        (lines > policy.limit).then(|| Violation {
            path: relative.to_string_lossy().into_owned(),
            lines,
            limit: policy.limit,
            repo: policy.repo.map(|r| r.name.clone()),
        })
    }
}

fn build_exclusions(repo: &str, patterns: &[String]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        match compile_exclusion(pattern) {
            Ok(glob) => {
                let _ = builder.add(glob);
            }
            Err(e) => warn!(repo, error = %e, "skipping exclusion pattern"),
        }
    }
    builder.build().unwrap_or_else(|e| {
        warn!(repo, error = %e, "exclusion set failed to build, ignoring exclusions");
        GlobSet::empty()
    })
}

/// `*` may cross `/` in exclusions, so `*.gen.ts` excludes at any depth.
fn compile_exclusion(pattern: &str) -> Result<Glob, GuardrailError> {
    Glob::new(pattern).map_err(|source| GuardrailError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// Count the non-blank lines of a file.
///
/// Undecodable bytes are replaced rather than rejected. Unreadable files
/// count as zero lines.
#[must_use]
pub fn count_loc(path: &Path) -> usize {
    match std::fs::read(path) {
        Ok(bytes) => count_non_blank(&String::from_utf8_lossy(&bytes)),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "unreadable file counts as zero lines");
            0
        }
    }
}

/// Count lines containing at least one non-whitespace character.
///
/// `\n`, `\r\n` and a lone `\r` all end a line.
#[must_use]
pub fn count_non_blank(text: &str) -> usize {
    text.split(['\n', '\r'])
        .filter(|line| !line.trim().is_empty())
        .count()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
