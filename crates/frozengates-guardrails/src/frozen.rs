//! Frozen-path matcher.
//!
//! A repository is either frozen as a whole (the root and every descendant)
//! or through glob patterns joined onto its root. Within a pattern `*`
//! matches inside a single path segment and `**` spans segments.
//!
//! Repositories are checked in document order and the first one that fires
//! wins. There is no most-specific tie-break between overlapping roots.

use std::path::{Path, PathBuf};

use frozengates_core::PathContext;
use frozengates_core::paths::{is_within, normalize_path};
use frozengates_settings::{FrozenSpec, GatesConfig};
use globset::{GlobBuilder, GlobMatcher};
use tracing::{debug, warn};

use crate::errors::GuardrailError;

/// The rule inside a repository that matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrozenRule {
    /// The repository is frozen as a whole.
    EntireDirectory,
    /// A configured glob pattern, as written.
    Pattern(String),
}

impl std::fmt::Display for FrozenRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EntireDirectory => write!(f, "entire directory"),
            Self::Pattern(pattern) => write!(f, "{pattern}"),
        }
    }
}

/// A positive match: which repository protects the path, and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrozenHit {
    /// Repository name.
    pub repo: String,
    /// Matching rule.
    pub rule: FrozenRule,
}

/// One frozen pattern with its precomputed absolute target.
#[derive(Debug)]
struct CompiledPattern {
    pattern: String,
    target: PathBuf,
    matcher: Option<GlobMatcher>,
}

impl CompiledPattern {
    fn compile(root: &Path, pattern: &str) -> Self {
        let target = normalize_path(&root.join(pattern));
        let matcher = match compile_target(root, pattern) {
            Ok(m) => Some(m),
            Err(e) => {
                warn!(error = %e, "frozen pattern falls back to exact match");
                None
            }
        };
        Self {
            pattern: pattern.to_string(),
            target,
            matcher,
        }
    }

    fn matches(&self, candidate: &Path) -> bool {
        candidate == self.target || self.matcher.as_ref().is_some_and(|m| m.is_match(candidate))
    }
}

/// Build a glob for `root/pattern`, escaping the root so only the pattern
/// contributes metacharacters.
fn compile_target(root: &Path, pattern: &str) -> Result<GlobMatcher, GuardrailError> {
    let text = if Path::new(pattern).is_absolute() {
        pattern.to_string()
    } else {
        let root = globset::escape(&root.to_string_lossy());
        format!("{}/{pattern}", root.trim_end_matches('/'))
    };
    GlobBuilder::new(&text)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|source| GuardrailError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

#[derive(Debug)]
enum CompiledSpec {
    Entire,
    Patterns(Vec<CompiledPattern>),
}

#[derive(Debug)]
struct CompiledRepo {
    name: String,
    root: PathBuf,
    spec: CompiledSpec,
}

/// Decides whether a candidate path is frozen.
///
/// Built once per config; globs are compiled up front. Matching is pure
/// string/path manipulation and never touches the filesystem.
#[derive(Debug)]
pub struct FrozenPathMatcher {
    repos: Vec<CompiledRepo>,
    paths: PathContext,
}

impl FrozenPathMatcher {
    /// Compile the frozen rules of `config`.
    ///
    /// Roots are re-normalized with `paths` in case the config was not
    /// produced by the loader.
    #[must_use]
    pub fn new(config: &GatesConfig, paths: PathContext) -> Self {
        let repos = config
            .repos
            .iter()
            .filter(|repo| !repo.root.as_os_str().is_empty())
            .filter_map(|repo| {
                let root = paths.absolutize(&repo.root.to_string_lossy());
                let spec = match &repo.frozen {
                    FrozenSpec::Unfrozen => return None,
                    FrozenSpec::EntireDirectory => CompiledSpec::Entire,
                    FrozenSpec::Patterns(patterns) => CompiledSpec::Patterns(
                        patterns
                            .iter()
                            .map(|p| CompiledPattern::compile(&root, p))
                            .collect(),
                    ),
                };
                Some(CompiledRepo {
                    name: repo.name.clone(),
                    root,
                    spec,
                })
            })
            .collect::<Vec<_>>();

        debug!(repo_count = repos.len(), "FrozenPathMatcher initialized");

        Self { repos, paths }
    }

    /// Check a raw candidate path as supplied by the tool call.
    ///
    /// `~` is expanded and relative paths are anchored at the working
    /// directory before matching.
    #[must_use]
    pub fn check(&self, candidate: &str) -> Option<FrozenHit> {
        if candidate.is_empty() {
            return None;
        }
        self.check_path(&self.paths.absolutize(candidate))
    }

    /// Check an absolute, normalized candidate path.
    #[must_use]
    pub fn check_path(&self, candidate: &Path) -> Option<FrozenHit> {
        for repo in &self.repos {
            let rule = match &repo.spec {
                CompiledSpec::Entire => {
                    is_within(candidate, &repo.root).then_some(FrozenRule::EntireDirectory)
                }
                CompiledSpec::Patterns(patterns) => patterns
                    .iter()
                    .find(|p| p.matches(candidate))
                    .map(|p| FrozenRule::Pattern(p.pattern.clone())),
            };
            if let Some(rule) = rule {
                debug!(path = %candidate.display(), repo = %repo.name, %rule, "frozen path matched");
                return Some(FrozenHit {
                    repo: repo.name.clone(),
                    rule,
                });
            }
        }
        None
    }

    /// Whether any repository freezes anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
