//! Lenient conversion of a parsed policy document into [`GatesConfig`].
//!
//! Conversion rules:
//! - A root that is not a mapping means "no configuration"
//! - Limits must be positive integers; anything else falls back to the default
//! - String lists skip non-string and empty entries
//! - Extensions gain a leading `.` when written without one
//! - Repositories without a non-empty `path` are skipped
//! - `frozen_all: true` wins over a `frozen` list

use frozengates_core::PathContext;
use serde_json::{Map, Value};
use tracing::debug;

use crate::types::{FrozenSpec, GatesConfig, LocDefaults, RepoLoc, RepoRule};

impl GatesConfig {
    /// Convert a parsed document, resolving repository roots with `paths`.
    ///
    /// Returns `None` when the document root is not a mapping.
    #[must_use]
    pub fn from_document(doc: &Value, paths: &PathContext) -> Option<Self> {
        let root = doc.as_object()?;

        let loc = root
            .get("defaults")
            .and_then(|d| d.get("loc"))
            .and_then(Value::as_object);
        let defaults = LocDefaults {
            limit: loc
                .and_then(|l| parse_limit(l.get("limit")))
                .unwrap_or(LocDefaults::default().limit),
            extensions: loc
                .and_then(|l| parse_extensions(l.get("extensions")))
                .unwrap_or_else(|| LocDefaults::default().extensions),
        };

        let repos = root
            .get("repos")
            .and_then(Value::as_object)
            .map(|repos| {
                repos
                    .iter()
                    .filter_map(|(name, repo)| parse_repo(name, repo, paths))
                    .collect()
            })
            .unwrap_or_default();

        Some(Self { defaults, repos })
    }
}

fn parse_repo(name: &str, value: &Value, paths: &PathContext) -> Option<RepoRule> {
    let Some(repo) = value.as_object() else {
        debug!(repo = name, "repository entry is not a mapping, skipping");
        return None;
    };

    let raw_path = repo.get("path").and_then(Value::as_str).unwrap_or("").trim();
    if raw_path.is_empty() {
        debug!(repo = name, "repository has no path, skipping");
        return None;
    }

    let frozen = if repo.get("frozen_all").and_then(Value::as_bool) == Some(true) {
        FrozenSpec::EntireDirectory
    } else {
        match parse_string_list(repo.get("frozen")) {
            Some(patterns) if !patterns.is_empty() => FrozenSpec::Patterns(patterns),
            _ => FrozenSpec::Unfrozen,
        }
    };

    Some(RepoRule {
        name: name.to_string(),
        root: paths.absolutize(raw_path),
        frozen,
        loc: repo
            .get("loc")
            .and_then(Value::as_object)
            .map(parse_repo_loc)
            .unwrap_or_default(),
    })
}

fn parse_repo_loc(loc: &Map<String, Value>) -> RepoLoc {
    RepoLoc {
        limit: parse_limit(loc.get("limit")),
        extensions: parse_extensions(loc.get("extensions")),
        exclude: parse_string_list(loc.get("exclude")).unwrap_or_default(),
    }
}

/// A positive integer limit.
fn parse_limit(value: Option<&Value>) -> Option<usize> {
    value
        .and_then(Value::as_u64)
        .filter(|n| *n > 0)
        .and_then(|n| usize::try_from(n).ok())
}

fn parse_extensions(value: Option<&Value>) -> Option<Vec<String>> {
    parse_string_list(value)
        .map(|list| list.iter().map(String::as_str).map(normalize_extension).collect())
}

/// A list of non-empty strings. Non-list values yield `None`.
fn parse_string_list(value: Option<&Value>) -> Option<Vec<String>> {
    let items = value?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

/// Ensure an extension carries its leading dot.
pub fn normalize_extension(ext: &str) -> String {
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{ext}")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
