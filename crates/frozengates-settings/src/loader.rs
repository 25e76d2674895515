//! Config file resolution and loading.
//!
//! Resolution flow:
//! 1. If `FROZENGATES_CONFIG` is set, that file is the only candidate
//! 2. Otherwise the project-scoped file wins over the user-scoped file
//! 3. Only files that exist are candidates; none found means no enforcement
//!
//! Environment lookups happen once in [`ConfigSources::from_env`]; everything
//! after that works on explicit inputs.

use std::path::{Path, PathBuf};

use frozengates_core::PathContext;
use frozengates_core::paths::{expand_home, home_dir};
use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::GatesConfig;

/// Env var naming an explicit config file.
pub const CONFIG_ENV: &str = "FROZENGATES_CONFIG";

/// Env var holding the session's project root.
pub const PROJECT_DIR_ENV: &str = "CLAUDE_PROJECT_DIR";

/// Env var overriding the default LOC limit.
pub const LOC_LIMIT_ENV: &str = "FROZENGATES_LOC_LIMIT";

/// Directory (under the project root or home) holding the config file.
pub const CONFIG_DIR: &str = ".claude";

/// Config file name.
pub const CONFIG_FILE_NAME: &str = "frozengates.yaml";

/// Upper bound accepted for `FROZENGATES_LOC_LIMIT`.
const MAX_LOC_LIMIT: usize = 1_000_000;

/// Where to look for configuration, captured from the environment once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSources {
    /// Explicit config path; when set no other location is consulted.
    pub override_path: Option<PathBuf>,
    /// Project root for the project-scoped file.
    pub project_dir: Option<PathBuf>,
    /// Home directory for the user-scoped file.
    pub home: PathBuf,
    /// Replacement for the document's default LOC limit.
    pub loc_limit: Option<usize>,
}

impl ConfigSources {
    /// Capture config locations from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        let home = home_dir();
        Self {
            override_path: read_env_string(CONFIG_ENV).map(|p| expand_home(&p, &home)),
            project_dir: read_env_string(PROJECT_DIR_ENV).map(PathBuf::from),
            loc_limit: read_env_usize(LOC_LIMIT_ENV, 1, MAX_LOC_LIMIT),
            home,
        }
    }

    /// `<project>/.claude/frozengates.yaml`, when a project root is known.
    #[must_use]
    pub fn project_file(&self) -> Option<PathBuf> {
        self.project_dir
            .as_ref()
            .map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE_NAME))
    }

    /// `~/.claude/frozengates.yaml`.
    #[must_use]
    pub fn user_file(&self) -> PathBuf {
        self.home.join(CONFIG_DIR).join(CONFIG_FILE_NAME)
    }

    /// The config file to load, if any exists.
    #[must_use]
    pub fn resolve(&self) -> Option<PathBuf> {
        if let Some(path) = &self.override_path {
            return path.is_file().then(|| path.clone());
        }
        select_config_path(
            self.project_file().filter(|p| p.is_file()),
            Some(self.user_file()).filter(|p| p.is_file()),
        )
    }
}

/// Pick between a project-scoped and a user-scoped candidate.
///
/// The project scope always wins when present.
#[must_use]
pub fn select_config_path(project: Option<PathBuf>, user: Option<PathBuf>) -> Option<PathBuf> {
    project.or(user)
}

/// Resolve, read, and convert the config file.
///
/// Returns `Ok(None)` when no file exists or the document declares nothing.
/// Read and YAML errors are returned so the caller can decide how loudly to
/// degrade.
pub fn load_config(sources: &ConfigSources, paths: &PathContext) -> Result<Option<GatesConfig>> {
    let Some(path) = sources.resolve() else {
        debug!("no config file found, enforcement disabled");
        return Ok(None);
    };
    load_config_from_path(&path, sources, paths)
}

/// Load a specific config file with env overrides from `sources`.
pub fn load_config_from_path(
    path: &Path,
    sources: &ConfigSources,
    paths: &PathContext,
) -> Result<Option<GatesConfig>> {
    debug!(?path, "loading config from file");
    let bytes = std::fs::read(path)?;
    let content = String::from_utf8_lossy(&bytes);
    let mut config = parse_config(&content, paths)?;
    if let Some(config) = config.as_mut() {
        apply_env_overrides(config, sources);
    }
    Ok(config)
}

/// Parse YAML text into a config. Empty or non-mapping documents yield `None`.
pub fn parse_config(content: &str, paths: &PathContext) -> Result<Option<GatesConfig>> {
    if content.trim().is_empty() {
        return Ok(None);
    }
    let doc: Value = serde_yaml::from_str(content)?;
    Ok(GatesConfig::from_document(&doc, paths))
}

/// Apply overrides captured from the environment.
pub fn apply_env_overrides(config: &mut GatesConfig, sources: &ConfigSources) {
    if let Some(limit) = sources.loc_limit {
        config.defaults.limit = limit;
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a `usize` within a range.
pub fn parse_usize_range(val: &str, min: usize, max: usize) -> Option<usize> {
    let n: usize = val.trim().parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ── Env var readers (thin wrappers) ─────────────────────────────────────────

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn read_env_usize(name: &str, min: usize, max: usize) -> Option<usize> {
    let val = std::env::var(name).ok()?;
    let result = parse_usize_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid usize env var, ignoring");
    }
    result
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
