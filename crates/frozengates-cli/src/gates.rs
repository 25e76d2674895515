//! The two gates.
//!
//! Each gate parses the event leniently, loads configuration once, and maps
//! the engine result to a [`GateOutcome`]. Configuration problems disable
//! enforcement instead of failing the runtime's action.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use frozengates_changeset::{ChangeSetResolver, ResolverOptions, SessionSources, VcsQuery};
use frozengates_core::paths::{expand_home, home_dir, normalize_path};
use frozengates_core::{HookInput, PathContext};
use frozengates_guardrails::{FrozenPathMatcher, LocPolicyEvaluator};
use frozengates_settings::{ConfigSources, GatesConfig, load_config};
use tracing::{debug, warn};

use crate::decision::GateOutcome;

/// Everything the gates read from the process environment, captured once.
#[derive(Debug, Clone)]
pub struct GateEnv {
    /// Where configuration lives.
    pub sources: ConfigSources,
    /// Process working directory, if it could be read.
    pub cwd: Option<PathBuf>,
    /// Home directory for `~` expansion.
    pub home: PathBuf,
}

impl GateEnv {
    /// Capture the current process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            sources: ConfigSources::from_env(),
            cwd: std::env::current_dir().ok(),
            home: home_dir(),
        }
    }

    /// Path context anchored at the event's `cwd`, else the process cwd.
    ///
    /// `None` when neither yields an absolute directory.
    #[must_use]
    pub fn path_context(&self, input: &HookInput) -> Option<PathContext> {
        let process = self
            .cwd
            .as_ref()
            .map(|cwd| PathContext::new(cwd.clone(), self.home.clone()));

        let Some(raw) = input.cwd() else {
            return process;
        };
        let expanded = expand_home(raw, &self.home);
        if expanded.is_absolute() {
            return Some(PathContext::new(normalize_path(&expanded), self.home.clone()));
        }
        process.map(|base| {
            let anchored = base.absolutize(raw);
            base.with_cwd(anchored)
        })
    }

    /// Load configuration, treating read and parse errors as "no configuration".
    fn config(&self, paths: &PathContext) -> Option<GatesConfig> {
        match load_config(&self.sources, paths) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "config unreadable, enforcement disabled");
                None
            }
        }
    }
}

/// Gate 1: block write/edit calls that target a frozen path.
#[must_use]
pub fn run_pre_tool_use(raw: &str, env: &GateEnv) -> GateOutcome {
    let input = HookInput::parse(raw);
    let Some((tool, target)) = input.mutation_target() else {
        debug!(tool = ?input.tool_name, "not a file mutation");
        return GateOutcome::allow();
    };

    let paths = env
        .path_context(&input)
        .unwrap_or_else(|| PathContext::new("/", env.home.clone()));
    let Some(config) = env.config(&paths) else {
        return GateOutcome::allow();
    };

    let matcher = FrozenPathMatcher::new(&config, paths);
    if matcher.is_empty() {
        debug!("no frozen repositories configured");
        return GateOutcome::allow();
    }

    match matcher.check(target) {
        Some(hit) => {
            debug!(%tool, path = target, repo = %hit.repo, "blocking frozen path");
            GateOutcome::frozen(target, &hit)
        }
        None => GateOutcome::allow(),
    }
}

/// Gate 2: block session end while a changed file is over its LOC budget.
///
/// Fails only when no working directory can be determined.
pub async fn run_stop(
    raw: &str,
    env: &GateEnv,
    vcs: Arc<dyn VcsQuery>,
    options: ResolverOptions,
) -> Result<GateOutcome> {
    let input = HookInput::parse(raw);
    let paths = env
        .path_context(&input)
        .context("cannot determine the working directory")?;

    let Some(config) = env.config(&paths) else {
        return Ok(GateOutcome::allow());
    };

    let sources = SessionSources::from_hook(&input, &paths);
    let changes = ChangeSetResolver::with_options(vcs, paths, options)
        .resolve(&sources)
        .await;
    let violations = LocPolicyEvaluator::new(&config).evaluate(&changes);

    Ok(GateOutcome::loc_report(&violations))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
