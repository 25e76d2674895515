//! Hook input event read from standard input.
//!
//! The tool runtime writes one JSON object per invocation. Only the fields
//! used by the two gates are modelled; anything else is ignored. Parsing is
//! lenient: an unparseable or mistyped event becomes [`HookInput::default`],
//! which every gate treats as "nothing to do".

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::tools::MutationTool;

/// A hook event as delivered by the tool runtime.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HookInput {
    /// Session the event belongs to.
    pub session_id: Option<String>,
    /// Path of the session's newline-delimited event log.
    pub transcript_path: Option<String>,
    /// Working directory of the session.
    pub cwd: Option<String>,
    /// Tool about to run (pre-tool-use events only).
    pub tool_name: Option<String>,
    /// Arguments of the tool about to run.
    pub tool_input: Option<Value>,
}

impl HookInput {
    /// Parse an event, falling back to an empty event on any error.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::default();
        }
        match serde_json::from_str(raw) {
            Ok(input) => input,
            Err(e) => {
                debug!(error = %e, "unparseable hook input, treating as empty");
                Self::default()
            }
        }
    }

    /// The mutation this event proposes, if it is a write/edit with a target path.
    #[must_use]
    pub fn mutation_target(&self) -> Option<(MutationTool, &str)> {
        let tool = MutationTool::from_name(self.tool_name.as_deref()?)?;
        let path = tool.target_path(self.tool_input.as_ref()?)?;
        Some((tool, path))
    }

    /// Session id with empty strings treated as absent.
    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref().filter(|s| !s.is_empty())
    }

    /// Transcript path with empty strings treated as absent.
    #[must_use]
    pub fn transcript_path(&self) -> Option<&str> {
        self.transcript_path.as_deref().filter(|s| !s.is_empty())
    }

    /// Working directory with empty strings treated as absent.
    #[must_use]
    pub fn cwd(&self) -> Option<&str> {
        self.cwd.as_deref().filter(|s| !s.is_empty())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
