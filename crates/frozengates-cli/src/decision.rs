//! Decision emitters: exit codes and payloads understood by the tool runtime.

use frozengates_guardrails::{FrozenHit, Violation};
use serde_json::json;

/// Nothing to report.
pub const EXIT_ALLOW: i32 = 0;

/// Policy violation; the payload explains why.
pub const EXIT_BLOCK: i32 = 2;

/// The gate could not start.
pub const EXIT_FATAL: i32 = 1;

/// Header line of the LOC report.
const LOC_REPORT_HEADER: &str = "LOC limit exceeded:";

/// What a gate tells the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateOutcome {
    /// Process exit code.
    pub exit_code: i32,
    /// Text for standard output.
    pub stdout: Option<String>,
    /// Text for standard error.
    pub stderr: Option<String>,
}

impl GateOutcome {
    /// Exit 0 with no output.
    #[must_use]
    pub fn allow() -> Self {
        Self {
            exit_code: EXIT_ALLOW,
            stdout: None,
            stderr: None,
        }
    }

    /// Block a write/edit: JSON decision on stdout, exit 2.
    #[must_use]
    pub fn frozen(file_path: &str, hit: &FrozenHit) -> Self {
        let payload = json!({
            "decision": "block",
            "reason": frozen_reason(file_path, hit),
        });
        Self {
            exit_code: EXIT_BLOCK,
            stdout: Some(payload.to_string()),
            stderr: None,
        }
    }

    /// Report LOC violations on stderr with exit 2, or allow when there are none.
    #[must_use]
    pub fn loc_report(violations: &[Violation]) -> Self {
        if violations.is_empty() {
            return Self::allow();
        }
        Self {
            exit_code: EXIT_BLOCK,
            stdout: None,
            stderr: Some(format_loc_report(violations)),
        }
    }

    /// Whether the runtime should stop the action.
    #[must_use]
    pub fn is_block(&self) -> bool {
        self.exit_code == EXIT_BLOCK
    }
}

/// Human-readable explanation of a frozen-path hit.
#[must_use]
pub fn frozen_reason(file_path: &str, hit: &FrozenHit) -> String {
    format!(
        "FROZEN: {file_path} is protected by frozen-gates [{}:{}]. Human must unlock first.",
        hit.repo, hit.rule
    )
}

/// Header plus one indented line per violation.
#[must_use]
pub fn format_loc_report(violations: &[Violation]) -> String {
    let mut report = String::from(LOC_REPORT_HEADER);
    for violation in violations {
        report.push_str("\n  ");
        report.push_str(&violation.to_string());
    }
    report
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
