//! Offline replay of session transcripts.
//!
//! A transcript is newline-delimited JSON. Tool invocations appear as
//! `{"type": "tool_use", "name": ..., "input": {...}}` items inside a record's
//! `message.content` array (or a top-level `content` array). Every item whose
//! name is a [`MutationTool`] contributes its target path.
//!
//! Sub-agent transcripts are `agent-*.jsonl` files next to the primary
//! transcript or under `<dir>/<session id>/subagents/`. They only count when
//! their first record carries the current session id.

use std::path::{Path, PathBuf};

use frozengates_core::MutationTool;
use serde_json::Value;
use tracing::debug;

/// File-name prefix of sub-agent transcripts.
pub const SUBAGENT_PREFIX: &str = "agent-";

/// Extension of transcript files.
pub const TRANSCRIPT_EXTENSION: &str = "jsonl";

/// Per-session directory holding sub-agent transcripts.
const SUBAGENT_DIR: &str = "subagents";

/// Parse every well-formed record of a transcript.
///
/// Malformed lines are skipped individually. A missing or unreadable file
/// yields no records.
pub fn read_records(path: &Path) -> Vec<Value> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "transcript unreadable");
            return Vec::new();
        }
    };

    let text = String::from_utf8_lossy(&bytes);
    let mut skipped = 0usize;
    let records: Vec<Value> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match serde_json::from_str(line) {
            Ok(record) => Some(record),
            Err(_) => {
                skipped += 1;
                None
            }
        })
        .collect();

    if skipped > 0 {
        debug!(path = %path.display(), skipped, "skipped malformed transcript lines");
    }
    records
}

/// Session id carried by a record (`sessionId` or `session_id`).
pub fn record_session_id(record: &Value) -> Option<&str> {
    record
        .get("sessionId")
        .or_else(|| record.get("session_id"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Target paths of every write/edit tool invocation in a record.
pub fn mutation_targets(record: &Value) -> Vec<&str> {
    let nested = record.get("message").and_then(|m| m.get("content"));
    let top = record.get("content");

    [nested, top]
        .into_iter()
        .flatten()
        .filter_map(Value::as_array)
        .flatten()
        .filter_map(tool_use_target)
        .collect()
}

fn tool_use_target(item: &Value) -> Option<&str> {
    let kind = item.get("type").and_then(Value::as_str);
    if kind.is_some_and(|k| k != "tool_use") {
        return None;
    }
    let tool = MutationTool::from_name(item.get("name")?.as_str()?)?;
    tool.target_path(item.get("input")?)
}

/// Session id of the first well-formed record.
pub fn first_session_id(path: &Path) -> Option<String> {
    read_records(path)
        .first()
        .and_then(record_session_id)
        .map(str::to_string)
}

/// All write/edit targets recorded in one transcript, in order.
pub fn replay(path: &Path) -> Vec<String> {
    read_records(path)
        .iter()
        .flat_map(mutation_targets)
        .map(str::to_string)
        .collect()
}

/// Whether a file name looks like a sub-agent transcript.
pub fn is_subagent_transcript(name: &str) -> bool {
    name.starts_with(SUBAGENT_PREFIX)
        && Path::new(name)
            .extension()
            .is_some_and(|ext| ext == TRANSCRIPT_EXTENSION)
}

/// Sub-agent transcripts belonging to `session_id`, sorted by path.
pub fn discover_subagent_transcripts(primary: &Path, session_id: &str) -> Vec<PathBuf> {
    let Some(dir) = primary.parent() else {
        return Vec::new();
    };

    let mut found: Vec<PathBuf> = [dir.to_path_buf(), dir.join(session_id).join(SUBAGENT_DIR)]
        .iter()
        .flat_map(|d| scan_directory(d))
        .filter(|candidate| candidate != primary)
        .filter(|candidate| {
            let owner = first_session_id(candidate);
            let belongs = owner.as_deref() == Some(session_id);
            if !belongs {
                debug!(path = %candidate.display(), ?owner, "sub-agent transcript from another session");
            }
            belongs
        })
        .collect();

    found.sort();
    found.dedup();
    debug!(count = found.len(), session_id, "discovered sub-agent transcripts");
    found
}

/// Sub-agent transcript files directly inside `dir`.
fn scan_directory(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(is_subagent_transcript)
        })
        .collect()
}

/// A primary transcript plus the session it belongs to.
#[derive(Debug, Clone)]
pub struct TranscriptReplay {
    primary: PathBuf,
    session_id: Option<String>,
}

impl TranscriptReplay {
    /// Replay `primary`, attributing sub-agents to `session_id` when given.
    pub fn new(primary: impl Into<PathBuf>, session_id: Option<String>) -> Self {
        Self {
            primary: primary.into(),
            session_id: session_id.filter(|s| !s.is_empty()),
        }
    }

    /// Session id: explicit, else the primary's first record, else its file stem.
    pub fn session_id(&self) -> Option<String> {
        self.session_id
            .clone()
            .or_else(|| first_session_id(&self.primary))
            .or_else(|| {
                self.primary
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .map(str::to_string)
            })
    }

    /// Targets from the primary transcript and every matching sub-agent transcript.
    pub fn mutated_paths(&self) -> Vec<String> {
        let mut paths = replay(&self.primary);
        if let Some(session_id) = self.session_id() {
            for sub in discover_subagent_transcripts(&self.primary, &session_id) {
                paths.extend(replay(&sub));
            }
        }
        paths
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
