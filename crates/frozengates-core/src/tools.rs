//! Tool names that mutate files.

use serde_json::Value;

/// A tool invocation that writes to or edits a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationTool {
    /// Creates or overwrites a file.
    Write,
    /// Replaces a span inside a file.
    Edit,
    /// Applies several edits to one file.
    MultiEdit,
    /// Edits a cell of a Jupyter notebook.
    NotebookEdit,
}

impl MutationTool {
    /// Look up a tool by the name the runtime reports. Unknown names yield `None`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Write" => Some(Self::Write),
            "Edit" => Some(Self::Edit),
            "MultiEdit" => Some(Self::MultiEdit),
            "NotebookEdit" => Some(Self::NotebookEdit),
            _ => None,
        }
    }

    /// Name of the input argument that carries the target path.
    #[must_use]
    pub fn path_argument(self) -> &'static str {
        match self {
            Self::NotebookEdit => "notebook_path",
            Self::Write | Self::Edit | Self::MultiEdit => "file_path",
        }
    }

    /// Extract the non-empty target path from a tool input object.
    #[must_use]
    pub fn target_path(self, input: &Value) -> Option<&str> {
        input
            .get(self.path_argument())
            .and_then(Value::as_str)
            .filter(|p| !p.is_empty())
    }
}

impl std::fmt::Display for MutationTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Write => write!(f, "Write"),
            Self::Edit => write!(f, "Edit"),
            Self::MultiEdit => write!(f, "MultiEdit"),
            Self::NotebookEdit => write!(f, "NotebookEdit"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn known_names_resolve() {
        assert_eq!(MutationTool::from_name("Write"), Some(MutationTool::Write));
        assert_eq!(MutationTool::from_name("Edit"), Some(MutationTool::Edit));
        assert_eq!(MutationTool::from_name("MultiEdit"), Some(MutationTool::MultiEdit));
        assert_eq!(
            MutationTool::from_name("NotebookEdit"),
            Some(MutationTool::NotebookEdit)
        );
    }

    #[test]
    fn other_tools_are_not_mutations() {
        for name in ["Read", "Bash", "Grep", "write", ""] {
            assert_eq!(MutationTool::from_name(name), None, "failed for {name}");
        }
    }

    #[test]
    fn display_round_trips_name() {
        for tool in [
            MutationTool::Write,
            MutationTool::Edit,
            MutationTool::MultiEdit,
            MutationTool::NotebookEdit,
        ] {
            assert_eq!(MutationTool::from_name(&tool.to_string()), Some(tool));
        }
    }

    #[test]
    fn target_path_reads_file_path() {
        let input = json!({"file_path": "/r/a.ts", "content": "x"});
        assert_eq!(MutationTool::Write.target_path(&input), Some("/r/a.ts"));
    }

    #[test]
    fn notebook_edit_reads_notebook_path() {
        let input = json!({"notebook_path": "/r/n.ipynb"});
        assert_eq!(MutationTool::NotebookEdit.target_path(&input), Some("/r/n.ipynb"));
        assert_eq!(MutationTool::Edit.target_path(&input), None);
    }

    #[test]
    fn empty_or_non_string_path_is_none() {
        assert_eq!(MutationTool::Edit.target_path(&json!({"file_path": ""})), None);
        assert_eq!(MutationTool::Edit.target_path(&json!({"file_path": 3})), None);
        assert_eq!(MutationTool::Edit.target_path(&json!("not an object")), None);
    }
}
