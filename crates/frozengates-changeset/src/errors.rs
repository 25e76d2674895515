//! Version-control query errors.

use std::time::Duration;

use thiserror::Error;

/// Errors from running a version-control command.
#[derive(Debug, Error)]
pub enum VcsError {
    /// The command could not be started (e.g. git is not installed).
    #[error("failed to spawn git: {0}")]
    Spawn(#[from] std::io::Error),

    /// The command did not finish in time and was killed.
    #[error("git {command} timed out after {}ms", .timeout.as_millis())]
    Timeout {
        /// Subcommand that timed out.
        command: String,
        /// Configured timeout.
        timeout: Duration,
    },

    /// The command exited unsuccessfully.
    #[error("git {command} exited with {code:?}: {stderr}")]
    Failed {
        /// Subcommand that failed.
        command: String,
        /// Exit code, if the process was not killed by a signal.
        code: Option<i32>,
        /// Captured standard error, trimmed.
        stderr: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_display() {
        let err = VcsError::Timeout {
            command: "status".to_string(),
            timeout: Duration::from_secs(5),
        };
        assert_eq!(err.to_string(), "git status timed out after 5000ms");
    }

    #[test]
    fn failed_display() {
        let err = VcsError::Failed {
            command: "rev-parse".to_string(),
            code: Some(128),
            stderr: "not a git repository".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "git rev-parse exited with Some(128): not a git repository"
        );
    }
}
