//! Error types for the guardrail engines.

use thiserror::Error;

/// Errors that can occur while compiling policy rules.
#[derive(Debug, Error)]
pub enum GuardrailError {
    /// A frozen or exclusion glob could not be compiled.
    #[error("invalid glob pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The pattern as written in the config.
        pattern: String,
        /// Underlying glob error.
        #[source]
        source: globset::Error,
    },
}
