//! # frozengates-settings
//!
//! Policy configuration for the frozen-gates hooks.
//!
//! A YAML document is resolved from one of three places (in priority order):
//! 1. **Override** — the path in `FROZENGATES_CONFIG`, used exclusively when set
//! 2. **Project file** — `$CLAUDE_PROJECT_DIR/.claude/frozengates.yaml`
//! 3. **User file** — `~/.claude/frozengates.yaml`
//!
//! The document is converted once into a strongly typed [`GatesConfig`].
//! Missing or malformed fields fall back to documented defaults instead of
//! failing the load; a missing file means no enforcement at all.
//!
//! ```yaml
//! defaults:
//!   loc:
//!     limit: 500
//!     extensions: [".ts", ".py"]
//! repos:
//!   api:
//!     path: ~/code/api
//!     frozen: ["secrets/*.yaml"]
//!     loc:
//!       limit: 300
//!       exclude: ["*.generated.ts"]
//!   legacy:
//!     path: ~/code/legacy
//!     frozen_all: true
//! ```

#![deny(unsafe_code)]

pub mod document;
pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{ConfigSources, load_config, parse_config, select_config_path};
pub use types::*;
