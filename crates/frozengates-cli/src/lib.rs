//! # frozengates-cli
//!
//! Hook entry points for the tool runtime.
//!
//! - **`pre-tool-use`**: blocks write/edit calls that target a frozen path
//!   ([`gates::run_pre_tool_use`])
//! - **`stop`**: resolves the session's change set and blocks when a file is
//!   over its LOC budget ([`gates::run_stop`])
//!
//! Both gates read one JSON event from stdin and answer with an exit code
//! plus a payload, built by [`decision`].

#![deny(unsafe_code)]

pub mod decision;
pub mod gates;

pub use decision::{EXIT_ALLOW, EXIT_BLOCK, EXIT_FATAL, GateOutcome};
pub use gates::{GateEnv, run_pre_tool_use, run_stop};
