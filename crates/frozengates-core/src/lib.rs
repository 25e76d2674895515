//! # frozengates-core
//!
//! Foundation types shared by the frozen-gates crates.
//!
//! - **Hook input**: [`HookInput`], the JSON event the tool runtime writes to stdin
//! - **Mutation tools**: [`MutationTool`], the tool names that write or edit files
//! - **Paths**: [`PathContext`] for `~` expansion, absolutizing, and lexical normalization
//! - **Change sets**: [`ChangeSet`], the files touched during a session
//! - **Logging**: [`logging::init_subscriber`] for the stderr `tracing` subscriber

#![deny(unsafe_code)]

pub mod changeset;
pub mod events;
pub mod logging;
pub mod paths;
pub mod tools;

pub use changeset::ChangeSet;
pub use events::HookInput;
pub use paths::PathContext;
pub use tools::MutationTool;
