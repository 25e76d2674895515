//! # frozengates-changeset
//!
//! Reconstructs the set of files touched during a session.
//!
//! Two independent sources feed one [`ChangeSet`](frozengates_core::ChangeSet):
//!
//! - **Working tree**: unstaged, staged, and untracked-but-not-ignored files
//!   reported by git, through the narrow [`VcsQuery`](vcs::VcsQuery) seam
//! - **Transcript replay**: write/edit tool calls recorded in the session's
//!   event log, plus the logs of delegated sub-agents of the same session
//!
//! ## Fail-Open
//!
//! Every source failure (no repository, git missing or slow, unreadable or
//! malformed transcript) degrades that source to an empty contribution.
//! Resolution itself never fails.

#![deny(unsafe_code)]

pub mod errors;
pub mod resolver;
pub mod transcript;
pub mod vcs;

pub use errors::VcsError;
pub use resolver::{ChangeSetResolver, ResolverOptions, SessionSources};
pub use vcs::{GitCli, VcsQuery, WorkingTreeChanges};
