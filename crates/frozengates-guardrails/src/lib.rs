//! # frozengates-guardrails
//!
//! The two policy engines behind the frozen-gates hooks.
//!
//! - [`FrozenPathMatcher`]: decides whether a proposed write/edit touches a
//!   frozen path, and which repository rule fired
//! - [`LocPolicyEvaluator`]: flags changed files whose non-blank line count
//!   exceeds the applicable repository (or default) budget
//!
//! Both are pure with respect to the policy: they take an already loaded
//! [`GatesConfig`](frozengates_settings::GatesConfig) and never block by
//! themselves. Turning results into exit codes is the caller's job.

#![deny(unsafe_code)]

pub mod errors;
pub mod frozen;
pub mod loc;

pub use errors::GuardrailError;
pub use frozen::{FrozenHit, FrozenPathMatcher, FrozenRule};
pub use loc::{LocPolicyEvaluator, Violation, count_loc};
