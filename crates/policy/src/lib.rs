//! Human-in-the-loop confirmation policy.
//!
//! Core principle: **a tool named in the allow-list never runs without a
//! human saying yes.** Matching is by exact tool name.

mod error;
mod policy;

pub use error::{Error, Result};
pub use policy::{ConfirmRules, Decision, Policy};
