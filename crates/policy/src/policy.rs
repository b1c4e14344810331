//! Policy configuration and enforcement.

use crate::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeSet;

/// Which tool calls need a human decision before they run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Policy {
    /// Tools that must be confirmed by the user before they run.
    pub confirm: ConfirmRules,
}

/// Rules for confirmed tools, as written in a `[confirm]` table.
///
/// Unknown keys are rejected so a misspelled list never reads as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfirmRules {
    /// Tool names requiring confirmation (exact match).
    #[serde(default)]
    pub tools: BTreeSet<String>,
}

/// Result of a policy check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Run the tool without asking.
    Proceed,
    /// Ask the user first.
    Confirm,
}

impl Decision {
    pub fn needs_confirmation(&self) -> bool {
        matches!(self, Decision::Confirm)
    }
}

impl Policy {
    /// Create a policy confirming exactly the given tool names.
    pub fn new<I, S>(tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            confirm: ConfirmRules {
                tools: tools.into_iter().map(Into::into).collect(),
            },
        }
    }

    /// Build a policy from configured rules, rejecting unusable entries.
    pub fn from_rules(confirm: ConfirmRules) -> Result<Self> {
        let policy = Self { confirm };
        policy.validate()?;
        Ok(policy)
    }

    /// Reject entries that can never match a tool name.
    pub fn validate(&self) -> Result<()> {
        for name in &self.confirm.tools {
            if name.trim().is_empty() {
                return Err(Error::Invalid("empty tool name in confirm.tools".into()));
            }
            if name.trim() != name {
                return Err(Error::Invalid(format!(
                    "tool name '{name}' has surrounding whitespace"
                )));
            }
        }
        Ok(())
    }

    /// Check whether a call to `tool_name` needs confirmation.
    pub fn check(&self, tool_name: &str) -> Decision {
        if self.confirm.tools.contains(tool_name) {
            Decision::Confirm
        } else {
            Decision::Proceed
        }
    }

    /// Names of the tools requiring confirmation, sorted.
    pub fn confirmed_tools(&self) -> impl Iterator<Item = &str> {
        self.confirm.tools.iter().map(String::as_str)
    }
}
