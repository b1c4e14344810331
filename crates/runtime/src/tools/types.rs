//! Tool-related types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of invoking a tool.
///
/// Denial is a value, not an error: the caller decides how the
/// conversation recovers from it.
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    /// The tool ran and produced this value.
    Completed(Value),
    /// The user refused the call; the tool did not run.
    Denied { tool_name: String },
}

impl Invocation {
    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Denied { .. })
    }
}

/// Per-run context handed to tools and hooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunContext {
    /// User on whose behalf remote tools execute.
    pub user_id: String,
}

impl RunContext {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

impl std::fmt::Display for RunContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{user_id: {}}}", self.user_id)
    }
}
