use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during tool execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum ToolError {
    #[error("tool not found: {0}")]
    NotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("execution failed: {0}")]
    Execution(String),
    #[error("the user denied the call to {0}")]
    Denied(String),
    #[error("tool service: {0}")]
    Service(String),
    #[error("confirmation failed: {0}")]
    Confirmation(String),
}

impl ToolError {
    /// Whether the model should see this error as the call's result.
    ///
    /// Service and confirmation failures are not the model's to handle and
    /// end the run instead.
    pub fn is_reported_to_model(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::InvalidInput(_) | Self::Execution(_) | Self::Denied(_)
        )
    }
}

impl From<arcade::Error> for ToolError {
    fn from(e: arcade::Error) -> Self {
        Self::Service(e.to_string())
    }
}
