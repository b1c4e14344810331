//! Tool trait.

use super::{Invocation, RunContext, ToolError};
use crate::model::ToolSpec;
use async_trait::async_trait;
use serde_json::Value;

/// A tool the agent can call.
///
/// This is the boundary between the model loop and side effects. Wrappers
/// such as [`ConfirmationGate`](super::ConfirmationGate) implement it too,
/// so the runner never knows whether a tool is gated.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Specification exposed to the model.
    fn spec(&self) -> &ToolSpec;

    fn name(&self) -> &str {
        &self.spec().name
    }

    /// Invoke the tool with the arguments the model supplied.
    async fn invoke(&self, ctx: &RunContext, input: Value) -> Result<Invocation, ToolError>;
}
