//! Remote tool service seam.

use arcade::{AuthorizationResponse, ExecuteToolResponse, ToolDefinition};
use async_trait::async_trait;
use serde_json::Value;

/// Operations the runtime needs from the tool-hosting service.
///
/// Implemented by [`arcade::Client`]; tests substitute an in-memory fake.
#[async_trait]
pub trait ToolService: Send + Sync {
    /// List up to `limit` tools of a toolkit.
    async fn list_tools(&self, toolkit: &str, limit: usize)
    -> arcade::Result<Vec<ToolDefinition>>;

    /// Fetch one tool by name.
    async fn get_tool(&self, name: &str) -> arcade::Result<ToolDefinition>;

    /// Start or look up the user's authorization for a tool.
    async fn authorize(&self, tool_name: &str, user_id: &str)
    -> arcade::Result<AuthorizationResponse>;

    /// Block until an authorization is no longer pending.
    async fn wait_for_completion(
        &self,
        response: AuthorizationResponse,
    ) -> arcade::Result<AuthorizationResponse>;

    /// Execute a tool on the user's behalf.
    async fn execute(
        &self,
        tool_name: &str,
        input: Value,
        user_id: &str,
    ) -> arcade::Result<ExecuteToolResponse>;
}

#[async_trait]
impl ToolService for arcade::Client {
    async fn list_tools(
        &self,
        toolkit: &str,
        limit: usize,
    ) -> arcade::Result<Vec<ToolDefinition>> {
        arcade::Client::list_tools(self, toolkit, limit).await
    }

    async fn get_tool(&self, name: &str) -> arcade::Result<ToolDefinition> {
        arcade::Client::get_tool(self, name).await
    }

    async fn authorize(
        &self,
        tool_name: &str,
        user_id: &str,
    ) -> arcade::Result<AuthorizationResponse> {
        arcade::Client::authorize(self, tool_name, user_id).await
    }

    async fn wait_for_completion(
        &self,
        response: AuthorizationResponse,
    ) -> arcade::Result<AuthorizationResponse> {
        arcade::Client::wait_for_completion(self, response).await
    }

    async fn execute(
        &self,
        tool_name: &str,
        input: Value,
        user_id: &str,
    ) -> arcade::Result<ExecuteToolResponse> {
        arcade::Client::execute(self, tool_name, input, user_id).await
    }
}
