//! Arcade wire types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One page of a list endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(default)]
    pub items: Vec<T>,
    #[serde(default)]
    pub total_count: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
}

// --- Tool definitions ---

/// Tool definition in OpenAI function-calling format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    #[serde(rename = "type", default = "function_kind")]
    pub kind: String,
    pub function: FunctionDefinition,
}

fn function_kind() -> String {
    "function".to_string()
}

/// The function part of a [`ToolDefinition`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "empty_parameters")]
    pub parameters: Value,
}

fn empty_parameters() -> Value {
    serde_json::json!({ "type": "object", "properties": {} })
}

impl ToolDefinition {
    /// Model-facing tool name, e.g. `NotionToolkit_CreatePage`.
    pub fn name(&self) -> &str {
        &self.function.name
    }

    /// Name used by the execute endpoint, e.g. `NotionToolkit.CreatePage`.
    pub fn qualified_name(&self) -> String {
        qualified_name(&self.function.name)
    }
}

/// Convert a model-facing tool name to the dotted `Toolkit.Tool` form.
///
/// Only the first `_` separates the toolkit from the tool. Names that are
/// already dotted, or have no separator, are returned unchanged.
pub fn qualified_name(name: &str) -> String {
    if name.contains('.') {
        return name.to_string();
    }
    match name.split_once('_') {
        Some((toolkit, tool)) => format!("{toolkit}.{tool}"),
        None => name.to_string(),
    }
}

// --- Authorization ---

/// Body of `POST /v1/tools/authorize`.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizeRequest {
    pub tool_name: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_uri: Option<String>,
}

/// State of an authorization flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationStatus {
    NotStarted,
    Pending,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

impl AuthorizationStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Whether waiting longer can change the status.
    pub fn is_waiting(&self) -> bool {
        matches!(self, Self::NotStarted | Self::Pending)
    }
}

/// Response of the authorize and auth status endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationResponse {
    #[serde(default)]
    pub id: Option<String>,
    pub status: AuthorizationStatus,
    /// Where the user must go to grant access, while pending.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub context: Option<AuthorizationContext>,
}

/// Credentials attached to a completed authorization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationContext {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user_info: Option<Value>,
}

// --- Execution ---

/// Body of `POST /v1/tools/execute`.
#[derive(Debug, Clone, Serialize)]
pub struct ExecuteToolRequest {
    pub tool_name: String,
    pub input: Value,
    pub user_id: String,
}

/// Response of `POST /v1/tools/execute`.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecuteToolResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub execution_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub output: Option<ToolOutput>,
}

/// Output of an execution: a value, an error, or a pending authorization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolOutput {
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub error: Option<ToolOutputError>,
    #[serde(default)]
    pub authorization: Option<AuthorizationResponse>,
}

/// Error reported by the tool itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutputError {
    pub message: String,
    #[serde(default)]
    pub developer_message: Option<String>,
    #[serde(default)]
    pub can_retry: bool,
}

impl std::fmt::Display for ToolOutputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ToolOutputError {}

impl ExecuteToolResponse {
    /// Returns the tool's value on success, or the error it reported.
    ///
    /// A successful response without a value yields `null`.
    pub fn into_result(self) -> Result<Value, ToolOutputError> {
        let output = self.output.unwrap_or_default();

        if let Some(auth) = output.authorization.filter(|a| !a.status.is_completed()) {
            let url = auth.url.unwrap_or_default();
            return Err(ToolOutputError {
                message: format!("authorization required: {url}"),
                developer_message: None,
                can_retry: true,
            });
        }

        if let Some(error) = output.error {
            return Err(error);
        }

        if self.success {
            Ok(output.value.unwrap_or(Value::Null))
        } else {
            Err(ToolOutputError {
                message: format!(
                    "execution failed with status {}",
                    self.status.as_deref().unwrap_or("unknown")
                ),
                developer_message: None,
                can_retry: false,
            })
        }
    }
}
