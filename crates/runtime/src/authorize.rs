//! Per-tool user authorization.

use tracing::{debug, info};

use crate::console::Console;
use crate::tools::{Tool, ToolService};
use crate::{Error, Result};

/// Make sure `user_id` has granted access to `tool_name`.
///
/// Returns at once when access was already granted. Otherwise shows the
/// authorization URL and blocks until the flow finishes.
pub async fn ensure_authorized(
    service: &dyn ToolService,
    tool_name: &str,
    user_id: &str,
    console: &dyn Console,
) -> Result<()> {
    let response = service.authorize(tool_name, user_id).await?;
    if response.status.is_completed() {
        debug!(tool = tool_name, "already authorized");
        return Ok(());
    }

    console.notice(&format!("Authorization required for tool call {tool_name}"));
    if let Some(url) = response.url.as_deref() {
        console.notice(&format!("Please authorize in your browser: {url}"));
    }
    console.notice("Waiting for you to complete authorization...");

    let response = service.wait_for_completion(response).await?;
    if !response.status.is_completed() {
        return Err(Error::Authorization {
            tool: tool_name.to_string(),
            status: response.status,
        });
    }

    info!(tool = tool_name, "authorization granted");
    console.notice("Authorization granted.");
    Ok(())
}

/// Authorize every tool in order, stopping at the first failure.
pub async fn authorize_all(
    service: &dyn ToolService,
    tools: &[std::sync::Arc<dyn Tool>],
    user_id: &str,
    console: &dyn Console,
) -> Result<()> {
    for tool in tools {
        ensure_authorized(service, tool.name(), user_id, console).await?;
    }
    Ok(())
}
