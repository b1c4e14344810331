//! Tools executed by the remote tool service.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use super::{Invocation, RunContext, Tool, ToolError, ToolService};
use crate::model::ToolSpec;

/// A tool hosted by the remote service.
pub struct RemoteTool {
    spec: ToolSpec,
    service: Arc<dyn ToolService>,
}

impl RemoteTool {
    pub fn new(spec: ToolSpec, service: Arc<dyn ToolService>) -> Self {
        Self { spec, service }
    }
}

impl std::fmt::Debug for RemoteTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteTool")
            .field("name", &self.spec.name)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Tool for RemoteTool {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn invoke(&self, ctx: &RunContext, input: Value) -> Result<Invocation, ToolError> {
        let input = match input {
            Value::Null => Value::Object(Default::default()),
            Value::Object(map) => Value::Object(map),
            other => {
                return Err(ToolError::InvalidInput(format!(
                    "expected a JSON object, got {other}"
                )));
            }
        };

        let response = self
            .service
            .execute(&self.spec.name, input, &ctx.user_id)
            .await?;

        response
            .into_result()
            .map(Invocation::Completed)
            .map_err(|e| ToolError::Execution(e.message))
    }
}

/// Fetch the tools of each toolkit plus individually named tools.
///
/// `limit` caps the tools taken from each toolkit. A tool listed twice is
/// kept once, in first-seen order.
pub async fn load_tools(
    service: &Arc<dyn ToolService>,
    toolkits: &[String],
    tools: &[String],
    limit: usize,
) -> arcade::Result<Vec<Arc<dyn Tool>>> {
    let mut definitions = Vec::new();
    for toolkit in toolkits {
        definitions.extend(service.list_tools(toolkit, limit).await?);
    }
    for name in tools {
        definitions.push(service.get_tool(name).await?);
    }

    let mut seen = HashSet::new();
    let loaded: Vec<Arc<dyn Tool>> = definitions
        .into_iter()
        .filter(|def| seen.insert(def.name().to_string()))
        .map(|def| {
            debug!(tool = def.name(), "loaded tool");
            Arc::new(RemoteTool::new(ToolSpec::from(def), Arc::clone(service))) as Arc<dyn Tool>
        })
        .collect();

    info!(count = loaded.len(), "tools loaded");
    Ok(loaded)
}
