//! Agent definition.

use std::sync::Arc;

use crate::hooks::{AgentHooks, NoopHooks};
use crate::model::ToolSpec;
use crate::tools::Tool;

/// A named set of instructions and tools.
///
/// The agent holds no conversation state; a [`Runner`](crate::Runner)
/// drives it against a backend.
pub struct Agent {
    name: String,
    instructions: String,
    tools: Vec<Arc<dyn Tool>>,
    specs: Vec<ToolSpec>,
    hooks: Arc<dyn AgentHooks>,
}

impl Agent {
    pub fn new(name: impl Into<String>, instructions: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
            tools: Vec::new(),
            specs: Vec::new(),
            hooks: Arc::new(NoopHooks),
        }
    }

    pub fn with_tools(mut self, tools: Vec<Arc<dyn Tool>>) -> Self {
        self.specs = tools.iter().map(|t| t.spec().clone()).collect();
        self.tools = tools;
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn AgentHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn tools(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    pub fn specs(&self) -> &[ToolSpec] {
        &self.specs
    }

    pub fn hooks(&self) -> &dyn AgentHooks {
        self.hooks.as_ref()
    }

    /// Find a tool by exact name.
    pub fn tool(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("tools", &self.specs.iter().map(|s| &s.name).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
