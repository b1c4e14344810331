//! Agent lifecycle hooks.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::agent::Agent;
use crate::console::Console;
use crate::model::{ToolResult, ToolSpec};
use crate::tools::RunContext;

/// Callbacks fired by the runner. All default to no-ops.
pub trait AgentHooks: Send + Sync {
    fn on_start(&self, _ctx: &RunContext, _agent: &Agent) {}

    fn on_end(&self, _ctx: &RunContext, _agent: &Agent, _output: &str) {}

    fn on_tool_start(&self, _ctx: &RunContext, _agent: &Agent, _tool: &ToolSpec) {}

    fn on_tool_end(&self, _ctx: &RunContext, _agent: &Agent, _tool: &ToolSpec, _result: &ToolResult) {
    }
}

/// Hooks that do nothing.
#[derive(Debug, Default)]
pub struct NoopHooks;

impl AgentHooks for NoopHooks {}

/// Prints each lifecycle event as a numbered `###` line.
pub struct ConsoleHooks {
    display_name: String,
    event_counter: AtomicUsize,
    console: Arc<dyn Console>,
}

impl ConsoleHooks {
    pub fn new(display_name: impl Into<String>, console: Arc<dyn Console>) -> Self {
        Self {
            display_name: display_name.into(),
            event_counter: AtomicUsize::new(0),
            console,
        }
    }

    fn emit(&self, event: &str) {
        let n = self.event_counter.fetch_add(1, Ordering::SeqCst) + 1;
        self.console
            .print(&format!("### ({}) {n}: {event}", self.display_name));
    }
}

impl AgentHooks for ConsoleHooks {
    fn on_start(&self, _ctx: &RunContext, agent: &Agent) {
        self.emit(&format!("Agent {} started", agent.name()));
    }

    fn on_end(&self, _ctx: &RunContext, agent: &Agent, _output: &str) {
        self.emit(&format!("Agent {} ended", agent.name()));
    }

    fn on_tool_start(&self, ctx: &RunContext, agent: &Agent, tool: &ToolSpec) {
        self.emit(&format!(
            "Agent {} started tool {} with context: {ctx}",
            agent.name(),
            tool.name
        ));
    }

    fn on_tool_end(&self, _ctx: &RunContext, agent: &Agent, tool: &ToolSpec, _result: &ToolResult) {
        self.emit(&format!("Agent {} ended tool {}", agent.name(), tool.name));
    }
}
