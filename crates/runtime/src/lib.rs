//! Quill runtime: agent loop, gated remote tools and conversation drivers.
//!
//! This crate connects a chat model to tools hosted by the Arcade service
//! and puts a human in the loop for the calls that need one.
//!
//! # Overview
//!
//! The runtime is organized around these concepts:
//!
//! - **Backend**: a model provider; [`OpenAiBackend`] speaks the
//!   chat-completions protocol.
//! - **Tool**: something the agent can call. [`RemoteTool`] executes on the
//!   tool service; [`ConfirmationGate`] wraps a tool and asks an
//!   [`Approver`] first, returning [`Invocation::Denied`] on refusal.
//! - **Agent** and **Runner**: an agent binds instructions, tools and hooks;
//!   the runner drives it until the model stops calling tools.
//! - **Drivers**: [`HistoryChat`] replays an explicit history each turn;
//!   [`SessionChat`] keeps the conversation as session events.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use runtime::{
//!     Agent, ConsoleApprover, HistoryChat, OpenAiBackend, RunContext, Runner, StdConsole,
//!     ToolService, conversation, gate_tools, load_tools,
//! };
//!
//! # async fn example() -> runtime::Result<()> {
//! let service: Arc<dyn ToolService> = Arc::new(arcade::Client::from_env()?);
//! let console = Arc::new(StdConsole::new());
//!
//! let tools = load_tools(&service, &["NotionToolkit".into()], &[], 30).await?;
//! let policy = policy::Policy::new(["NotionToolkit_CreatePage"]);
//! let tools = gate_tools(tools, &policy, Arc::new(ConsoleApprover::new(console.clone())));
//!
//! let agent = Agent::new("notion_agent", "Help with Notion.").with_tools(tools);
//! let backend = OpenAiBackend::builder("sk-...", "gpt-4o-mini").build();
//! let mut chat = HistoryChat::new(Runner::new(backend), agent, RunContext::new("me"), console.clone());
//! conversation::run(&mut chat, console.as_ref(), "You: ").await?;
//! # Ok(())
//! # }
//! ```

mod agent;
mod authorize;
mod console;
pub mod conversation;
mod error;
mod hooks;
pub mod model;
mod providers;
mod runner;
mod session;
pub mod tools;

#[cfg(test)]
pub(crate) mod testing;

pub use agent::Agent;
pub use authorize::{authorize_all, ensure_authorized};
pub use console::{Console, NOTICE_PREFIX, StdConsole};
pub use conversation::{Driver, HistoryChat};
pub use error::{Error, Result};
pub use hooks::{AgentHooks, ConsoleHooks, NoopHooks};
pub use model::{Backend, Message, ModelError, Role, ToolSpec, Usage};
pub use providers::{DEFAULT_BASE_URL as OPENAI_BASE_URL, OpenAiBackend, OpenAiBackendBuilder};
pub use runner::{DEFAULT_MAX_TURNS, DenialPolicy, RunOutcome, RunResult, Runner};
pub use session::{Event, Session, SessionChat, SessionId, SessionRunner, SessionService, USER_AUTHOR};
pub use tools::{
    Approval, Approver, ConfirmationGate, ConfirmationRequest, ConsoleApprover, Invocation,
    RemoteTool, RunContext, Tool, ToolError, ToolService, gate_tools, load_tools,
};
