//! Tools exposed to the agent: remote Arcade tools and the confirmation gate.

pub mod errors;
mod gate;
mod remote;
mod service;
mod tool;
pub mod types;

pub use errors::ToolError;
pub use gate::{Approval, Approver, ConfirmationGate, ConfirmationRequest, ConsoleApprover, gate_tools};
pub use remote::{RemoteTool, load_tools};
pub use service::ToolService;
pub use tool::Tool;
pub use types::{Invocation, RunContext};
