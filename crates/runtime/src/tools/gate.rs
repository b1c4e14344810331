//! Human-in-the-loop confirmation gate.
//!
//! [`ConfirmationGate`] wraps a tool and implements [`Tool`] itself. Each
//! invocation asks an [`Approver`] first; a denial is returned as
//! [`Invocation::Denied`] and the wrapped tool is never touched.

use std::sync::Arc;

use async_trait::async_trait;
use policy::Policy;
use serde_json::Value;
use tracing::{debug, info};

use super::{Invocation, RunContext, Tool, ToolError};
use crate::console::Console;
use crate::model::ToolSpec;

/// A pending call shown to the human.
#[derive(Debug, Clone, Copy)]
pub struct ConfirmationRequest<'a> {
    pub tool_name: &'a str,
    pub input: &'a Value,
}

/// The human's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Approval {
    Approved,
    Denied,
}

/// Asks a human whether a tool call may proceed.
#[async_trait]
pub trait Approver: Send + Sync {
    async fn approve(&self, request: &ConfirmationRequest<'_>) -> Result<Approval, ToolError>;
}

/// Proxy that confirms every call before delegating to the wrapped tool.
///
/// No decision is remembered: repeated or concurrent calls each ask.
pub struct ConfirmationGate {
    inner: Arc<dyn Tool>,
    approver: Arc<dyn Approver>,
}

impl ConfirmationGate {
    pub fn new(inner: Arc<dyn Tool>, approver: Arc<dyn Approver>) -> Self {
        Self { inner, approver }
    }
}

#[async_trait]
impl Tool for ConfirmationGate {
    fn spec(&self) -> &ToolSpec {
        self.inner.spec()
    }

    async fn invoke(&self, ctx: &RunContext, input: Value) -> Result<Invocation, ToolError> {
        let request = ConfirmationRequest {
            tool_name: self.name(),
            input: &input,
        };

        match self.approver.approve(&request).await? {
            Approval::Approved => {
                debug!(tool = self.name(), "tool call approved");
                self.inner.invoke(ctx, input).await
            }
            Approval::Denied => {
                info!(tool = self.name(), "tool call denied by user");
                Ok(Invocation::Denied {
                    tool_name: self.name().to_string(),
                })
            }
        }
    }
}

/// Wrap every tool the policy marks for confirmation; pass the rest through.
pub fn gate_tools(
    tools: Vec<Arc<dyn Tool>>,
    policy: &Policy,
    approver: Arc<dyn Approver>,
) -> Vec<Arc<dyn Tool>> {
    tools
        .into_iter()
        .map(|tool| {
            if policy.check(tool.name()).needs_confirmation() {
                debug!(tool = tool.name(), "gating tool behind confirmation");
                Arc::new(ConfirmationGate::new(tool, Arc::clone(&approver))) as Arc<dyn Tool>
            } else {
                tool
            }
        })
        .collect()
}

/// Approver that asks on the console.
///
/// `y` or `yes` (any case) approves; any other answer, or end of input,
/// denies.
pub struct ConsoleApprover {
    console: Arc<dyn Console>,
}

impl ConsoleApprover {
    pub fn new(console: Arc<dyn Console>) -> Self {
        Self { console }
    }
}

#[async_trait]
impl Approver for ConsoleApprover {
    async fn approve(&self, request: &ConfirmationRequest<'_>) -> Result<Approval, ToolError> {
        let arguments = serde_json::to_string_pretty(request.input)
            .unwrap_or_else(|_| request.input.to_string());
        self.console.notice(&format!(
            "Human in the loop required for tool call {}",
            request.tool_name
        ));
        self.console
            .notice(&format!("Please approve the tool call with arguments:\n{arguments}"));

        let answer = self
            .console
            .read_line("Do you approve this tool call? [y/N] ")
            .await
            .map_err(|e| ToolError::Confirmation(e.to_string()))?;

        let approved = answer
            .map(|a| a.trim().to_ascii_lowercase())
            .is_some_and(|a| a == "y" || a == "yes");

        Ok(if approved {
            Approval::Approved
        } else {
            Approval::Denied
        })
    }
}
