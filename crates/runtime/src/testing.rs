//! Scripted fakes shared by the unit tests.

use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;

use arcade::{
    AuthorizationResponse, AuthorizationStatus, ExecuteToolResponse, FunctionDefinition,
    ToolDefinition, ToolOutput, ToolOutputError,
};
use async_trait::async_trait;
use serde_json::{Value, json};

use crate::console::Console;
use crate::model::{
    Backend, Message, ModelError, ModelRequest, ModelResponse, Part, Role, ToolCall, ToolSpec,
    Usage,
};
use crate::tools::{
    Approval, Approver, ConfirmationRequest, Invocation, RunContext, Tool, ToolError, ToolService,
};

pub fn spec(name: &str) -> ToolSpec {
    ToolSpec {
        name: name.to_string(),
        description: format!("{name} test tool"),
        schema: json!({"type": "object", "properties": {}}),
    }
}

/// An assistant message holding one tool call and no text.
pub fn tool_call_message(id: &str, name: &str, input: Value) -> Message {
    Message {
        role: Role::Assistant,
        parts: vec![Part::ToolCall(ToolCall {
            id: id.to_string(),
            name: name.to_string(),
            input,
        })],
    }
}

// --- Console ---

/// Console fed from a fixed list of lines.
pub struct ScriptedConsole {
    input: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
    output: Mutex<Vec<String>>,
}

impl ScriptedConsole {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: Mutex::new(lines.into_iter().map(Into::into).collect()),
            prompts: Mutex::new(Vec::new()),
            output: Mutex::new(Vec::new()),
        }
    }

    pub fn output(&self) -> Vec<String> {
        self.output.lock().unwrap().clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Console for ScriptedConsole {
    async fn read_line(&self, prompt: &str) -> io::Result<Option<String>> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.input.lock().unwrap().pop_front())
    }

    fn print(&self, line: &str) {
        self.output.lock().unwrap().push(line.to_string());
    }
}

// --- Approver ---

/// Gives the same answer every time and records what it was asked.
pub struct FixedApprover {
    answer: Approval,
    asked: Mutex<Vec<(String, Value)>>,
}

impl FixedApprover {
    pub fn new(answer: Approval) -> Self {
        Self {
            answer,
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn asked(&self) -> Vec<(String, Value)> {
        self.asked.lock().unwrap().clone()
    }
}

#[async_trait]
impl Approver for FixedApprover {
    async fn approve(&self, request: &ConfirmationRequest<'_>) -> Result<Approval, ToolError> {
        self.asked
            .lock()
            .unwrap()
            .push((request.tool_name.to_string(), request.input.clone()));
        Ok(self.answer)
    }
}

// --- Tool ---

enum Reply {
    Value(Value),
    Error(ToolError),
    Deny,
}

/// Local tool with a fixed reply that records its inputs.
pub struct RecordingTool {
    spec: ToolSpec,
    reply: Reply,
    calls: Mutex<Vec<Value>>,
}

impl RecordingTool {
    fn new(name: &str, reply: Reply) -> Self {
        Self {
            spec: spec(name),
            reply,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn returning(name: &str, value: Value) -> Self {
        Self::new(name, Reply::Value(value))
    }

    pub fn failing(name: &str, error: ToolError) -> Self {
        Self::new(name, Reply::Error(error))
    }

    /// Behaves like a gate whose approver said no.
    pub fn denying(name: &str) -> Self {
        Self::new(name, Reply::Deny)
    }

    pub fn calls(&self) -> Vec<Value> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Tool for RecordingTool {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn invoke(&self, _ctx: &RunContext, input: Value) -> Result<Invocation, ToolError> {
        match &self.reply {
            Reply::Deny => Ok(Invocation::Denied {
                tool_name: self.spec.name.clone(),
            }),
            Reply::Value(value) => {
                self.calls.lock().unwrap().push(input);
                Ok(Invocation::Completed(value.clone()))
            }
            Reply::Error(error) => {
                self.calls.lock().unwrap().push(input);
                Err(error.clone())
            }
        }
    }
}

// --- Backend ---

/// A request as the backend saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub system: Option<String>,
    pub messages: Vec<Message>,
    pub tools: Vec<ToolSpec>,
}

/// Backend that replies with queued messages, then fails.
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Message>>,
    requests: Mutex<Vec<RecordedRequest>>,
    usage: Usage,
}

impl ScriptedBackend {
    pub fn new(replies: impl IntoIterator<Item = Message>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
            usage: Usage::default(),
        }
    }

    /// Usage reported with every reply.
    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = usage;
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Backend for ScriptedBackend {
    async fn call(&self, request: ModelRequest<'_>) -> Result<ModelResponse, ModelError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            system: request.system.map(str::to_string),
            messages: request.messages.to_vec(),
            tools: request.tools.to_vec(),
        });

        let message = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ModelError::InvalidResponse("script exhausted".into()))?;

        Ok(ModelResponse {
            message,
            usage: self.usage,
        })
    }
}

// --- Tool service ---

enum ExecutionReply {
    Output(Value),
    Failure(String),
}

struct AuthScript {
    initial: AuthorizationStatus,
    last: AuthorizationStatus,
}

/// In-memory stand-in for the remote tool service.
pub struct FakeService {
    tools: Vec<String>,
    reply: Mutex<ExecutionReply>,
    auth: Mutex<AuthScript>,
    executions: Mutex<Vec<(String, Value, String)>>,
    authorizations: Mutex<Vec<(String, String)>>,
    waits: Mutex<usize>,
}

impl FakeService {
    pub fn with_tools(names: &[&str]) -> Self {
        Self {
            tools: names.iter().map(|n| n.to_string()).collect(),
            reply: Mutex::new(ExecutionReply::Output(Value::Null)),
            auth: Mutex::new(AuthScript {
                initial: AuthorizationStatus::Completed,
                last: AuthorizationStatus::Completed,
            }),
            executions: Mutex::new(Vec::new()),
            authorizations: Mutex::new(Vec::new()),
            waits: Mutex::new(0),
        }
    }

    pub fn set_output(&self, value: Value) {
        *self.reply.lock().unwrap() = ExecutionReply::Output(value);
    }

    pub fn set_failure(&self, message: &str) {
        *self.reply.lock().unwrap() = ExecutionReply::Failure(message.to_string());
    }

    /// Status returned by `authorize`, then by `wait_for_completion`.
    pub fn set_authorization(&self, initial: AuthorizationStatus, last: AuthorizationStatus) {
        *self.auth.lock().unwrap() = AuthScript { initial, last };
    }

    /// `(tool_name, input, user_id)` of every execution.
    pub fn executions(&self) -> Vec<(String, Value, String)> {
        self.executions.lock().unwrap().clone()
    }

    pub fn authorizations(&self) -> Vec<(String, String)> {
        self.authorizations.lock().unwrap().clone()
    }

    pub fn waits(&self) -> usize {
        *self.waits.lock().unwrap()
    }

    fn definition(name: &str) -> ToolDefinition {
        ToolDefinition {
            kind: "function".into(),
            function: FunctionDefinition {
                name: name.to_string(),
                description: Some(format!("{name} remote tool")),
                parameters: json!({"type": "object", "properties": {}}),
            },
        }
    }

    fn authorization(tool_name: &str, user_id: &str, status: AuthorizationStatus) -> AuthorizationResponse {
        AuthorizationResponse {
            id: Some(format!("auth-{tool_name}")),
            status,
            url: (!status.is_completed()).then(|| format!("https://auth.example/{tool_name}")),
            scopes: Vec::new(),
            user_id: Some(user_id.to_string()),
            context: None,
        }
    }
}

#[async_trait]
impl ToolService for FakeService {
    async fn list_tools(&self, toolkit: &str, limit: usize) -> arcade::Result<Vec<ToolDefinition>> {
        let prefix = format!("{toolkit}_");
        Ok(self
            .tools
            .iter()
            .filter(|name| name.starts_with(&prefix))
            .take(limit)
            .map(|name| Self::definition(name))
            .collect())
    }

    async fn get_tool(&self, name: &str) -> arcade::Result<ToolDefinition> {
        self.tools
            .iter()
            .find(|t| *t == name)
            .map(|t| Self::definition(t))
            .ok_or_else(|| arcade::Error::ToolNotFound(name.to_string()))
    }

    async fn authorize(&self, tool_name: &str, user_id: &str) -> arcade::Result<AuthorizationResponse> {
        self.authorizations
            .lock()
            .unwrap()
            .push((tool_name.to_string(), user_id.to_string()));
        let status = self.auth.lock().unwrap().initial;
        Ok(Self::authorization(tool_name, user_id, status))
    }

    async fn wait_for_completion(
        &self,
        response: AuthorizationResponse,
    ) -> arcade::Result<AuthorizationResponse> {
        *self.waits.lock().unwrap() += 1;
        let status = self.auth.lock().unwrap().last;
        Ok(AuthorizationResponse {
            status,
            url: None,
            ..response
        })
    }

    async fn execute(
        &self,
        tool_name: &str,
        input: Value,
        user_id: &str,
    ) -> arcade::Result<ExecuteToolResponse> {
        self.executions.lock().unwrap().push((
            tool_name.to_string(),
            input,
            user_id.to_string(),
        ));

        let output = match &*self.reply.lock().unwrap() {
            ExecutionReply::Output(value) => ToolOutput {
                value: Some(value.clone()),
                ..Default::default()
            },
            ExecutionReply::Failure(message) => ToolOutput {
                error: Some(ToolOutputError {
                    message: message.clone(),
                    developer_message: None,
                    can_retry: false,
                }),
                ..Default::default()
            },
        };

        Ok(ExecuteToolResponse {
            id: Some("exec-1".into()),
            execution_id: Some("exec-1".into()),
            status: Some("success".into()),
            success: output.error.is_none(),
            duration: Some(0.1),
            output: Some(output),
        })
    }
}
