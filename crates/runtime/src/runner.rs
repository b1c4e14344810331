//! Agent run loop.

use tracing::{debug, warn};

use crate::agent::Agent;
use crate::model::{Backend, Message, ModelRequest, ToolCall, ToolResult, Usage};
use crate::tools::{Invocation, RunContext, ToolError};
use crate::{Error, Result};

/// Default cap on model calls per run.
pub const DEFAULT_MAX_TURNS: usize = 10;

/// What the runner does when the user denies a tool call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DenialPolicy {
    /// Stop the run and return [`RunOutcome::Denied`].
    #[default]
    Abort,
    /// Send the denial to the model as the call's result and keep going.
    ReportToModel,
}

/// How a run ended.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Completed(RunResult),
    Denied { tool_name: String },
}

/// A completed run.
#[derive(Debug, Clone)]
pub struct RunResult {
    messages: Vec<Message>,
    input_len: usize,
    /// Text of the model's last reply.
    pub final_output: String,
    /// Token usage summed over every model call.
    pub usage: Usage,
}

impl RunResult {
    /// Messages produced during the run.
    pub fn new_items(&self) -> &[Message] {
        &self.messages[self.input_len..]
    }

    /// The run's input followed by everything it produced.
    pub fn to_input_list(&self) -> Vec<Message> {
        self.messages.clone()
    }

    pub fn into_input_list(self) -> Vec<Message> {
        self.messages
    }
}

enum Executed {
    Result(ToolResult),
    Denied(String),
}

/// Drives an agent against a model backend.
pub struct Runner<B> {
    backend: B,
    max_turns: usize,
    denial: DenialPolicy,
}

impl<B: Backend> Runner<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            max_turns: DEFAULT_MAX_TURNS,
            denial: DenialPolicy::default(),
        }
    }

    pub fn max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn on_denial(mut self, denial: DenialPolicy) -> Self {
        self.denial = denial;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn denial_policy(&self) -> DenialPolicy {
        self.denial
    }

    /// Run the agent until the model replies without tool calls.
    pub async fn run(
        &self,
        agent: &Agent,
        ctx: &RunContext,
        input: &[Message],
    ) -> Result<RunOutcome> {
        agent.hooks().on_start(ctx, agent);

        let mut messages = input.to_vec();
        let input_len = messages.len();
        let mut usage = Usage::default();

        for turn in 1..=self.max_turns {
            debug!(
                agent = agent.name(),
                turn,
                messages = messages.len(),
                "calling model"
            );
            let request = ModelRequest {
                system: Some(agent.instructions()),
                messages: &messages,
                tools: agent.specs(),
            };
            let response = self.backend.call(request).await?;
            usage += response.usage;

            let calls = response.message.tool_calls();
            messages.push(response.message);

            if calls.is_empty() {
                let final_output = messages.last().map(Message::text).unwrap_or_default();
                agent.hooks().on_end(ctx, agent, &final_output);
                return Ok(RunOutcome::Completed(RunResult {
                    messages,
                    input_len,
                    final_output,
                    usage,
                }));
            }

            let mut results = Vec::with_capacity(calls.len());
            for call in &calls {
                match self.execute(agent, ctx, call).await? {
                    Executed::Result(result) => results.push(result),
                    Executed::Denied(tool_name) => match self.denial {
                        DenialPolicy::Abort => return Ok(RunOutcome::Denied { tool_name }),
                        DenialPolicy::ReportToModel => results.push(ToolResult::Failure {
                            tool_call_id: call.id.clone(),
                            error: ToolError::Denied(tool_name),
                        }),
                    },
                }
            }
            messages.push(Message::tool_results(results));
        }

        Err(Error::MaxTurns(self.max_turns))
    }

    async fn execute(&self, agent: &Agent, ctx: &RunContext, call: &ToolCall) -> Result<Executed> {
        let Some(tool) = agent.tool(&call.name) else {
            warn!(tool = call.name.as_str(), "model requested an unknown tool");
            return Ok(Executed::Result(ToolResult::Failure {
                tool_call_id: call.id.clone(),
                error: ToolError::NotFound(call.name.clone()),
            }));
        };

        agent.hooks().on_tool_start(ctx, agent, tool.spec());

        let result = match tool.invoke(ctx, call.input.clone()).await {
            Ok(Invocation::Completed(output)) => ToolResult::Success {
                tool_call_id: call.id.clone(),
                output,
            },
            Ok(Invocation::Denied { tool_name }) => return Ok(Executed::Denied(tool_name)),
            Err(error) if error.is_reported_to_model() => {
                debug!(tool = call.name.as_str(), %error, "tool failed");
                ToolResult::Failure {
                    tool_call_id: call.id.clone(),
                    error,
                }
            }
            Err(error) => return Err(error.into()),
        };

        agent.hooks().on_tool_end(ctx, agent, tool.spec(), &result);
        Ok(Executed::Result(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Part, Role};
    use crate::testing::{RecordingTool, ScriptedBackend, tool_call_message};
    use serde_json::json;
    use std::sync::Arc;

    fn ctx() -> RunContext {
        RunContext::new("u1")
    }

    #[tokio::test]
    async fn plain_reply_completes_in_one_call() {
        let backend = ScriptedBackend::new([Message::assistant("Hi there")]);
        let runner = Runner::new(backend);
        let agent = Agent::new("a", "instructions");

        let outcome = runner
            .run(&agent, &ctx(), &[Message::user("hello")])
            .await
            .unwrap();

        let RunOutcome::Completed(result) = outcome else {
            panic!("expected completion");
        };
        assert_eq!(result.final_output, "Hi there");
        assert_eq!(result.new_items().len(), 1);
        assert_eq!(result.to_input_list().len(), 2);

        let requests = runner.backend().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].system.as_deref(), Some("instructions"));
    }

    #[tokio::test]
    async fn tool_results_are_fed_back() {
        let backend = ScriptedBackend::new([
            tool_call_message("c1", "X_Search", json!({"query": "Notes"})),
            Message::assistant("Found it"),
        ]);
        let tool = Arc::new(RecordingTool::returning("X_Search", json!({"id": "p1"})));
        let agent = Agent::new("a", "i").with_tools(vec![tool.clone()]);
        let runner = Runner::new(backend);

        let outcome = runner
            .run(&agent, &ctx(), &[Message::user("find notes")])
            .await
            .unwrap();

        let RunOutcome::Completed(result) = outcome else {
            panic!("expected completion");
        };
        assert_eq!(tool.calls(), vec![json!({"query": "Notes"})]);
        assert_eq!(result.final_output, "Found it");

        let roles: Vec<Role> = result.new_items().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::Assistant, Role::Tool, Role::Assistant]);

        // The second model call saw the tool result.
        let requests = runner.backend().requests();
        let second = &requests[1].messages;
        let Part::ToolResult(ToolResult::Success { tool_call_id, output }) = &second[2].parts[0]
        else {
            panic!("expected a tool result");
        };
        assert_eq!(tool_call_id, "c1");
        assert_eq!(output, &json!({"id": "p1"}));
    }

    #[tokio::test]
    async fn unknown_tool_is_reported_to_model() {
        let backend = ScriptedBackend::new([
            tool_call_message("c1", "Nope", json!({})),
            Message::assistant("Sorry"),
        ]);
        let runner = Runner::new(backend);
        let agent = Agent::new("a", "i");

        let outcome = runner.run(&agent, &ctx(), &[Message::user("x")]).await.unwrap();
        let RunOutcome::Completed(result) = outcome else {
            panic!("expected completion");
        };
        let failure = result.new_items()[1].tool_results_iter().next().unwrap();
        assert!(failure.is_failure());
        assert_eq!(failure.content(), "tool not found: Nope");
    }

    #[tokio::test]
    async fn execution_failure_is_reported_to_model() {
        let backend = ScriptedBackend::new([
            tool_call_message("c1", "X_Write", json!({})),
            Message::assistant("That failed"),
        ]);
        let tool = Arc::new(RecordingTool::failing(
            "X_Write",
            ToolError::Execution("quota".into()),
        ));
        let agent = Agent::new("a", "i").with_tools(vec![tool]);
        let runner = Runner::new(backend);

        let outcome = runner.run(&agent, &ctx(), &[Message::user("x")]).await.unwrap();
        assert!(matches!(outcome, RunOutcome::Completed(_)));
    }

    #[tokio::test]
    async fn service_failure_ends_the_run() {
        let backend = ScriptedBackend::new([tool_call_message("c1", "X_Write", json!({}))]);
        let tool = Arc::new(RecordingTool::failing(
            "X_Write",
            ToolError::Service("connection reset".into()),
        ));
        let agent = Agent::new("a", "i").with_tools(vec![tool]);
        let runner = Runner::new(backend);

        let err = runner
            .run(&agent, &ctx(), &[Message::user("x")])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Tool(ToolError::Service(_))));
    }

    #[tokio::test]
    async fn denial_aborts_by_default() {
        let backend = ScriptedBackend::new([tool_call_message("c1", "X_Write", json!({}))]);
        let tool = Arc::new(RecordingTool::denying("X_Write"));
        let agent = Agent::new("a", "i").with_tools(vec![tool]);
        let runner = Runner::new(backend);

        let outcome = runner.run(&agent, &ctx(), &[Message::user("x")]).await.unwrap();
        match outcome {
            RunOutcome::Denied { tool_name } => assert_eq!(tool_name, "X_Write"),
            other => panic!("expected denial, got {other:?}"),
        }
        assert_eq!(runner.backend().requests().len(), 1);
    }

    #[tokio::test]
    async fn denial_can_be_reported_to_model() {
        let backend = ScriptedBackend::new([
            tool_call_message("c1", "X_Write", json!({})),
            Message::assistant("Okay, I won't."),
        ]);
        let tool = Arc::new(RecordingTool::denying("X_Write"));
        let agent = Agent::new("a", "i").with_tools(vec![tool]);
        let runner = Runner::new(backend).on_denial(DenialPolicy::ReportToModel);

        let outcome = runner.run(&agent, &ctx(), &[Message::user("x")]).await.unwrap();
        let RunOutcome::Completed(result) = outcome else {
            panic!("expected completion");
        };
        assert_eq!(result.final_output, "Okay, I won't.");
        let reported = result.new_items()[1].tool_results_iter().next().unwrap();
        assert_eq!(reported.content(), "the user denied the call to X_Write");
    }

    #[tokio::test]
    async fn exceeding_max_turns_is_an_error() {
        let backend = ScriptedBackend::new([
            tool_call_message("c1", "X_Search", json!({})),
            tool_call_message("c2", "X_Search", json!({})),
        ]);
        let tool = Arc::new(RecordingTool::returning("X_Search", json!(null)));
        let agent = Agent::new("a", "i").with_tools(vec![tool]);
        let runner = Runner::new(backend).max_turns(2);

        let err = runner
            .run(&agent, &ctx(), &[Message::user("x")])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MaxTurns(2)));
    }

    #[tokio::test]
    async fn usage_is_summed() {
        let backend = ScriptedBackend::new([
            tool_call_message("c1", "X_Search", json!({})),
            Message::assistant("done"),
        ])
        .with_usage(Usage {
            input_tokens: 10,
            output_tokens: 2,
        });
        let tool = Arc::new(RecordingTool::returning("X_Search", json!(null)));
        let agent = Agent::new("a", "i").with_tools(vec![tool]);
        let runner = Runner::new(backend);

        let RunOutcome::Completed(result) =
            runner.run(&agent, &ctx(), &[Message::user("x")]).await.unwrap()
        else {
            panic!("expected completion");
        };
        assert_eq!(result.usage.total_tokens(), 24);
    }
}
