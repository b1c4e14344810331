//! Interactive conversation loop.
//!
//! [`run`] owns the read-eval-print cycle; a [`Driver`] decides what one
//! turn does. [`HistoryChat`] replays the whole message history each turn
//! and turns a denied tool call into a scripted exchange.

use std::future::Future;
use std::sync::Arc;

use tracing::info;

use crate::Result;
use crate::agent::Agent;
use crate::console::Console;
use crate::model::{Backend, Message};
use crate::runner::{DenialPolicy, RunOutcome, Runner};
use crate::tools::RunContext;

/// Printed when the loop ends.
pub const GOODBYE: &str = "Goodbye!";

/// Input that ends the loop, compared case-insensitively.
pub const EXIT_COMMAND: &str = "exit";

/// Processes one line of user input.
pub trait Driver {
    fn turn(&mut self, input: &str) -> impl Future<Output = Result<()>>;
}

/// Read lines until `exit` or end of input, handing each to `driver`.
///
/// Blank lines are skipped. A failed turn ends the loop with its error.
pub async fn run<D: Driver>(driver: &mut D, console: &dyn Console, prompt: &str) -> Result<()> {
    while let Some(line) = console.read_line(prompt).await? {
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case(EXIT_COMMAND) {
            break;
        }
        driver.turn(input).await?;
    }

    console.print(GOODBYE);
    Ok(())
}

/// The assistant's reply after a denied call.
pub fn cancellation_message(tool_name: &str) -> String {
    format!("Sure, I cancelled the call to {tool_name}. What else can I do for you today?")
}

/// Messages recorded in place of a denied call, so the model sees the
/// cancellation on its next turn.
pub fn denial_exchange(tool_name: &str) -> [Message; 3] {
    [
        Message::assistant(format!("Please confirm the call to {tool_name}")),
        Message::user("I changed my mind, please don't do it!"),
        Message::assistant(cancellation_message(tool_name)),
    ]
}

/// Chat that keeps an explicit, append-only history.
pub struct HistoryChat<B> {
    runner: Runner<B>,
    agent: Agent,
    ctx: RunContext,
    console: Arc<dyn Console>,
    history: Vec<Message>,
}

impl<B: Backend> HistoryChat<B> {
    /// Denials always abort the run here; see [`denial_exchange`].
    pub fn new(runner: Runner<B>, agent: Agent, ctx: RunContext, console: Arc<dyn Console>) -> Self {
        Self {
            runner: runner.on_denial(DenialPolicy::Abort),
            agent,
            ctx,
            console,
            history: Vec::new(),
        }
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn runner(&self) -> &Runner<B> {
        &self.runner
    }
}

impl<B: Backend> Driver for HistoryChat<B> {
    async fn turn(&mut self, input: &str) -> Result<()> {
        self.history.push(Message::user(input));

        match self.runner.run(&self.agent, &self.ctx, &self.history).await? {
            RunOutcome::Completed(result) => {
                let output = result.final_output.clone();
                self.history = result.into_input_list();
                self.console.print(&output);
            }
            RunOutcome::Denied { tool_name } => {
                info!(tool = tool_name.as_str(), "recording cancelled tool call");
                self.history.extend(denial_exchange(&tool_name));
                self.console.print(&cancellation_message(&tool_name));
            }
        }
        Ok(())
    }
}
