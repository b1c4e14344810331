//! In-memory sessions: the conversation kept as a log of authored events.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};
use uuid::Uuid;

use crate::agent::Agent;
use crate::console::Console;
use crate::conversation::{Driver, cancellation_message};
use crate::model::{Backend, Message};
use crate::runner::{DenialPolicy, RunOutcome, Runner};
use crate::tools::RunContext;
use crate::{Error, Result};

/// Author of events typed by the human.
pub const USER_AUTHOR: &str = "user";

/// A unique identifier for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One entry in a session's log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    /// `user` or the name of the agent that produced the message.
    pub author: String,
    pub timestamp: DateTime<Utc>,
    pub content: Message,
}

impl Event {
    pub fn new(author: impl Into<String>, content: Message) -> Self {
        Self {
            id: Uuid::new_v4(),
            author: author.into(),
            timestamp: Utc::now(),
            content,
        }
    }

    /// Text of the event, when it leads with non-empty text.
    pub fn text(&self) -> Option<&str> {
        self.content.leading_text()
    }
}

/// A conversation owned by one user of one app.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub app_name: String,
    pub user_id: String,
    pub state: Map<String, Value>,
    pub events: Vec<Event>,
    pub last_update: DateTime<Utc>,
}

impl Session {
    /// Messages of every event, in order.
    pub fn messages(&self) -> Vec<Message> {
        self.events.iter().map(|e| e.content.clone()).collect()
    }
}

/// Process-lifetime session store.
#[derive(Debug, Default)]
pub struct SessionService {
    sessions: HashMap<SessionId, Session>,
}

impl SessionService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty session. Its state starts with the user id.
    pub fn create_session(&mut self, app_name: &str, user_id: &str) -> &Session {
        let id = SessionId::new();
        let mut state = Map::new();
        state.insert("user_id".into(), Value::String(user_id.to_string()));

        debug!(session = %id, app = app_name, "session created");
        self.sessions.entry(id).or_insert(Session {
            id,
            app_name: app_name.to_string(),
            user_id: user_id.to_string(),
            state,
            events: Vec::new(),
            last_update: Utc::now(),
        })
    }

    pub fn get_session(&self, id: &SessionId) -> Option<&Session> {
        self.sessions.get(id)
    }

    pub fn append_event(&mut self, id: &SessionId, event: Event) -> Result<()> {
        let session = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| Error::SessionNotFound(id.to_string()))?;
        session.last_update = event.timestamp;
        session.events.push(event);
        Ok(())
    }
}

/// Runs an agent over sessions, recording every message as an event.
///
/// Denials are reported to the model, which explains them in its own words.
pub struct SessionRunner<B> {
    app_name: String,
    runner: Runner<B>,
    agent: Agent,
    sessions: SessionService,
}

impl<B: Backend> SessionRunner<B> {
    pub fn new(app_name: impl Into<String>, runner: Runner<B>, agent: Agent) -> Self {
        Self {
            app_name: app_name.into(),
            runner: runner.on_denial(DenialPolicy::ReportToModel),
            agent,
            sessions: SessionService::new(),
        }
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn runner(&self) -> &Runner<B> {
        &self.runner
    }

    pub fn sessions(&self) -> &SessionService {
        &self.sessions
    }

    pub fn create_session(&mut self, user_id: &str) -> SessionId {
        self.sessions.create_session(&self.app_name, user_id).id
    }

    /// Send one user message and return the events the agent produced.
    pub async fn run(
        &mut self,
        user_id: &str,
        session_id: &SessionId,
        message: Message,
    ) -> Result<Vec<Event>> {
        self.sessions
            .append_event(session_id, Event::new(USER_AUTHOR, message))?;

        let messages = self
            .sessions
            .get_session(session_id)
            .map(Session::messages)
            .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))?;

        let ctx = RunContext::new(user_id);
        let author = self.agent.name().to_string();
        let produced: Vec<Message> = match self.runner.run(&self.agent, &ctx, &messages).await? {
            RunOutcome::Completed(result) => result.new_items().to_vec(),
            RunOutcome::Denied { tool_name } => {
                vec![Message::assistant(cancellation_message(&tool_name))]
            }
        };

        let mut events = Vec::with_capacity(produced.len());
        for message in produced {
            let event = Event::new(author.as_str(), message);
            self.sessions.append_event(session_id, event.clone())?;
            events.push(event);
        }

        info!(session = %session_id, events = events.len(), "session turn complete");
        Ok(events)
    }
}

/// Chat driver over a single session.
///
/// Prints each new event that leads with text as `** {author}: {text}`.
pub struct SessionChat<B> {
    runner: SessionRunner<B>,
    user_id: String,
    session_id: SessionId,
    console: Arc<dyn Console>,
}

impl<B: Backend> SessionChat<B> {
    pub fn new(mut runner: SessionRunner<B>, user_id: impl Into<String>, console: Arc<dyn Console>) -> Self {
        let user_id = user_id.into();
        let session_id = runner.create_session(&user_id);
        Self {
            runner,
            user_id,
            session_id,
            console,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.runner.sessions().get_session(&self.session_id)
    }

    pub fn runner(&self) -> &SessionRunner<B> {
        &self.runner
    }
}

impl<B: Backend> Driver for SessionChat<B> {
    async fn turn(&mut self, input: &str) -> Result<()> {
        let events = self
            .runner
            .run(&self.user_id, &self.session_id, Message::user(input))
            .await?;

        for event in &events {
            if let Some(text) = event.text() {
                self.console.print(&format!("** {}: {text}", event.author));
            }
        }
        Ok(())
    }
}
