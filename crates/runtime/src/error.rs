use arcade::AuthorizationStatus;
use thiserror::Error;

use crate::model::ModelError;
use crate::tools::ToolError;

/// Runtime errors.
///
/// A denied tool call is not among them; see
/// [`Invocation::Denied`](crate::Invocation::Denied).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error(transparent)]
    Service(#[from] arcade::Error),

    #[error("authorization for {tool} ended with status {status:?}")]
    Authorization {
        tool: String,
        status: AuthorizationStatus,
    },

    #[error("agent did not finish within {0} model turns")]
    MaxTurns(usize),

    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
