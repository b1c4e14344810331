//! Arcade client error types.

use thiserror::Error;

/// Arcade client errors.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("ARCADE_API_KEY not set")]
    MissingApiKey,

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("API error: {status}: {body}")]
    Api { status: u16, body: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("tool not found: {0}")]
    ToolNotFound(String),

    #[error("authorization response has no id to wait on")]
    MissingAuthorizationId,
}

pub type Result<T> = std::result::Result<T, Error>;
