use thiserror::Error;

/// Failures talking to the chat-completions endpoint.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ModelError {
    /// The request never got an HTTP response.
    #[error("model request failed: {0}")]
    Network(String),

    /// The endpoint answered with a non-success status.
    #[error("model API error: {status}: {body}")]
    Api { status: u16, body: String },

    /// The reply was not a usable completion.
    #[error("invalid model response: {0}")]
    InvalidResponse(String),
}
