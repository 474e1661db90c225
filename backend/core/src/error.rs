use thiserror::Error;

/// Top-level error type for the Atelier runtime.
#[derive(Debug, Error)]
pub enum AtelierError {
    #[error("unknown agent: {0}")]
    UnknownAgent(String),

    #[error("unknown session: {0}")]
    UnknownSession(String),

    #[error("LLM provider error ({provider}): {message}")]
    ProviderError { provider: String, message: String },

    #[error("knowledge router unavailable: {0}")]
    RouterUnavailable(String),

    #[error("write operations not allowed in read-only query")]
    WriteBlocked,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
