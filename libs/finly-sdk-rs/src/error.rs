use thiserror::Error;

/// SDK-specific errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The API rejected the request; status and message pass through
    /// untouched to the caller.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Token renewal failed. Terminal: local tokens are cleared and the
    /// session is over.
    #[error("Session refresh failed")]
    RefreshFailed,

    /// Network error from the underlying transport.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body did not match the expected shape.
    #[error("Unexpected response body: {0}")]
    Decode(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}
