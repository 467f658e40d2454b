//! Error types for the provider clients

/// Result type for provider operations.
///
/// This is a convenience type alias that uses [`ProviderError`] as the error type.
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Error type for all embedding and generation calls.
///
/// Every variant is a provider failure from the caller's point of view: the
/// whole batch (or the whole completion) is lost, never part of it.
///
/// # Error Categories
///
/// - **Configuration Errors**: missing credential, malformed settings
/// - **Transport Errors**: the request never produced a response
/// - **Remote Errors**: the provider answered with a non-success status
/// - **Response Errors**: the body could not be decoded or is inconsistent
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The API credential is absent or blank
    #[error("missing provider credential")]
    MissingCredential,

    /// Provider settings are invalid
    #[error("Invalid provider configuration: {message}")]
    InvalidConfig { message: String },

    /// The HTTP request failed before a response was received
    #[error("provider request failed: {source}")]
    Request {
        #[from]
        source: reqwest::Error,
    },

    /// The provider returned a non-success status
    #[error("provider returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response body could not be decoded
    #[error("failed to decode provider response: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
    },

    /// The provider returned a different number of vectors than inputs
    #[error("provider returned {actual} embeddings for {expected} inputs")]
    CountMismatch { expected: usize, actual: usize },

    /// The provider returned no completion choice
    #[error("provider returned an empty response")]
    EmptyResponse,
}

impl ProviderError {
    /// Create an invalid configuration error with a custom message.
    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Whether retrying the same request may succeed.
    ///
    /// Rate limiting, server errors and transient transport failures are
    /// retryable; everything else fails immediately.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Status { status, .. } => {
                *status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            Self::Request { source } => source.is_timeout() || source.is_connect(),
            _ => false,
        }
    }
}
