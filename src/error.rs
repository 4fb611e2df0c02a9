//! Error types for Scoremate
//!
//! This module defines the error types used throughout the application,
//! using `thiserror` for ergonomic error handling.
//!
//! Two families live here:
//!
//! - [`ScoremateError`] covers crate-level failures (configuration,
//!   credentials, IO) that abort a command.
//! - [`ServiceError`] classifies failures of the external chat completion
//!   service. These never abort the chat loop; each one maps to a message
//!   that is shown to the user as an assistant reply.

use thiserror::Error;

/// Main error type for Scoremate operations
#[derive(Error, Debug)]
pub enum ScoremateError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider construction errors (HTTP client setup, unknown provider)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Missing credentials for provider
    #[error("Missing credentials for provider: {0}")]
    MissingCredentials(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Keyring/credential storage errors
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    /// Interactive line editor errors
    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}

/// Classified failure of a chat completion call
///
/// Produced by [`crate::providers::ChatProvider::send`]. The variants follow
/// the HTTP status of the response, with two extra cases for "no response at
/// all" and "a success response we could not read".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// 401: the API key was rejected
    #[error("chat service rejected the credentials (401)")]
    Unauthorized,

    /// 429: too many requests
    #[error("chat service rate limit exceeded (429)")]
    RateLimited,

    /// 400: the service refused the request; carries the service's explanation if any
    #[error("chat service rejected the request (400): {}", .0.as_deref().unwrap_or("no detail"))]
    BadRequest(Option<String>),

    /// 5xx
    #[error("chat service server error ({0})")]
    Server(u16),

    /// Any other non-success status
    #[error("chat service returned unexpected status {0}")]
    Unknown(u16),

    /// No response was received (connection refused, DNS, timeout)
    #[error("chat service unreachable: {0}")]
    Network(String),

    /// A success response without the expected reply field
    #[error("chat service response had an unexpected format: {0}")]
    MalformedResponse(String),
}

impl ServiceError {
    /// Classify a non-success HTTP status
    ///
    /// # Arguments
    ///
    /// * `status` - HTTP status code of the response
    /// * `detail` - `error.message` from the response body, if it had one
    ///
    /// # Examples
    ///
    /// ```
    /// use scoremate::error::ServiceError;
    ///
    /// assert_eq!(ServiceError::from_status(429, None), ServiceError::RateLimited);
    /// assert_eq!(ServiceError::from_status(503, None), ServiceError::Server(503));
    /// ```
    pub fn from_status(status: u16, detail: Option<String>) -> Self {
        match status {
            400 => Self::BadRequest(detail),
            401 => Self::Unauthorized,
            429 => Self::RateLimited,
            s if s >= 500 => Self::Server(s),
            s => Self::Unknown(s),
        }
    }

    /// Human-readable message shown in the chat transcript
    ///
    /// Every variant has its own wording; none of them exposes transport
    /// internals.
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized => {
                "Invalid API key. Please check your chat service API key configuration.".to_string()
            }
            Self::RateLimited => "Rate limit exceeded. Please try again in a moment.".to_string(),
            Self::BadRequest(detail) => format!(
                "Invalid request: {}",
                detail.as_deref().unwrap_or("Please check your input.")
            ),
            Self::Server(_) => "The chat service had a server error. Please try again later.".to_string(),
            Self::Unknown(status) => format!(
                "The chat service returned an unexpected error (status {}). Please try again.",
                status
            ),
            Self::Network(_) => "Network error: Unable to connect to the chat service. Please check your internet connection.".to_string(),
            Self::MalformedResponse(_) => {
                "Unexpected response format from the chat service. Please try again.".to_string()
            }
        }
    }

    /// Short label used for metrics and structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::RateLimited => "rate_limited",
            Self::BadRequest(_) => "bad_request",
            Self::Server(_) => "server_error",
            Self::Unknown(_) => "unknown",
            Self::Network(_) => "network",
            Self::MalformedResponse(_) => "malformed_response",
        }
    }
}

/// Result type alias for Scoremate operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
