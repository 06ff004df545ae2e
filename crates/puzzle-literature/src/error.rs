//! Error types for the literature discovery service.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.
//! `ClientError` never crosses the discovery pipeline: every call site degrades it to an
//! empty result. `SearchError` is what callers of the entry surface can see.

use std::time::Duration;

/// Errors from the HTTP client layer (bibliographic source or text-generation provider).
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Middleware error
    #[error("Middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// Rate limited by the remote API (429 response)
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited {
        /// Suggested wait time before retry
        retry_after: Duration,
    },

    /// JSON parsing error
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Server error (5xx response)
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Unexpected HTTP status
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },

    /// Provider answered 2xx but without usable generated text
    #[error("Provider error: {0}")]
    Provider(String),

    /// No API key configured for the text-generation provider
    #[error("Missing API key for {0}")]
    MissingApiKey(&'static str),
}

impl ClientError {
    /// Create a rate limited error with retry-after duration.
    #[must_use]
    pub fn rate_limited(seconds: u64) -> Self {
        Self::RateLimited { retry_after: Duration::from_secs(seconds) }
    }

    /// Create a server error.
    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server { status, message: message.into() }
    }

    /// Create a provider error.
    #[must_use]
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider(message.into())
    }

    /// Returns true if the failure came from the network or the remote service
    /// rather than from decoding its answer.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Http(_)
                | Self::Middleware(_)
                | Self::RateLimited { .. }
                | Self::Server { .. }
                | Self::UnexpectedStatus { .. }
        )
    }
}

/// Errors surfaced by the literature query entry point.
#[derive(thiserror::Error, Debug)]
pub enum SearchError {
    /// Error from an API client
    #[error("API error: {0}")]
    Client(#[from] ClientError),

    /// Input validation failed
    #[error("Validation error: {message}")]
    Validation {
        /// Field that failed validation
        field: String,
        /// Validation error message
        message: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal logic error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SearchError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    /// Create an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Whether the caller sent a bad request.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::Serialization(_))
    }

    /// Convert to a user-friendly error message for the HTTP response.
    #[must_use]
    pub fn to_user_message(&self) -> String {
        match self {
            Self::Validation { field, message } => {
                format!("Invalid input for '{field}': {message}")
            }
            Self::Client(ClientError::RateLimited { retry_after }) => {
                format!(
                    "Rate limited by the bibliographic API. Please wait {:?} before retrying.",
                    retry_after
                )
            }
            _ => self.to_string(),
        }
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for search operations.
pub type SearchResult<T> = Result<T, SearchError>;
