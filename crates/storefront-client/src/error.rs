//! Error types for the storefront client
//!
//! Callers only ever see two error types: [`ClientError`] when a client cannot
//! be constructed, and [`ApiError`], the normalized shape every failed request
//! resolves to regardless of whether the transport, the server envelope, or
//! the token refresh failed.

use crate::auth::AuthError;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Result type alias for request operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors raised while building a client
#[derive(Debug, Error)]
pub enum ClientError {
    /// Invalid or missing configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The HTTP transport could not be built
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Failure class of a normalized error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport succeeded but the payload reported a failure
    Application,
    /// Application error whose message marks the session as invalid
    InvalidSession,
    /// A 401 that could not be recovered by refreshing the token
    AuthenticationExpired,
    /// Network failure or 5xx that outlived the retry budget
    Transient,
    /// Any other non-2xx response, or a request that could not be built
    Terminal,
}

/// Underlying failure preserved on an [`ApiError`] for diagnostics
#[derive(Debug, Error)]
pub enum ErrorCause {
    /// The request never produced a response
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response without a structured envelope
    #[error("request failed with status {status}")]
    Status { status: u16, body: Value },

    /// Response payload carried an application error envelope
    #[error("application error envelope")]
    Envelope { body: Value },

    /// Token refresh failed
    #[error("token refresh failed: {0}")]
    Refresh(Arc<AuthError>),

    /// The outbound request could not be prepared
    #[error("{0}")]
    Request(String),
}

/// Normalized error returned by every failing request
#[derive(Debug, Error)]
#[error("{code}: {message}")]
pub struct ApiError {
    /// Failure class
    pub kind: ErrorKind,
    /// HTTP status, absent when no response was received
    pub http_status: Option<u16>,
    /// Machine-readable classifier (`ERROR_<n>`, `error.errorServer`, `error.<code>`)
    pub code: String,
    /// Human-readable text
    pub message: String,
    /// Correlation id of the originating request
    pub request_id: String,
    /// Underlying failure
    #[source]
    pub cause: Option<ErrorCause>,
}

impl ApiError {
    pub(crate) fn new(
        kind: ErrorKind,
        http_status: Option<u16>,
        code: impl Into<String>,
        message: impl Into<String>,
        request_id: impl Into<String>,
        cause: Option<ErrorCause>,
    ) -> Self {
        Self {
            kind,
            http_status,
            code: code.into(),
            message: message.into(),
            request_id: request_id.into(),
            cause,
        }
    }

    /// Error for a request that failed before transmission
    pub(crate) fn invalid_request(request_id: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(
            ErrorKind::Terminal,
            None,
            "error.invalidRequest",
            message.clone(),
            request_id,
            Some(ErrorCause::Request(message)),
        )
    }

    /// Error for a 401 whose token refresh failed
    pub(crate) fn refresh_failed(request_id: &str, err: Arc<AuthError>) -> Self {
        Self::new(
            ErrorKind::AuthenticationExpired,
            Some(401),
            "error.unauthorized",
            format!("Session expired: {err}"),
            request_id,
            Some(ErrorCause::Refresh(err)),
        )
    }

    /// Check if the caller may reasonably try again later
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind, ErrorKind::Transient)
    }

    /// Check if the error means the user has to sign in again
    pub fn requires_login(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::InvalidSession | ErrorKind::AuthenticationExpired
        )
    }

    /// Check if the error is a 4xx reported by the server
    pub fn is_client_error(&self) -> bool {
        matches!(self.http_status, Some(400..=499))
    }
}
