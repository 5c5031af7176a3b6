//! Authentication-related types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Access/refresh token pair, always stored and replaced as a whole
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    /// Access token for API requests
    pub access_token: String,
    /// Refresh token used to mint a new pair
    pub refresh_token: String,
}

impl TokenPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

/// Snapshot of what a session store currently holds
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredSession {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    /// User's locale preference, sent as `accept-language`
    pub locale: Option<String>,
    /// Serialized application state, wiped together with the tokens
    pub app_state: Option<Value>,
}

impl StoredSession {
    /// Whether an access token is present
    pub fn is_authenticated(&self) -> bool {
        self.access_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Authentication errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No refresh token is stored
    #[error("No refresh token available")]
    MissingRefreshToken,

    /// Network error while calling the refresh endpoint
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Refresh endpoint rejected the refresh token
    #[error("Refresh rejected: {0}")]
    RefreshRejected(String),

    /// Refresh endpoint answered with an unusable payload
    #[error("Invalid refresh response: {0}")]
    InvalidResponse(String),

    /// The refresh in flight was dropped before it finished
    #[error("Token refresh was abandoned")]
    RefreshAbandoned,

    /// Token storage error
    #[error("Token storage error: {0}")]
    StorageError(String),

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}
