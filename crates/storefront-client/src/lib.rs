//! Storefront API client
//!
//! Authenticated HTTP client that tags every request, unwraps the backend's
//! response envelopes, refreshes expired access tokens with a single in-flight
//! call, and retries transient failures with bounded linear backoff.

pub mod auth;
pub mod client;
pub mod config;
pub mod context;
pub mod envelope;
pub mod error;
pub mod retry;
pub mod session;
pub mod types;

pub use auth::{
    default_session_path, AuthError, AuthResult, FileSessionStore, HttpTokenRefresher,
    MemorySessionStore, RefreshCoordinator, RefreshOutcome, SessionStore, StoredSession,
    TokenPair, TokenRefresher,
};
pub use client::{ClientBuilder, StorefrontClient};
pub use config::ClientConfig;
pub use context::RequestContext;
pub use envelope::Envelope;
pub use error::{ApiError, ClientError, ErrorCause, ErrorKind, Result};
pub use retry::RetryPolicy;
pub use session::{
    LogoutReason, NoopNotifier, Notice, Notifier, SessionTerminator, TracingNotifier,
    TracingSessionTerminator,
};
pub use types::{ApiResponse, RequestSpec};

pub use reqwest::{Method, StatusCode};
