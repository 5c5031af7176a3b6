//! Error types for the storefront CLI

use color_eyre::eyre::Report;
use storefront_client::ApiError;
use thiserror::Error;

/// CLI error type with minimal variants
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration loading or client construction failed
    #[error(transparent)]
    Client(#[from] storefront_client::ClientError),

    /// A request failed after the client's recovery paths
    #[error("{}", describe_api_error(.0))]
    Api(#[from] ApiError),

    /// Session storage issues
    #[error(transparent)]
    Auth(#[from] storefront_client::AuthError),

    /// Malformed command-line input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Everything else
    #[error(transparent)]
    Internal(#[from] Report),
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

fn describe_api_error(err: &ApiError) -> String {
    let status = err
        .http_status
        .map(|s| s.to_string())
        .unwrap_or_else(|| "no response".to_string());

    let mut out = format!(
        "Request failed: {}\n  Code: {}\n  HTTP status: {}\n  Request ID: {}",
        err.message, err.code, status, err.request_id
    );
    if err.requires_login() {
        out.push_str("\n\nSession ended. Run 'sfctl login' to sign in again.");
    }
    out
}
