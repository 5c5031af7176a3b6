//! Token refresh functionality
//!
//! Exchanges a refresh token for a new token pair at the storefront's
//! refresh endpoint.

use super::types::{AuthError, AuthResult, TokenPair};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use storefront_common::REQUEST_ID_HEADER;
use tracing::{debug, info};
use uuid::Uuid;

/// Mints a new token pair from a refresh token
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self, refresh_token: &str) -> AuthResult<TokenPair>;
}

/// Refresher calling the storefront refresh endpoint over HTTP
#[derive(Debug, Clone)]
pub struct HttpTokenRefresher {
    http_client: reqwest::Client,
    endpoint: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshPayload {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<RefreshPayload>,
    #[serde(flatten)]
    top_level: RefreshPayload,
}

impl RefreshResponse {
    fn into_token_pair(self) -> AuthResult<TokenPair> {
        if self.success == Some(false) {
            return Err(AuthError::RefreshRejected(
                self.message
                    .unwrap_or_else(|| "refresh endpoint reported failure".to_string()),
            ));
        }

        let payload = self.data.unwrap_or(self.top_level);
        let access_token = payload
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::InvalidResponse("Missing accessToken in response".into()))?;
        let refresh_token = payload
            .refresh_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                AuthError::InvalidResponse("Missing refreshToken in response".into())
            })?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }
}

impl HttpTokenRefresher {
    /// Create a refresher posting to the given absolute endpoint URL
    pub fn new(http_client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http_client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TokenRefresher for HttpTokenRefresher {
    async fn refresh(&self, refresh_token: &str) -> AuthResult<TokenPair> {
        debug!("Refreshing access token at {}", self.endpoint);

        let response = self
            .http_client
            .post(&self.endpoint)
            .header(REQUEST_ID_HEADER, Uuid::new_v4().to_string())
            .json(&RefreshRequest { refresh_token })
            .send()
            .await
            .map_err(|e| AuthError::NetworkError(format!("Token refresh request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AuthError::RefreshRejected(format!(
                "status {}: {}",
                status, error_text
            )));
        }

        let body: RefreshResponse = response.json().await.map_err(|e| {
            AuthError::InvalidResponse(format!("Failed to parse token response: {}", e))
        })?;
        let tokens = body.into_token_pair()?;

        info!("Token refresh completed successfully");
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn refresher(server: &MockServer) -> HttpTokenRefresher {
        HttpTokenRefresher::new(
            reqwest::Client::new(),
            format!("{}/auth/refresh-token", server.uri()),
        )
    }

    #[tokio::test]
    async fn test_refresh_reads_nested_payload() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/refresh-token"))
            .and(header_exists("x-request-id"))
            .and(body_json(json!({ "refreshToken": "r-1" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": { "accessToken": "a-2", "refreshToken": "r-2" },
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let refresher = refresher(&mock_server);
        assert_eq!(
            refresher.endpoint(),
            format!("{}/auth/refresh-token", mock_server.uri())
        );

        let tokens = refresher.refresh("r-1").await.unwrap();
        assert_eq!(tokens, TokenPair::new("a-2", "r-2"));
    }

    #[tokio::test]
    async fn test_refresh_accepts_top_level_tokens() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/refresh-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "accessToken": "a-2",
                "refreshToken": "r-2",
            })))
            .mount(&mock_server)
            .await;

        let tokens = refresher(&mock_server).refresh("r-1").await.unwrap();
        assert_eq!(tokens.access_token, "a-2");
    }

    #[tokio::test]
    async fn test_refresh_missing_token_is_hard_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/refresh-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": { "accessToken": "a-2" },
            })))
            .mount(&mock_server)
            .await;

        let result = refresher(&mock_server).refresh("r-1").await;
        assert!(matches!(result, Err(AuthError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_refresh_success_false_is_rejected() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/refresh-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "message": "Refresh token revoked",
            })))
            .mount(&mock_server)
            .await;

        let result = refresher(&mock_server).refresh("r-1").await;
        match result {
            Err(AuthError::RefreshRejected(message)) => {
                assert_eq!(message, "Refresh token revoked")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_refresh_http_error_is_rejected() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/refresh-token"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&mock_server)
            .await;

        let result = refresher(&mock_server).refresh("r-1").await;
        assert!(matches!(result, Err(AuthError::RefreshRejected(_))));
    }
}
