//! HTTP client for the storefront API
//!
//! Every request goes through the same pipeline:
//!
//! - outbound: `x-request-id`, `accept-language` and, when a session exists,
//!   `Authorization: Bearer {token}`
//! - inbound, 2xx: application error envelopes are turned into errors, the
//!   rest of the body has its `"null"` strings normalized
//! - inbound, failure: structured envelopes are reported as-is, a first 401
//!   triggers a single-flight token refresh and a retransmission, network
//!   errors and 5xx are retried with linear backoff, everything else becomes
//!   a normalized [`ApiError`]
//!
//! # Usage Examples
//!
//! ```rust,no_run
//! use storefront_client::ClientBuilder;
//! use serde_json::json;
//!
//! # async fn example() -> storefront_client::Result<()> {
//! let client = ClientBuilder::default()
//!     .base_url("https://shop.example.com/api")
//!     .with_tokens("access_token", "refresh_token")
//!     .build()
//!     .expect("valid configuration");
//!
//! let products = client.get("/products").await?;
//! println!("{}", products.data());
//!
//! client.post("/cart/items", &json!({ "sku": "TEA-01", "qty": 2 })).await?;
//! # Ok(())
//! # }
//! ```

use crate::auth::{
    AuthError, AuthResult, FileSessionStore, HttpTokenRefresher, MemorySessionStore, RefreshCoordinator,
    RefreshOutcome, SessionStore, TokenPair, TokenRefresher,
};
use crate::config::{ClientConfig, DEFAULT_LOGOUT_DELAY_MS, DEFAULT_TIMEOUT_SECS};
use crate::context::RequestContext;
use crate::envelope::{self, normalize_null_strings, Envelope};
use crate::error::{ApiError, ClientError, ErrorCause, ErrorKind, Result};
use crate::retry::RetryPolicy;
use crate::session::{
    end_session, schedule_logout, LogoutReason, Notice, Notifier, SessionTerminator,
    TracingNotifier, TracingSessionTerminator,
};
use crate::types::{ApiResponse, RequestSpec};
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT_LANGUAGE, AUTHORIZATION, CONTENT_TYPE,
};
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use storefront_common::{
    DEFAULT_LOCALE, DEFAULT_REFRESH_PATH, LEGACY_OK_CODE, REQUEST_ID_HEADER, SERVER_ERROR_CODE,
};
use tracing::{debug, info, warn};
use url::Url;

/// Response as read off the wire, before envelope inspection
struct RawResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Value,
}

/// What to do after a failed attempt that is not final
enum Recovery {
    /// Send the same request again
    Retransmit,
    /// Send it again with a freshly minted access token
    Reauthorize(String),
}

/// Authenticated HTTP client for the storefront API
#[derive(Clone)]
pub struct StorefrontClient {
    http_client: reqwest::Client,
    base_url: String,
    store: Arc<dyn SessionStore>,
    refresher: Arc<dyn TokenRefresher>,
    coordinator: Arc<RefreshCoordinator>,
    notifier: Arc<dyn Notifier>,
    terminator: Arc<dyn SessionTerminator>,
    retry: RetryPolicy,
    default_locale: String,
    legacy_ok_code: String,
    invalid_session_markers: Vec<String>,
    logout_delay: Duration,
}

impl std::fmt::Debug for StorefrontClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontClient")
            .field("base_url", &self.base_url)
            .field("retry", &self.retry)
            .field("coordinator", &self.coordinator)
            .finish_non_exhaustive()
    }
}

impl StorefrontClient {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Session store the client reads credentials from
    pub fn session_store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Refresh coordinator shared by this client
    pub fn refresh_coordinator(&self) -> &Arc<RefreshCoordinator> {
        &self.coordinator
    }

    // ===== Verbs =====

    /// GET request
    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.execute(RequestSpec::get(path)).await
    }

    /// POST request with a JSON body
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        self.send_json(RequestSpec::post(path), body).await
    }

    /// PUT request with a JSON body
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        self.send_json(RequestSpec::put(path), body).await
    }

    /// PATCH request with a JSON body
    pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        self.send_json(RequestSpec::patch(path), body).await
    }

    /// DELETE request
    pub async fn delete(&self, path: &str) -> Result<ApiResponse> {
        self.execute(RequestSpec::delete(path)).await
    }

    /// Run an arbitrary request through the pipeline
    pub async fn execute(&self, spec: RequestSpec) -> Result<ApiResponse> {
        self.dispatch(spec, RequestContext::new()).await
    }

    // ===== Session =====

    /// Store a token pair obtained from a login flow
    pub async fn login_with_tokens(&self, tokens: &TokenPair) -> AuthResult<()> {
        self.store.store_tokens(tokens).await?;
        info!("Stored new session");
        Ok(())
    }

    /// Clear the session immediately and notify the terminator
    pub async fn logout(&self) {
        end_session(
            self.store.as_ref(),
            self.terminator.as_ref(),
            LogoutReason::UserRequested,
        )
        .await;
    }

    // ===== Pipeline =====

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        spec: RequestSpec,
        body: &B,
    ) -> Result<ApiResponse> {
        let ctx = RequestContext::new();
        let body = serde_json::to_value(body).map_err(|e| {
            ApiError::invalid_request(&ctx.request_id, format!("Failed to serialize body: {e}"))
        })?;
        self.dispatch(spec.json(body), ctx).await
    }

    async fn dispatch(&self, spec: RequestSpec, mut ctx: RequestContext) -> Result<ApiResponse> {
        let url = self.resolve_url(&spec.path);
        let mut headers = self.prepare_headers(&spec, &ctx).await?;

        loop {
            debug!(
                request_id = %ctx.request_id,
                method = %spec.method,
                url = %url,
                retry_count = ctx.retry_count,
                is_retry = ctx.is_retry,
                "Sending request"
            );

            let attempt = self.transmit(&spec, &url, &headers).await;
            match attempt {
                Ok(raw) if raw.status.is_success() => return self.on_success(raw, &ctx),
                attempt => match self.on_failure(attempt, &mut ctx).await? {
                    Recovery::Retransmit => {}
                    Recovery::Reauthorize(token) => {
                        let value = bearer(&token).map_err(|e| {
                            ApiError::invalid_request(
                                &ctx.request_id,
                                format!("Invalid access token: {e}"),
                            )
                        })?;
                        headers.insert(AUTHORIZATION, value);
                    }
                },
            }
        }
    }

    fn resolve_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Outbound pipeline, run once per request
    async fn prepare_headers(&self, spec: &RequestSpec, ctx: &RequestContext) -> Result<HeaderMap> {
        let invalid = |message: String| ApiError::invalid_request(&ctx.request_id, message);

        let session = self
            .store
            .load()
            .await
            .map_err(|e| invalid(format!("Failed to read session: {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static(REQUEST_ID_HEADER),
            HeaderValue::from_str(&ctx.request_id)
                .map_err(|e| invalid(format!("Invalid request id: {e}")))?,
        );

        let locale = session
            .locale
            .as_deref()
            .filter(|l| !l.is_empty())
            .unwrap_or(&self.default_locale);
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(locale).map_err(|e| invalid(format!("Invalid locale: {e}")))?,
        );

        if let Some(token) = session.access_token.as_deref().filter(|t| !t.is_empty()) {
            let value = bearer(token).map_err(|e| invalid(format!("Invalid access token: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        for (name, value) in &spec.headers {
            headers.insert(name.clone(), value.clone());
        }

        Ok(headers)
    }

    async fn transmit(
        &self,
        spec: &RequestSpec,
        url: &str,
        headers: &HeaderMap,
    ) -> std::result::Result<RawResponse, reqwest::Error> {
        let mut request = self
            .http_client
            .request(spec.method.clone(), url)
            .headers(headers.clone());
        if !spec.query.is_empty() {
            request = request.query(&spec.query);
        }
        if let Some(body) = &spec.body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.bytes().await?;

        Ok(RawResponse {
            status,
            headers,
            body: parse_body(&bytes),
        })
    }

    /// Inbound pipeline for 2xx responses
    fn on_success(&self, raw: RawResponse, ctx: &RequestContext) -> Result<ApiResponse> {
        debug!(
            request_id = %ctx.request_id,
            status = raw.status.as_u16(),
            elapsed_ms = ctx.elapsed().as_millis() as u64,
            "Received response"
        );

        match Envelope::classify(&raw.body) {
            Envelope::Legacy(env) if !env.is_ok(&self.legacy_ok_code) => {
                return Err(self.reject_application(
                    raw.status,
                    Some(env.code),
                    env.message,
                    false,
                    raw.body,
                    ctx,
                ));
            }
            Envelope::Standard(env) if !env.success => {
                return Err(self.reject_application(
                    raw.status,
                    env.code,
                    env.message,
                    env.skip_toast,
                    raw.body,
                    ctx,
                ));
            }
            _ => {}
        }

        let mut body = raw.body;
        normalize_null_strings(&mut body);

        Ok(ApiResponse {
            status: raw.status,
            headers: raw.headers,
            request_id: ctx.request_id.clone(),
            body,
        })
    }

    /// Inbound pipeline for non-2xx responses and transport errors
    async fn on_failure(
        &self,
        attempt: std::result::Result<RawResponse, reqwest::Error>,
        ctx: &mut RequestContext,
    ) -> Result<Recovery> {
        let raw = match attempt {
            Ok(raw) => raw,
            Err(err) => {
                debug!(request_id = %ctx.request_id, error = %err, "Request failed without a response");
                if self.backoff(ctx).await {
                    return Ok(Recovery::Retransmit);
                }
                return Err(self.reject_terminal(
                    None,
                    Value::Null,
                    ErrorCause::Transport(err),
                    ctx,
                ));
            }
        };

        debug!(
            request_id = %ctx.request_id,
            status = raw.status.as_u16(),
            body = %raw.body,
            "Request failed"
        );

        // A structured envelope wins over the 401 and retry paths, whatever the status.
        if let Envelope::Standard(env) = Envelope::classify(&raw.body) {
            return Err(self.reject_application(
                raw.status,
                env.code,
                env.message,
                env.skip_toast,
                raw.body,
                ctx,
            ));
        }

        if raw.status == StatusCode::UNAUTHORIZED && !ctx.is_retry {
            ctx.is_retry = true;
            return match self.coordinator.run(|| self.refresh_session()).await {
                Ok(token) => Ok(Recovery::Reauthorize(token)),
                Err(err) => Err(ApiError::refresh_failed(&ctx.request_id, err)),
            };
        }

        if raw.status.is_server_error() && self.backoff(ctx).await {
            return Ok(Recovery::Retransmit);
        }

        let status = raw.status;
        let cause = ErrorCause::Status {
            status: status.as_u16(),
            body: raw.body.clone(),
        };
        Err(self.reject_terminal(Some(status), raw.body, cause, ctx))
    }

    /// Wait out the next backoff step; false once the retry budget is spent
    async fn backoff(&self, ctx: &mut RequestContext) -> bool {
        match self.retry.next_delay(ctx) {
            Some(delay) => {
                debug!(
                    request_id = %ctx.request_id,
                    retry_count = ctx.retry_count,
                    delay_ms = delay.as_millis() as u64,
                    "Retrying after transient failure"
                );
                tokio::time::sleep(delay).await;
                true
            }
            None => false,
        }
    }

    /// Leader side of the refresh: mint and persist a new pair, or end the session
    async fn refresh_session(&self) -> RefreshOutcome {
        match self.exchange_refresh_token().await {
            Ok(tokens) => {
                info!("Access token refreshed");
                Ok(tokens.access_token)
            }
            Err(err) => {
                warn!(error = %err, "Token refresh failed, ending session");
                if let Err(e) = self.store.clear().await {
                    warn!(error = %e, "Failed to clear stored session");
                }
                self.schedule_logout(LogoutReason::RefreshFailed);
                Err(Arc::new(err))
            }
        }
    }

    async fn exchange_refresh_token(&self) -> AuthResult<TokenPair> {
        let refresh_token = self
            .store
            .load()
            .await?
            .refresh_token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingRefreshToken)?;
        let tokens = self.refresher.refresh(&refresh_token).await?;
        self.store.store_tokens(&tokens).await?;
        Ok(tokens)
    }

    fn schedule_logout(&self, reason: LogoutReason) {
        schedule_logout(
            Arc::clone(&self.store),
            Arc::clone(&self.terminator),
            reason,
            self.logout_delay,
        );
    }

    fn is_invalid_session(&self, message: &str) -> bool {
        let message = message.to_lowercase();
        self.invalid_session_markers
            .iter()
            .any(|marker| !marker.is_empty() && message.contains(&marker.to_lowercase()))
    }

    /// Error for a payload that reported failure through its envelope
    fn reject_application(
        &self,
        status: StatusCode,
        code: Option<String>,
        message: Option<String>,
        skip_toast: bool,
        body: Value,
        ctx: &RequestContext,
    ) -> ApiError {
        let code = format!(
            "ERROR_{}",
            code.unwrap_or_else(|| status.as_u16().to_string())
        );
        let message = message.unwrap_or_else(|| "Request failed".to_string());

        let kind = if self.is_invalid_session(&message) {
            warn!(request_id = %ctx.request_id, "Server reported an invalid session");
            self.schedule_logout(LogoutReason::InvalidSession);
            ErrorKind::InvalidSession
        } else {
            if !skip_toast {
                self.notify(&code, &message, ctx);
            }
            ErrorKind::Application
        };

        ApiError::new(
            kind,
            Some(status.as_u16()),
            code,
            message,
            &ctx.request_id,
            Some(ErrorCause::Envelope { body }),
        )
    }

    /// Error for a failure that exhausted every recovery path
    fn reject_terminal(
        &self,
        status: Option<StatusCode>,
        body: Value,
        cause: ErrorCause,
        ctx: &RequestContext,
    ) -> ApiError {
        let fragment = body.as_object();
        let server_code = fragment
            .and_then(|obj| obj.get("code").or_else(|| obj.get("rc")))
            .and_then(envelope::server_code);
        let server_message = fragment.and_then(envelope::message_of);

        let (kind, code, fallback) = match status {
            None => (
                ErrorKind::Transient,
                SERVER_ERROR_CODE.to_string(),
                "Unable to reach the server, please try again later".to_string(),
            ),
            Some(s) if s.is_server_error() => (
                ErrorKind::Transient,
                SERVER_ERROR_CODE.to_string(),
                "Server error, please try again later".to_string(),
            ),
            Some(s) => (
                ErrorKind::Terminal,
                format!(
                    "error.{}",
                    server_code.unwrap_or_else(|| s.as_u16().to_string())
                ),
                format!("Request failed with status {}", s.as_u16()),
            ),
        };
        let message = server_message.unwrap_or(fallback);

        if kind == ErrorKind::Transient {
            self.notify(&code, &message, ctx);
        }

        ApiError::new(
            kind,
            status.map(|s| s.as_u16()),
            code,
            message,
            &ctx.request_id,
            Some(cause),
        )
    }

    fn notify(&self, code: &str, message: &str, ctx: &RequestContext) {
        self.notifier.notify(&Notice {
            message: message.to_string(),
            code: code.to_string(),
            request_id: ctx.request_id.clone(),
        });
    }
}

fn bearer(token: &str) -> std::result::Result<HeaderValue, reqwest::header::InvalidHeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token))?;
    value.set_sensitive(true);
    Ok(value)
}

fn parse_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

/// Builder for constructing a StorefrontClient with custom configuration
#[derive(Default)]
pub struct ClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    default_locale: Option<String>,
    refresh_path: Option<String>,
    legacy_ok_code: Option<String>,
    invalid_session_markers: Option<Vec<String>>,
    logout_delay: Option<Duration>,
    retry: Option<RetryPolicy>,
    store: Option<Arc<dyn SessionStore>>,
    refresher: Option<Arc<dyn TokenRefresher>>,
    coordinator: Option<Arc<RefreshCoordinator>>,
    notifier: Option<Arc<dyn Notifier>>,
    terminator: Option<Arc<dyn SessionTerminator>>,
}

impl ClientBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pre-filled from a loaded configuration
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::default()
            .base_url(config.base_url.clone())
            .timeout(config.timeout())
            .default_locale(config.default_locale.clone())
            .refresh_path(config.refresh_path.clone())
            .legacy_ok_code(config.legacy_ok_code.clone())
            .invalid_session_markers(config.invalid_session_markers.clone())
            .logout_delay(config.logout_delay())
            .retry_policy(config.retry.clone())
    }

    /// Set the base URL for the API
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Locale sent when the store has no preference
    pub fn default_locale(mut self, locale: impl Into<String>) -> Self {
        self.default_locale = Some(locale.into());
        self
    }

    /// Refresh endpoint relative to the base URL
    pub fn refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = Some(path.into());
        self
    }

    /// Legacy envelope code that means success
    pub fn legacy_ok_code(mut self, code: impl Into<String>) -> Self {
        self.legacy_ok_code = Some(code.into());
        self
    }

    /// Message fragments that mark a session as invalid
    pub fn invalid_session_markers(mut self, markers: Vec<String>) -> Self {
        self.invalid_session_markers = Some(markers);
        self
    }

    /// Delay before a forced logout takes effect
    pub fn logout_delay(mut self, delay: Duration) -> Self {
        self.logout_delay = Some(delay);
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    /// Use an in-memory session seeded with both tokens
    pub fn with_tokens(
        mut self,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        self.store = Some(Arc::new(MemorySessionStore::with_tokens(
            access_token,
            refresh_token,
        )));
        self
    }

    /// Persist the session in a JSON file
    pub fn with_file_store(mut self, path: impl Into<PathBuf>) -> Self {
        self.store = Some(Arc::new(FileSessionStore::new(path)));
        self
    }

    pub fn session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Replace the HTTP refresh endpoint client
    pub fn token_refresher(mut self, refresher: Arc<dyn TokenRefresher>) -> Self {
        self.refresher = Some(refresher);
        self
    }

    /// Share single-flight refresh state with other clients
    pub fn refresh_coordinator(mut self, coordinator: Arc<RefreshCoordinator>) -> Self {
        self.coordinator = Some(coordinator);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn session_terminator(mut self, terminator: Arc<dyn SessionTerminator>) -> Self {
        self.terminator = Some(terminator);
        self
    }

    /// Build the client
    pub fn build(self) -> std::result::Result<StorefrontClient, ClientError> {
        let base_url = self
            .base_url
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ClientError::Config("base URL must not be empty".into()))?;
        Url::parse(&base_url)
            .map_err(|e| ClientError::Config(format!("invalid base URL '{base_url}': {e}")))?;

        let timeout = self
            .timeout
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        let mut http_builder = reqwest::Client::builder().timeout(timeout);
        if let Some(connect_timeout) = self.connect_timeout {
            http_builder = http_builder.connect_timeout(connect_timeout);
        }
        let http_client = http_builder.build()?;

        let refresher = match self.refresher {
            Some(refresher) => refresher,
            None => {
                let refresh_path = self
                    .refresh_path
                    .unwrap_or_else(|| DEFAULT_REFRESH_PATH.to_string());
                let endpoint = format!("{}/{}", base_url, refresh_path.trim_start_matches('/'));
                let refresher = HttpTokenRefresher::new(http_client.clone(), endpoint);
                debug!(endpoint = refresher.endpoint(), "Using HTTP token refresher");
                Arc::new(refresher)
            }
        };

        Ok(StorefrontClient {
            http_client,
            base_url,
            store: self
                .store
                .unwrap_or_else(|| Arc::new(MemorySessionStore::new())),
            refresher,
            coordinator: self.coordinator.unwrap_or_default(),
            notifier: self.notifier.unwrap_or_else(|| Arc::new(TracingNotifier)),
            terminator: self
                .terminator
                .unwrap_or_else(|| Arc::new(TracingSessionTerminator)),
            retry: self.retry.unwrap_or_default(),
            default_locale: self
                .default_locale
                .unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
            legacy_ok_code: self
                .legacy_ok_code
                .unwrap_or_else(|| LEGACY_OK_CODE.to_string()),
            invalid_session_markers: self
                .invalid_session_markers
                .unwrap_or_else(|| ClientConfig::default().invalid_session_markers),
            logout_delay: self
                .logout_delay
                .unwrap_or(Duration::from_millis(DEFAULT_LOGOUT_DELAY_MS)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_requires_base_url() {
        let result = ClientBuilder::default().build();
        assert!(matches!(result.unwrap_err(), ClientError::Config(_)));

        let result = ClientBuilder::default().base_url("   ").build();
        assert!(matches!(result.unwrap_err(), ClientError::Config(_)));
    }

    #[test]
    fn test_builder_rejects_unparsable_url() {
        let result = ClientBuilder::default().base_url("not a url").build();
        assert!(matches!(result.unwrap_err(), ClientError::Config(_)));
    }

    #[test]
    fn test_builder_with_all_options() {
        let client = ClientBuilder::default()
            .base_url("https://shop.example.com/api/")
            .with_tokens("test-token", "refresh-token")
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .default_locale("en")
            .retry_policy(RetryPolicy::disabled())
            .build()
            .unwrap();

        assert_eq!(client.base_url(), "https://shop.example.com/api");
        assert_eq!(client.default_locale, "en");
        assert_eq!(client.retry.max_retries, 0);
    }

    #[test]
    fn test_builder_from_config() {
        let config = ClientConfig {
            base_url: "https://shop.example.com".into(),
            legacy_ok_code: "200".into(),
            ..ClientConfig::default()
        };
        let client = ClientBuilder::from_config(&config).build().unwrap();
        assert_eq!(client.legacy_ok_code, "200");
        assert_eq!(client.retry, RetryPolicy::default());
    }

    #[test]
    fn test_resolve_url() {
        let client = ClientBuilder::default()
            .base_url("https://shop.example.com/api")
            .build()
            .unwrap();
        assert_eq!(
            client.resolve_url("/products"),
            "https://shop.example.com/api/products"
        );
        assert_eq!(
            client.resolve_url("orders/7"),
            "https://shop.example.com/api/orders/7"
        );
        assert_eq!(
            client.resolve_url("https://cdn.example.com/x"),
            "https://cdn.example.com/x"
        );
    }

    #[test]
    fn test_invalid_session_markers_are_case_insensitive() {
        let client = ClientBuilder::default()
            .base_url("https://shop.example.com")
            .invalid_session_markers(vec!["Invalid Session".into(), String::new()])
            .build()
            .unwrap();
        assert!(client.is_invalid_session("ERR: invalid session, please log in"));
        assert!(!client.is_invalid_session("Out of stock"));
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(b""), Value::Null);
        assert_eq!(parse_body(b"  \n"), Value::Null);
        assert_eq!(parse_body(br#"{"a":1}"#), json!({ "a": 1 }));
        assert_eq!(parse_body(b"Bad Gateway"), json!("Bad Gateway"));
    }
}
