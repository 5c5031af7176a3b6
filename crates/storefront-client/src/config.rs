//! Client configuration
//!
//! Layered with figment: built-in defaults, then an optional TOML file, then
//! `STOREFRONT_`-prefixed environment variables. Nested keys use a double
//! underscore, e.g. `STOREFRONT_RETRY__MAX_RETRIES=3`.

use crate::error::ClientError;
use crate::retry::RetryPolicy;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use storefront_common::{DEFAULT_LOCALE, DEFAULT_REFRESH_PATH, ENV_PREFIX, LEGACY_OK_CODE};

/// Default timeout in seconds for API requests
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default delay before a forced logout takes effect
pub const DEFAULT_LOGOUT_DELAY_MS: u64 = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the storefront API, required
    pub base_url: String,
    /// Transport timeout applied to every request
    pub timeout_secs: u64,
    /// `accept-language` used when the user has no stored preference
    pub default_locale: String,
    /// Refresh endpoint, relative to `base_url`
    pub refresh_path: String,
    /// Legacy envelope code meaning success
    pub legacy_ok_code: String,
    /// Message fragments (case-insensitive) that mark a session as invalid
    pub invalid_session_markers: Vec<String>,
    /// Delay before a forced logout clears the session
    pub logout_delay_ms: u64,
    /// Transient-failure retry budget
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            default_locale: DEFAULT_LOCALE.to_string(),
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
            legacy_ok_code: LEGACY_OK_CODE.to_string(),
            invalid_session_markers: vec!["invalid session".to_string()],
            logout_delay_ms: DEFAULT_LOGOUT_DELAY_MS,
            retry: RetryPolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Load configuration, merging `path` when it exists
    pub fn load(path: Option<&Path>) -> Result<Self, ClientError> {
        let mut figment = Figment::from(Serialized::defaults(ClientConfig::default()));

        if let Some(path) = path {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        figment
            .extract()
            .map_err(|e| ClientError::Config(e.to_string()))
    }

    /// Load configuration from defaults and the environment only
    pub fn from_env() -> Result<Self, ClientError> {
        Self::load(None)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn logout_delay(&self) -> Duration {
        Duration::from_millis(self.logout_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use std::path::PathBuf;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.default_locale, "vi");
        assert_eq!(config.retry.max_retries, 2);
        assert_eq!(config.retry.window_ms, 2_000);
        assert_eq!(config.retry.backoff_step_ms, 300);
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_toml_file_then_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "storefront.toml",
                r#"
                    base_url = "https://shop.example.com/api"
                    timeout_secs = 10

                    [retry]
                    max_retries = 4
                "#,
            )?;
            jail.set_env("STOREFRONT_DEFAULT_LOCALE", "en");
            jail.set_env("STOREFRONT_RETRY__BACKOFF_STEP_MS", "50");

            let config = ClientConfig::load(Some(&PathBuf::from("storefront.toml")))
                .map_err(|e| e.to_string())?;

            assert_eq!(config.base_url, "https://shop.example.com/api");
            assert_eq!(config.timeout_secs, 10);
            assert_eq!(config.default_locale, "en");
            assert_eq!(config.retry.max_retries, 4);
            assert_eq!(config.retry.backoff_step_ms, 50);
            assert_eq!(config.retry.window_ms, 2_000);
            Ok(())
        });
    }

    #[test]
    fn test_from_env_reads_prefixed_variables() {
        Jail::expect_with(|jail| {
            jail.set_env("STOREFRONT_BASE_URL", "https://env.example.com");
            jail.set_env("STOREFRONT_RETRY__MAX_RETRIES", "0");

            let config = ClientConfig::from_env().map_err(|e| e.to_string())?;
            assert_eq!(config.base_url, "https://env.example.com");
            assert_eq!(config.retry.max_retries, 0);
            assert_eq!(config.default_locale, "vi");
            Ok(())
        });
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        Jail::expect_with(|_jail| {
            let config = ClientConfig::load(Some(&PathBuf::from("absent.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config, ClientConfig::default());
            Ok(())
        });
    }
}
