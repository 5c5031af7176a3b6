//! Persistent session storage
//!
//! A session store is a small key-value document holding the token pair, the
//! user's locale preference and the serialized application state. The client
//! reads it on every request and rewrites the token pair after a refresh.

use super::types::{AuthError, AuthResult, StoredSession, TokenPair};
use async_trait::async_trait;
use etcetera::{choose_base_strategy, BaseStrategy};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use storefront_common::{ACCESS_TOKEN_KEY, APP_STATE_KEY, LOCALE_KEY, REFRESH_TOKEN_KEY};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

/// Storage backend for session credentials
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Read the current session
    async fn load(&self) -> AuthResult<StoredSession>;

    /// Replace both tokens in one write
    async fn store_tokens(&self, tokens: &TokenPair) -> AuthResult<()>;

    /// Persist the user's locale preference
    async fn set_locale(&self, locale: &str) -> AuthResult<()>;

    /// Remove the tokens and the application state
    ///
    /// The locale preference survives a logout.
    async fn clear(&self) -> AuthResult<()>;
}

/// In-process session store
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: RwLock<StoredSession>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a token pair
    pub fn with_tokens(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self::from_session(StoredSession {
            access_token: Some(access_token.into()),
            refresh_token: Some(refresh_token.into()),
            ..StoredSession::default()
        })
    }

    pub fn from_session(session: StoredSession) -> Self {
        Self {
            session: RwLock::new(session),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> AuthResult<StoredSession> {
        Ok(self.session.read().await.clone())
    }

    async fn store_tokens(&self, tokens: &TokenPair) -> AuthResult<()> {
        let mut session = self.session.write().await;
        session.access_token = Some(tokens.access_token.clone());
        session.refresh_token = Some(tokens.refresh_token.clone());
        Ok(())
    }

    async fn set_locale(&self, locale: &str) -> AuthResult<()> {
        self.session.write().await.locale = Some(locale.to_string());
        Ok(())
    }

    async fn clear(&self) -> AuthResult<()> {
        let mut session = self.session.write().await;
        session.access_token = None;
        session.refresh_token = None;
        session.app_state = None;
        Ok(())
    }
}

/// Session store backed by a JSON document on disk
///
/// Writes go to a sibling temp file that is renamed over the document, so a
/// reader sees either the old token pair or the new one, never a mix.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Store at the platform default location
    pub fn open_default() -> AuthResult<Self> {
        Ok(Self::new(default_session_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> AuthResult<Map<String, Value>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(Map::new()),
            Ok(content) => match serde_json::from_str::<Value>(&content)? {
                Value::Object(map) => Ok(map),
                _ => Err(AuthError::StorageError(format!(
                    "{} does not contain a JSON object",
                    self.path.display()
                ))),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Session file not found at {}", self.path.display());
                Ok(Map::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn write_document(&self, document: &Map<String, Value>) -> AuthResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(document)?;
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, content).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }

    async fn update<F>(&self, mutate: F) -> AuthResult<()>
    where
        F: FnOnce(&mut Map<String, Value>) + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document().await?;
        mutate(&mut document);
        self.write_document(&document).await
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> AuthResult<StoredSession> {
        let document = self.read_document().await?;
        let text = |key: &str| {
            document
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Ok(StoredSession {
            access_token: text(ACCESS_TOKEN_KEY),
            refresh_token: text(REFRESH_TOKEN_KEY),
            locale: text(LOCALE_KEY),
            app_state: document.get(APP_STATE_KEY).cloned(),
        })
    }

    async fn store_tokens(&self, tokens: &TokenPair) -> AuthResult<()> {
        self.update(|document| {
            document.insert(
                ACCESS_TOKEN_KEY.to_string(),
                Value::String(tokens.access_token.clone()),
            );
            document.insert(
                REFRESH_TOKEN_KEY.to_string(),
                Value::String(tokens.refresh_token.clone()),
            );
        })
        .await?;
        debug!("Stored new token pair in {}", self.path.display());
        Ok(())
    }

    async fn set_locale(&self, locale: &str) -> AuthResult<()> {
        self.update(|document| {
            document.insert(LOCALE_KEY.to_string(), Value::String(locale.to_string()));
        })
        .await
    }

    async fn clear(&self) -> AuthResult<()> {
        self.update(|document| {
            for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, APP_STATE_KEY] {
                document.remove(key);
            }
        })
        .await?;
        debug!("Cleared session in {}", self.path.display());
        Ok(())
    }
}

/// Default location of the session document
/// (e.g. ~/.local/share/storefront/session.json on Linux)
pub fn default_session_path() -> AuthResult<PathBuf> {
    let strategy = choose_base_strategy().map_err(|e| {
        AuthError::StorageError(format!("Failed to determine base directories: {}", e))
    })?;

    Ok(strategy.data_dir().join("storefront").join("session.json"))
}
