//! User-facing side channels: notifications and forced logout
//!
//! Both are fire-and-forget from the client's point of view. A UI embeds the
//! client by plugging its toast sink and its "go to login" navigation in here;
//! headless consumers get the `tracing` defaults.

use crate::auth::SessionStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Message surfaced to the user for a failed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub code: String,
    pub request_id: String,
}

/// Sink for user-visible error notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}

/// Notifier that reports through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: &Notice) {
        warn!(
            code = %notice.code,
            request_id = %notice.request_id,
            "{}",
            notice.message
        );
    }
}

/// Notifier that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _notice: &Notice) {}
}

/// Why a session was ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutReason {
    /// The server reported the session as invalid
    InvalidSession,
    /// The refresh token could not be exchanged
    RefreshFailed,
    /// The caller asked for it
    UserRequested,
}

impl std::fmt::Display for LogoutReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::InvalidSession => "invalid session",
            Self::RefreshFailed => "token refresh failed",
            Self::UserRequested => "user requested",
        };
        f.write_str(text)
    }
}

/// Invoked after credentials are cleared, e.g. to navigate to a login screen
pub trait SessionTerminator: Send + Sync {
    fn terminate(&self, reason: LogoutReason);
}

/// Terminator that reports through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSessionTerminator;

impl SessionTerminator for TracingSessionTerminator {
    fn terminate(&self, reason: LogoutReason) {
        info!(%reason, "Session ended, sign in again to continue");
    }
}

/// Clear stored credentials, then hand over to the terminator
pub(crate) async fn end_session(
    store: &dyn SessionStore,
    terminator: &dyn SessionTerminator,
    reason: LogoutReason,
) {
    if let Err(e) = store.clear().await {
        warn!(error = %e, "Failed to clear stored session");
    }
    terminator.terminate(reason);
}

/// Run [`end_session`] on a background task after `delay`, so the caller can
/// observe its rejected request before the logout lands.
pub(crate) fn schedule_logout(
    store: Arc<dyn SessionStore>,
    terminator: Arc<dyn SessionTerminator>,
    reason: LogoutReason,
    delay: Duration,
) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        end_session(store.as_ref(), terminator.as_ref(), reason).await;
    });
}
