//! Authentication module for the storefront client
//!
//! - Session storage for the access/refresh token pair
//! - Refresh-endpoint client
//! - Single-flight coordination of concurrent refreshes

pub mod coordinator;
pub mod refresh;
pub mod store;
pub mod types;

pub use coordinator::{RefreshCoordinator, RefreshOutcome};
pub use refresh::{HttpTokenRefresher, TokenRefresher};
pub use store::{default_session_path, FileSessionStore, MemorySessionStore, SessionStore};
pub use types::{AuthError, AuthResult, StoredSession, TokenPair};
