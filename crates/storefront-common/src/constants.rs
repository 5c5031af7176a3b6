//! Wire and storage constants shared by the client library and the CLI
//!
//! These mirror what the storefront backend and the browser client agree on,
//! so they are compiled in rather than configured.

/// Header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Locale sent when the user has not picked one
pub const DEFAULT_LOCALE: &str = "vi";

/// Storage key of the access token
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Storage key of the refresh token
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Storage key of the user's locale preference
pub const LOCALE_KEY: &str = "locale";

/// Storage key of the serialized application state, wiped on logout
pub const APP_STATE_KEY: &str = "persist:root";

/// Default refresh endpoint, relative to the API base URL
pub const DEFAULT_REFRESH_PATH: &str = "/auth/refresh-token";

/// Code a legacy `{ rc, rs }` envelope uses to signal success
pub const LEGACY_OK_CODE: &str = "0";

/// Classifier for 5xx responses and requests that never got a response
pub const SERVER_ERROR_CODE: &str = "error.errorServer";

/// Environment prefix for configuration overrides
pub const ENV_PREFIX: &str = "STOREFRONT_";
