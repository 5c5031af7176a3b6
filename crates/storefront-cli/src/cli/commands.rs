use clap::Subcommand;

/// Main CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send a request through the authenticated client
    Request {
        /// HTTP method (GET, POST, PUT, PATCH, DELETE)
        method: String,

        /// Path relative to the base URL, or an absolute URL
        path: String,

        /// JSON request body
        #[arg(short, long)]
        data: Option<String>,

        /// Query parameter as key=value, repeatable
        #[arg(long = "query", value_name = "KEY=VALUE")]
        query: Vec<String>,

        /// Print only the response body
        #[arg(long)]
        raw: bool,
    },

    /// Store a token pair obtained elsewhere
    Login {
        /// Access token sent as Bearer credential
        #[arg(long)]
        access_token: String,

        /// Refresh token used to mint new access tokens
        #[arg(long)]
        refresh_token: String,
    },

    /// Clear the stored session
    Logout,

    /// Set the preferred response language
    Locale {
        /// Language tag sent as accept-language, e.g. "vi" or "en-US"
        tag: String,
    },

    /// Inspect CLI configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,
}
