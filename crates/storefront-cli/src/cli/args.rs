use crate::cli::{commands::Commands, handlers};
use crate::error::Result;
use clap::Parser;
use clap_verbosity_flag::{OffLevel, Verbosity};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use storefront_client::{
    ClientBuilder, ClientConfig, FileSessionStore, NoopNotifier, StorefrontClient,
};
use tracing::debug;

/// sfctl - storefront API client
#[derive(Parser, Debug)]
#[command(
    name = "sfctl",
    author = "Storefront Team",
    version,
    about = "sfctl - authenticated requests against the storefront API",
    long_about = "Command-line front end for the storefront API client.

QUICK START:
  sfctl login --access-token <A> --refresh-token <R>
  sfctl request GET /products --query page=2
  sfctl request POST /cart/items -d '{\"sku\":\"TEA-01\",\"qty\":2}'

SESSION:
  sfctl locale en                   # Change accept-language
  sfctl logout                      # Forget stored tokens

CONFIGURATION:
  sfctl config show                 # Show effective configuration"
)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, global = true, env = "STOREFRONT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the configured API base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Session file path (defaults to the platform data directory)
    #[arg(long, global = true)]
    pub session_file: Option<PathBuf>,

    #[command(flatten)]
    pub verbosity: Verbosity<OffLevel>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Args {
    /// Execute the CLI command
    pub async fn run(self) -> Result<()> {
        let config = self.load_config()?;
        let session_file = self.session_file;
        let connect = || build_client(&config, session_file.as_deref());

        match self.command {
            Commands::Config { action } => handlers::config::handle_config(action, &config),
            Commands::Request {
                method,
                path,
                data,
                query,
                raw,
            } => {
                let client = connect()?;
                handlers::request::handle_request(&client, &method, &path, data, query, raw).await
            }
            Commands::Login {
                access_token,
                refresh_token,
            } => {
                let client = connect()?;
                handlers::session::handle_login(&client, access_token, refresh_token).await
            }
            Commands::Logout => handlers::session::handle_logout(&connect()?).await,
            Commands::Locale { tag } => handlers::session::handle_locale(&connect()?, &tag).await,
        }
    }

    fn load_config(&self) -> Result<ClientConfig> {
        let mut config = ClientConfig::load(self.config.as_deref())?;
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        debug!(base_url = %config.base_url, "Loaded configuration");
        Ok(config)
    }
}

/// Client backed by the session file, or the default one when none is given
///
/// Failures reach the user through the error report, so notices are dropped.
fn build_client(config: &ClientConfig, session_file: Option<&Path>) -> Result<StorefrontClient> {
    let store = match session_file {
        Some(path) => FileSessionStore::new(path),
        None => FileSessionStore::open_default()?,
    };
    debug!(path = %store.path().display(), "Using session file");

    Ok(ClientBuilder::from_config(config)
        .session_store(Arc::new(store))
        .notifier(Arc::new(NoopNotifier))
        .build()?)
}
