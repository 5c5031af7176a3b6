//! Configuration handlers

use crate::cli::ConfigAction;
use crate::error::{CliError, Result};
use color_eyre::eyre::eyre;
use console::style;
use storefront_client::ClientConfig;

/// Handle configuration subcommands
pub fn handle_config(action: ConfigAction, config: &ClientConfig) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("{}", style("Effective configuration:").bold());
            println!();
            println!("{}", render_config(config)?);
            Ok(())
        }
    }
}

/// Render the configuration as TOML
pub fn render_config(config: &ClientConfig) -> Result<String> {
    toml::to_string_pretty(config)
        .map_err(|e| CliError::Internal(eyre!("Failed to render configuration: {}", e)))
}
