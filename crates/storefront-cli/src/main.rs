//! Main entry point for the storefront CLI

use clap::Parser;
use clap_verbosity_flag::LevelFilter;
use color_eyre::eyre::{eyre, Result};
use storefront_cli::cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Keep reports short: no file paths or env hints
    color_eyre::config::HookBuilder::default()
        .display_location_section(false)
        .display_env_section(false)
        .install()?;

    match args.verbosity.log_level_filter() {
        LevelFilter::Off | LevelFilter::Error => {}
        _ => {
            std::env::set_var("RUST_LIB_BACKTRACE", "1");
        }
    }

    let binary_name = env!("CARGO_BIN_NAME").replace('-', "_");
    let default_filter = format!("{binary_name}=warn,storefront_client=warn");
    storefront_common::logging::init_cli_logging(&args.verbosity, &default_filter)
        .map_err(|e| eyre!("Failed to initialize logging: {}", e))?;

    Ok(args.run().await?)
}
