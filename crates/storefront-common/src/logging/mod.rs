//! Unified logging initialization for storefront binaries
//!
//! Filter priority:
//! 1. CLI flags (`-v/-q`) - highest priority
//! 2. RUST_LOG environment variable
//! 3. Binary-specific defaults - lowest priority

use anyhow::Result;
use clap_verbosity_flag::{LogLevel, Verbosity};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging with the specified verbosity level and default filter.
///
/// # Arguments
///
/// * `verbosity` - The verbosity flags from clap (-v/-q)
/// * `default_filter` - The default filter string if no CLI flags or RUST_LOG are set
///
/// # Example
///
/// ```no_run
/// use clap::Parser;
/// use clap_verbosity_flag::{Verbosity, WarnLevel};
/// use storefront_common::logging;
///
/// #[derive(Parser)]
/// struct Args {
///     #[clap(flatten)]
///     verbosity: Verbosity<WarnLevel>,
/// }
///
/// let args = Args::parse();
/// logging::init_logging(&args.verbosity, "sfctl=warn,storefront_client=warn").unwrap();
/// ```
pub fn init_logging<L: LogLevel>(verbosity: &Verbosity<L>, default_filter: &str) -> Result<()> {
    let filter = build_filter(verbosity, default_filter)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init()?;

    Ok(())
}

/// Initialize logging only when explicitly requested via flags or RUST_LOG
///
/// User-facing tools print their own output on stdout and should stay quiet
/// otherwise.
///
/// # Returns
///
/// * `true` if logging was initialized
/// * `false` if logging was not initialized (no flags and no RUST_LOG)
pub fn init_cli_logging<L: LogLevel>(
    verbosity: &Verbosity<L>,
    default_filter: &str,
) -> Result<bool> {
    if verbosity.log_level().is_some() || std::env::var("RUST_LOG").is_ok() {
        init_logging(verbosity, default_filter)?;
        Ok(true)
    } else {
        Ok(false)
    }
}

fn build_filter<L: LogLevel>(verbosity: &Verbosity<L>, default_filter: &str) -> Result<EnvFilter> {
    let filter = if verbosity.is_present() {
        match verbosity.log_level() {
            Some(level) => EnvFilter::try_new(level.as_str().to_lowercase())?,
            None => EnvFilter::try_new("off")?,
        }
    } else {
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_filter))?
    };
    Ok(filter)
}
