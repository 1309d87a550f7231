//! Logging setup for the command line tool.
//!
//! Installs a global `tracing` fmt subscriber writing to stderr, so stdout
//! carries only the run summary. `RUST_LOG` takes precedence; otherwise the
//! level is `info`, or `debug` with `--verbose`.

use crate::CliError;
use tracing_subscriber::EnvFilter;

/// Build the filter from `RUST_LOG`, falling back to the default level.
pub fn build_env_filter(verbose: bool) -> Result<EnvFilter, CliError> {
    let default_level = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| CliError::Logging(format!("invalid log filter: {}", e)))
}

/// Install the global subscriber.
pub fn init(verbose: bool) -> Result<(), CliError> {
    let filter = build_env_filter(verbose)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| CliError::Logging(format!("cannot install subscriber: {}", e)))
}
