//! Tracing subscriber setup shared by the binaries.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Map a `-v` count to a filter directive.
///
/// Zero falls back to the configured level.
pub fn filter_for(verbose: u8, config: &LoggingConfig) -> String {
    match verbose {
        0 => config.level.clone(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the flags.
///
/// Calling this twice is harmless; the second call is ignored.
pub fn init_tracing(verbose: u8, config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_for(verbose, config)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
