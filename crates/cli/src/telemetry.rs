//! Diagnostic logging setup
//!
//! Diagnostics go to stderr; stdout is reserved for command output. A worker's
//! stderr is its probe log, so anything logged there lands next to the
//! engine's own event lines.

use std::io::IsTerminal;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global subscriber
///
/// # Environment Variables
///
/// - `RUST_LOG`: filter directives (default: `hypnos=warn`, or `hypnos=debug` with `--verbose`)
/// - `HYPNOS_LOG_FORMAT`: `json` for structured lines, anything else for pretty output
pub fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "hypnos=debug"
    } else {
        "hypnos=warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let log_format = std::env::var("HYPNOS_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());
    // a worker's stderr is its probe log file
    let ansi = std::io::stderr().is_terminal();

    // try_init: a second initialization (tests) is not an error worth dying for
    let _ = match log_format.as_str() {
        "json" => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
            .try_init(),
        _ => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_ansi(ansi).with_writer(std::io::stderr))
            .try_init(),
    };
}
