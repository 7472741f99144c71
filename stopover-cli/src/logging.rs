//! Log output for the CLI.
//!
//! Engine crates log through the `log` facade; the fmt subscriber installed
//! here also captures those records. Output goes to stderr so stdout stays
//! reserved for replies.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `info` or
/// `stopover_solver=debug`.
pub const LOG_ENV: &str = "STOPOVER_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Install the stderr subscriber. Calling this twice keeps the first one.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("stopover: logging unavailable: {err}");
    }
}
