//! Logging configuration for insight.
//!
//! Logs always go to stderr so that reports on stdout stay machine-readable
//! (JSON output can be piped while diagnostics remain visible).

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "warn";

/// Filter used with `--verbose`.
const VERBOSE_FILTER: &str = "warn,superstore_insight=debug";

/// Initializes stderr logging.
///
/// `RUST_LOG` takes precedence over the `verbose` flag.
pub fn init_stderr_logging(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose))),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Returns the filter directive applied when `RUST_LOG` is unset.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_FILTER
    } else {
        DEFAULT_FILTER
    }
}
