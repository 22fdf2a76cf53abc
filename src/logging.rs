//! Tracing subscriber setup shared by every subcommand.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "finboard=info,tower_http=info";
const VERBOSE_FILTER: &str = "finboard=debug,tower_http=debug";

/// Install the global subscriber. `RUST_LOG` wins over `verbose` when set.
///
/// Logs go to stderr so that JSON and CSV output on stdout stays clean.
pub fn init_tracing(verbose: bool) {
    let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    // A second call (e.g. from tests) leaves the first subscriber in place.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
