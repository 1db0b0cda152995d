use std::io::IsTerminal;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Log to stderr, filtered by `RUST_LOG` when it is set.
///
/// Without `RUST_LOG` the level is INFO, or TRACE with `verbose`, which includes every payload
/// offset the reader and writer compute. The library crates log through `log`, and the
/// subscriber installs a bridge for those records.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::TRACE
    } else {
        LevelFilter::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}
