//! Logging bootstrap.
//!
//! Log lines go to stderr so summaries on stdout stay machine-readable.
//! `RUST_LOG` overrides the level chosen by the `--debug` flag.

use tracing_subscriber::EnvFilter;

pub fn init(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
