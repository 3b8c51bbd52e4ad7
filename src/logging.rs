// src/logging.rs
// =============================================================================
// Sets up `tracing` output for the CLI.
//
// Logs go to stderr so that `--json` output on stdout stays parseable.
// RUST_LOG wins when set; otherwise we log at info (or debug with -v).
// =============================================================================

use tracing_subscriber::EnvFilter;

pub fn init(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
