//! CLI entry point for the stanza splitter.

use stanza_splitter::cli;
use tracing_subscriber::EnvFilter;

fn main() {
    // WARN level by default, respecting RUST_LOG; stdout is left for the summary
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    if let Err(e) = cli::run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
