use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Sends tracing output to stderr so it never mixes with rendered results.
/// `RUST_LOG` wins over the configured level; `verbose` forces debug.
pub fn init_logging(configured_level: Option<&str>, verbose: bool) {
    let level = if verbose {
        "debug"
    } else {
        configured_level.unwrap_or("warn")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();
}
