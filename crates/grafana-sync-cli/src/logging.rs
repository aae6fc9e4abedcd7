use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Log level for a `-v` count: none → error, `-v` → warn, `-vv` → info,
/// more → debug.
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "error",
        1 => "warn",
        2 => "info",
        _ => "debug",
    }
}

/// Install the global subscriber on stderr. `RUST_LOG` wins over `-v`.
pub fn init(verbosity: u8) {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_for(verbosity)));

    tracing_subscriber::registry().with(layer).with(filter).init();
}
