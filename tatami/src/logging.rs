use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs the global tracing subscriber. `RUST_LOG` overrides the
/// default `info` level.
pub fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
