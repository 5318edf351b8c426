//! Tracing subscriber setup for the binary

use tracing_subscriber::{fmt, EnvFilter};

/// Install a fmt subscriber filtered by `verbosity`.
///
/// `verbosity` is any `EnvFilter` directive (`info`, `statarb=debug`, ...).
/// `RUST_LOG` takes precedence when set.
pub fn init_tracing(verbosity: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(verbosity))?;
    fmt().with_env_filter(filter).with_target(false).try_init()
}
