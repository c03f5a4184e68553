//! Tracing subscriber bootstrap for applications embedding the library.
//!
//! Library code only emits events through `tracing`; installing a
//! subscriber is left to the host process.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogLevel;

/// Installs a formatted subscriber filtered at `level`.
///
/// `RUST_LOG` takes precedence over `level` when set. Returns false if a
/// global subscriber was already installed, which is not an error.
pub fn init_tracing(level: LogLevel) -> bool {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.as_filter_str())),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}
