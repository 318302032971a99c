//! Tracing setup
//!
//! Host applications call this once at startup; `RUST_LOG` overrides the
//! default filter.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snapfeed=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
