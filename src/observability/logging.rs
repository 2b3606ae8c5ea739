//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber for binaries using this crate
//! - Default filter keeps the wrapper quiet unless asked
//!
//! Library code only emits events; installing a subscriber is the host
//! application's call. The probe CLI uses [`init`].

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber. `RUST_LOG` wins when set.
pub fn init() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sdk_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
