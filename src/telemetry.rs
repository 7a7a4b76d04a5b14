//! Tracing subscriber setup.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::Environment;

const DEFAULT_FILTER: &str = "address_book=info";

/// Installs the global subscriber.
///
/// `RUST_LOG` overrides the default filter. Production logs are one JSON
/// object per line; development logs are human-readable.
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init(environment: Environment) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());

    let (json, plain) = if environment.is_production() {
        (Some(fmt::layer().json()), None)
    } else {
        (None, Some(fmt::layer()))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(plain)
        .init();
}
