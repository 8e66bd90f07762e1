//! Tracing setup shared by the catsay binaries.
//!
//! Diagnostics go to stderr and are filtered through `RUST_LOG`. They are not
//! part of any HTTP response.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Directive used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_DIRECTIVES: &str = "catsay=info,catsay_server=info,tower_http=info";

/// Initialize the global tracing subscriber.
///
/// # Example
/// ```bash
/// RUST_LOG=catsay=debug catsay-server --port 8001
/// ```
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
