//! Logging and tracing setup

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging to stderr, keeping stdout for the fixtures table.
///
/// `RUST_LOG` wins over `default_level` when set.
pub fn initialize_logging(default_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    // A second initialization (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::registry().with(env_filter).with(fmt_layer).try_init();
}
