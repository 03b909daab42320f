use crate::error::Result;
use tracing_error::ErrorLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber: fmt output filtered by `RUST_LOG`, plus the
/// ErrorLayer that lets errors capture span traces.
pub fn init_tracing() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(env_filter())
        .with(ErrorLayer::default())
        .try_init()
        .map_err(|e| crate::err!("failed to install tracing subscriber: {}", e))
}

/// Like [`init_tracing`], but a no-op when a subscriber is already installed.
pub fn try_init_tracing() {
    let _ = init_tracing();
}
