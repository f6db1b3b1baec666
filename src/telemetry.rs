use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber for structured logging.
///
/// `RUST_LOG` takes precedence over the built-in defaults.
pub fn init_tracing() -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                // More verbose in debug mode
                "authbridge=debug,warn".into()
            } else {
                "authbridge=info,warn".into()
            }
        }))
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()
}
