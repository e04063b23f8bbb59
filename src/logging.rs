// src/logging.rs
use anyhow::{Result, anyhow};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Console logging to stderr. `RUST_LOG` wins over the configured level.
pub fn init_logging(level: &str) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(format!("taxi_optimizer={},warn", level))
            .map_err(|e| anyhow!("Invalid log level '{}': {}", level, e))?,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))
}
