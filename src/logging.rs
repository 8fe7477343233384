use anyhow::{Context, Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

pub fn init_tracing(logging_config: &LoggingConfig) -> Result<()> {
    if logging_config.filter.trim().is_empty() {
        return Err(anyhow!("logging.filter cannot be empty"));
    }

    let env_filter = EnvFilter::try_new(&logging_config.filter)
        .with_context(|| format!("invalid logging filter '{}'", logging_config.filter))?;

    if logging_config.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .context("failed to initialize tracing subscriber")?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .try_init()
            .context("failed to initialize tracing subscriber")?;
    }

    Ok(())
}
