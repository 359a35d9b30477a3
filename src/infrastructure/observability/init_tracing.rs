use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, fmt};

use super::TracingConfig;

/// Installs the global subscriber. `RUST_LOG` takes precedence over the configured filter.
pub fn init_tracing(config: TracingConfig, port: u16) -> Result<(), TryInitError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.json_format {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init()?;
    }

    tracing::info!(
        port = port,
        environment = %config.environment,
        json_format = config.json_format,
        filter = %config.default_filter,
        "Tracing initialized"
    );

    Ok(())
}
