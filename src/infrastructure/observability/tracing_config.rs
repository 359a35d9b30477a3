use crate::presentation::config::{Environment, LoggingSettings};

/// Configuration for tracing initialization.
pub struct TracingConfig {
    pub environment: String,
    pub json_format: bool,
    pub default_filter: String,
}

impl TracingConfig {
    pub fn from_settings(environment: Environment, logging: &LoggingSettings) -> Self {
        Self {
            environment: environment.to_string(),
            json_format: logging.json,
            default_filter: logging.level.clone(),
        }
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            environment: "local".to_string(),
            json_format: false,
            default_filter: "info,ragline=debug,tower_http=debug".to_string(),
        }
    }
}
