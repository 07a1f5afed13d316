use crate::config::types::{AnalysisConfig, Config, LookupConfig, ServerConfig};
use crate::ConfigError;
use std::net::SocketAddr;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_server_config(&config.server)?;
    validate_analysis_config(&config.analysis)?;
    validate_lookup_config(&config.lookup)?;
    Ok(())
}

/// Validates server configuration
fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    config.bind.parse::<SocketAddr>().map_err(|e| {
        ConfigError::Validation(format!(
            "bind must be a host:port address, got '{}': {}",
            config.bind, e
        ))
    })?;

    Ok(())
}

/// Validates analysis configuration
fn validate_analysis_config(config: &AnalysisConfig) -> Result<(), ConfigError> {
    if config.pacing_delay_ms > 60_000 {
        return Err(ConfigError::Validation(format!(
            "pacing_delay_ms must be <= 60000ms, got {}ms",
            config.pacing_delay_ms
        )));
    }

    if config.link_timeout_secs < 1 || config.link_timeout_secs > 120 {
        return Err(ConfigError::Validation(format!(
            "link_timeout_secs must be between 1 and 120, got {}",
            config.link_timeout_secs
        )));
    }

    Ok(())
}

/// Validates lookup configuration
fn validate_lookup_config(config: &LookupConfig) -> Result<(), ConfigError> {
    if !config.endpoint.starts_with("http://") && !config.endpoint.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "lookup endpoint must be an HTTP(S) URL, got '{}'",
            config.endpoint
        )));
    }

    Ok(())
}
