//! Configuration validation logic.

use crate::config::types::BrewConfig;
use crate::errors::ConfigError;

/// Validate a BrewConfig, returning an error if any values are invalid.
///
/// # Validation Rules
///
/// - `endpoint.base_url`, if set, must start with `http://` or `https://`
/// - Every interval and timeout, if set, must be greater than 0
/// - `orders.display_cap`, if set, must be greater than 0
///
/// # Errors
///
/// Returns `ConfigError::InvalidConfiguration` naming the first bad field.
pub fn validate_config(config: &BrewConfig) -> Result<(), ConfigError> {
    if let Some(ref base_url) = config.endpoint.base_url
        && !(base_url.starts_with("http://") || base_url.starts_with("https://"))
    {
        return Err(ConfigError::InvalidConfiguration {
            message: format!(
                "endpoint.base_url '{}' must start with http:// or https://",
                base_url
            ),
        });
    }

    let durations = [
        ("endpoint.fetch_timeout_ms", config.endpoint.fetch_timeout_ms),
        ("orders.refresh_interval_ms", config.orders.refresh_interval_ms),
        (
            "receipts.refresh_interval_ms",
            config.receipts.refresh_interval_ms,
        ),
        ("transcript.clear_after_ms", config.transcript.clear_after_ms),
        ("stages.tick_ms", config.stages.tick_ms),
    ];
    for (field, value) in durations {
        if value == Some(0) {
            return Err(ConfigError::InvalidConfiguration {
                message: format!("{} must be greater than 0", field),
            });
        }
    }

    if config.orders.display_cap == Some(0) {
        return Err(ConfigError::InvalidConfiguration {
            message: "orders.display_cap must be greater than 0".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&BrewConfig::default()).is_ok());
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let mut config = BrewConfig::default();
        config.endpoint.base_url = Some("ftp://cafe.local".to_string());

        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfiguration { .. }));
        assert!(err.to_string().contains("endpoint.base_url"));
    }

    #[test]
    fn test_rejects_zero_interval() {
        let mut config = BrewConfig::default();
        config.stages.tick_ms = Some(0);

        let err = validate_config(&config).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid configuration: stages.tick_ms must be greater than 0"
        );
    }

    #[test]
    fn test_rejects_zero_display_cap() {
        let mut config = BrewConfig::default();
        config.orders.display_cap = Some(0);

        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_accepts_https_base_url() {
        let mut config = BrewConfig::default();
        config.endpoint.base_url = Some("https://cafe.example.com".to_string());
        config.orders.display_cap = Some(10);

        assert!(validate_config(&config).is_ok());
    }
}
