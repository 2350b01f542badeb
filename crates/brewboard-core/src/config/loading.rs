//! Configuration loading and merging logic.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.brewboard/config.toml` (global user preferences)
//! 3. **Project config** - `./.brewboard/config.toml` (project-specific overrides)
//! 4. **CLI arguments** - Command-line flags (highest priority, applied by the CLI)

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::defaults::CONFIG_DIR_NAME;
use crate::config::types::{
    BrewConfig, EndpointConfig, OrdersConfig, ReceiptsConfig, StagesConfig, TranscriptConfig,
};
use crate::config::validation::validate_config;
use crate::errors::ConfigError;

/// Load configuration from the hierarchy of config files.
///
/// # Errors
///
/// Returns an error if a present file cannot be read or parsed, or if the
/// merged result fails validation. Missing config files are not errors.
pub fn load_hierarchy() -> Result<BrewConfig, ConfigError> {
    let user_path = user_config_path();
    let project_path = std::env::current_dir()?
        .join(CONFIG_DIR_NAME)
        .join("config.toml");
    load_hierarchy_from(user_path.as_deref(), Some(&project_path))
}

/// Load and merge the given user and project files.
///
/// Either path may be `None` or point at a file that does not exist.
pub fn load_hierarchy_from(
    user_path: Option<&Path>,
    project_path: Option<&Path>,
) -> Result<BrewConfig, ConfigError> {
    let mut config = BrewConfig::default();

    for path in [user_path, project_path].into_iter().flatten() {
        if let Some(file_config) = load_config_file(path)? {
            config = merge_configs(config, file_config);
        }
    }

    validate_config(&config)?;

    Ok(config)
}

fn user_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR_NAME).join("config.toml"))
}

/// Load a configuration file, returning `Ok(None)` when it does not exist.
fn load_config_file(path: &Path) -> Result<Option<BrewConfig>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(
                event = "core.config.file_missing",
                path = %path.display(),
            );
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    let config: BrewConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    debug!(
        event = "core.config.file_loaded",
        path = %path.display(),
    );

    Ok(Some(config))
}

/// Merge two configurations, with override_config taking precedence.
///
/// Values present in the override replace base values; absent ones fall
/// through to the base.
pub fn merge_configs(base: BrewConfig, override_config: BrewConfig) -> BrewConfig {
    BrewConfig {
        endpoint: EndpointConfig {
            base_url: override_config.endpoint.base_url.or(base.endpoint.base_url),
            fetch_timeout_ms: override_config
                .endpoint
                .fetch_timeout_ms
                .or(base.endpoint.fetch_timeout_ms),
        },
        orders: OrdersConfig {
            refresh_interval_ms: override_config
                .orders
                .refresh_interval_ms
                .or(base.orders.refresh_interval_ms),
            display_cap: override_config
                .orders
                .display_cap
                .or(base.orders.display_cap),
            orders_dir: override_config.orders.orders_dir.or(base.orders.orders_dir),
        },
        receipts: ReceiptsConfig {
            refresh_interval_ms: override_config
                .receipts
                .refresh_interval_ms
                .or(base.receipts.refresh_interval_ms),
        },
        transcript: TranscriptConfig {
            clear_after_ms: override_config
                .transcript
                .clear_after_ms
                .or(base.transcript.clear_after_ms),
        },
        stages: StagesConfig {
            tick_ms: override_config.stages.tick_ms.or(base.stages.tick_ms),
        },
    }
}
