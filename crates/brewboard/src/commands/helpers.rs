use std::path::PathBuf;
use std::sync::Arc;

use clap::ArgMatches;
use tracing::{info, warn};

use brewboard_core::refresh::fetch_with_timeout;
use brewboard_core::{
    BrewConfig, DirectoryOrderSource, FetchError, HttpOrderSource, Order, SharedFetcher,
};

/// Load the config hierarchy, falling back to defaults with a warning.
pub fn load_config_with_warning() -> BrewConfig {
    match BrewConfig::load_hierarchy() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Could not load config: {}. Using defaults.\n\
                 Tip: Check ~/.brewboard/config.toml and ./.brewboard/config.toml for syntax errors.",
                e
            );
            warn!(
                event = "cli.config.load_failed",
                error = %e,
                "Config load failed, using defaults"
            );
            BrewConfig::default()
        }
    }
}

/// Config with command-line overrides applied on top.
pub fn config_for(matches: &ArgMatches) -> BrewConfig {
    let mut config = load_config_with_warning();
    if let Some(dir) = matches.get_one::<PathBuf>("orders-dir") {
        config.orders.orders_dir = Some(dir.clone());
    }
    config
}

/// Directory source when an orders dir is configured, HTTP otherwise.
pub fn order_fetcher(config: &BrewConfig) -> SharedFetcher<Order> {
    match &config.orders.orders_dir {
        Some(dir) => {
            info!(event = "cli.order_source_selected", kind = "directory", path = %dir.display());
            Arc::new(DirectoryOrderSource::new(dir.clone()))
        }
        None => {
            let url = config.endpoint.orders_url();
            info!(event = "cli.order_source_selected", kind = "http", url = %url);
            Arc::new(HttpOrderSource::new(url))
        }
    }
}

/// One bounded fetch outside any refresh loop.
pub async fn fetch_orders_once(config: &BrewConfig) -> Result<Vec<Order>, FetchError> {
    let fetcher = order_fetcher(config);
    fetch_with_timeout(fetcher.as_ref(), config.endpoint.fetch_timeout()).await
}
