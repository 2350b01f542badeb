//! # Configuration System
//!
//! Hierarchical TOML configuration for brewboard.
//!
//! ## Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.brewboard/config.toml` (global user preferences)
//! 3. **Project config** - `./.brewboard/config.toml` (project-specific overrides)
//! 4. **CLI arguments** - Command-line flags (highest priority)
//!
//! ## Loading Configuration
//!
//! ```rust,no_run
//! use brewboard_core::config::BrewConfig;
//!
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BrewConfig::load_hierarchy()?;
//!     let url = config.endpoint.orders_url();
//!     Ok(())
//! }
//! ```

pub mod defaults;
pub mod loading;
pub mod types;
pub mod validation;

pub use types::{
    BrewConfig, EndpointConfig, OrdersConfig, ReceiptsConfig, StagesConfig, TranscriptConfig,
};
pub use validation::validate_config;

impl BrewConfig {
    /// Load configuration from the hierarchy of config files.
    ///
    /// See [`loading::load_hierarchy`] for details.
    pub fn load_hierarchy() -> Result<Self, crate::errors::ConfigError> {
        loading::load_hierarchy()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), crate::errors::ConfigError> {
        validation::validate_config(self)
    }
}
