//! Configuration type definitions.
//!
//! Every field is optional so user and project files can be merged field by
//! field. Accessors on each section resolve the effective value with the
//! built-in default.
//!
//! # Example Configuration
//!
//! ```toml
//! [endpoint]
//! base_url = "http://localhost:3000"
//! fetch_timeout_ms = 10000
//!
//! [orders]
//! refresh_interval_ms = 5000
//! display_cap = 3
//! orders_dir = "backend/orders"
//!
//! [receipts]
//! refresh_interval_ms = 5000
//!
//! [transcript]
//! clear_after_ms = 3000
//!
//! [stages]
//! tick_ms = 1500
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::defaults;

/// Main configuration loaded from TOML config files.
///
/// Loaded from, in order of increasing precedence:
/// 1. User config: `~/.brewboard/config.toml`
/// 2. Project config: `./.brewboard/config.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BrewConfig {
    /// Where the orders endpoint lives and how long a fetch may take.
    #[serde(default)]
    pub endpoint: EndpointConfig,

    /// The "current order" panel.
    #[serde(default)]
    pub orders: OrdersConfig,

    /// The receipts modal.
    #[serde(default)]
    pub receipts: ReceiptsConfig,

    /// The live transcription bubble.
    #[serde(default)]
    pub transcript: TranscriptConfig,

    /// The staged processing indicator.
    #[serde(default)]
    pub stages: StagesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct EndpointConfig {
    /// Base URL of the web app serving `/api/orders`.
    /// Default: http://localhost:3000
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Upper bound for a single fetch, in milliseconds.
    /// Default: 10000
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct OrdersConfig {
    /// Default: 5000
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_interval_ms: Option<u64>,

    /// How many of the newest orders the panel keeps.
    /// Default: 3
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_cap: Option<usize>,

    /// Read order files written by the ordering agent instead of calling
    /// the HTTP endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orders_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ReceiptsConfig {
    /// Default: 5000
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_interval_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TranscriptConfig {
    /// How long a transcript line stays up before it auto-clears.
    /// Default: 3000
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clear_after_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StagesConfig {
    /// Default: 1500
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tick_ms: Option<u64>,
}

impl EndpointConfig {
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(defaults::DEFAULT_BASE_URL)
    }

    /// Full URL of the orders resource.
    pub fn orders_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url().trim_end_matches('/'),
            defaults::ORDERS_PATH
        )
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(
            self.fetch_timeout_ms
                .unwrap_or(defaults::DEFAULT_FETCH_TIMEOUT_MS),
        )
    }
}

impl OrdersConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(
            self.refresh_interval_ms
                .unwrap_or(defaults::DEFAULT_ORDERS_REFRESH_MS),
        )
    }

    pub fn display_cap(&self) -> usize {
        self.display_cap.unwrap_or(defaults::DEFAULT_ORDERS_DISPLAY_CAP)
    }
}

impl ReceiptsConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(
            self.refresh_interval_ms
                .unwrap_or(defaults::DEFAULT_RECEIPTS_REFRESH_MS),
        )
    }
}

impl TranscriptConfig {
    pub fn clear_after(&self) -> Duration {
        Duration::from_millis(
            self.clear_after_ms
                .unwrap_or(defaults::DEFAULT_TRANSCRIPT_CLEAR_MS),
        )
    }
}

impl StagesConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.unwrap_or(defaults::DEFAULT_STAGE_TICK_MS))
    }
}
