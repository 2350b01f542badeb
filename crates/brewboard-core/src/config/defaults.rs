//! Built-in fallback values for configuration.

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Path of the orders resource, appended to the base URL.
pub const ORDERS_PATH: &str = "/api/orders";

pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;

pub const DEFAULT_ORDERS_REFRESH_MS: u64 = 5_000;

/// The order panel only has room for the newest few orders.
pub const DEFAULT_ORDERS_DISPLAY_CAP: usize = 3;

pub const DEFAULT_RECEIPTS_REFRESH_MS: u64 = 5_000;

pub const DEFAULT_TRANSCRIPT_CLEAR_MS: u64 = 3_000;

pub const DEFAULT_STAGE_TICK_MS: u64 = 1_500;

/// Directory under the home or project directory that holds `config.toml`.
pub const CONFIG_DIR_NAME: &str = ".brewboard";
