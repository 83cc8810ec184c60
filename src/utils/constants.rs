//! Constants shared across the crate.

/// Directory scanned for poller definitions when no path is given
pub const DEFAULT_POLLER_CONFIG_DIR: &str = "config/pollers";

/// Lower bound for `delay_ms` in poller definitions
pub const MIN_POLL_DELAY_MS: u64 = 100;

/// Symbol used when rendering native token amounts
pub const NATIVE_TOKEN_SYMBOL: &str = "ONE";

pub const DEFAULT_LOG_DIR: &str = "logs/";
pub const DEFAULT_LOG_FILE_NAME: &str = "poller.log";
pub const DEFAULT_LOG_MAX_SIZE: u64 = 1_073_741_824;

pub const DEFAULT_METRICS_ADDRESS: &str = "127.0.0.1:8081";
