// WolPanel - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "WolPanel";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "WolPanel";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Relay server
// =============================================================================

/// Base URL of the relay when neither config.toml nor the CLI names one.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:18808";

/// Path of the client configuration endpoint (GET and POST).
pub const CONFIG_ENDPOINT: &str = "/api/config";

/// Path of the activity log endpoint (GET).
pub const LOGS_ENDPOINT: &str = "/api/logs";

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Minimum user-configurable request timeout (seconds).
pub const MIN_REQUEST_TIMEOUT_SECS: u64 = 1;

/// Maximum user-configurable request timeout (seconds).
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 120;

// =============================================================================
// Log polling
// =============================================================================

/// How often the log poller asks the relay for new entries (ms).
pub const LOG_POLL_INTERVAL_MS: u64 = 2_000;

/// How often the cancel flag is checked within each poll sleep interval (ms).
pub const POLL_CANCEL_CHECK_INTERVAL_MS: u64 = 100;

/// Minimum user-configurable poll interval (ms).
pub const MIN_LOG_POLL_INTERVAL_MS: u64 = 500;

/// Maximum user-configurable poll interval (ms).
pub const MAX_LOG_POLL_INTERVAL_MS: u64 = 60_000;

/// Maximum number of poller messages processed per UI frame.
pub const MAX_POLL_MESSAGES_PER_FRAME: usize = 200;

// =============================================================================
// Log store
// =============================================================================

/// Default cap on entries held in the local log store. When exceeded the
/// oldest entries are dropped first.
pub const DEFAULT_MAX_STORED_LOGS: usize = 5_000;

/// Minimum user-configurable store cap.
pub const MIN_MAX_STORED_LOGS: usize = 100;

/// Maximum user-configurable store cap.
pub const ABSOLUTE_MAX_STORED_LOGS: usize = 100_000;

/// File name of the local log store (the `wol_logs` key).
pub const LOG_STORE_FILE_NAME: &str = "wol_logs.json";

// =============================================================================
// Client configuration
// =============================================================================

/// Prefix of the topic given to a freshly added client.
pub const NEW_CLIENT_TOPIC_PREFIX: &str = "new-client-";

/// `source` recorded on log events produced by configuration saves.
pub const CONFIG_LOG_SOURCE: &str = "config";

/// `source` recorded on log events produced by the panel itself.
pub const SYSTEM_LOG_SOURCE: &str = "system";

// =============================================================================
// UI defaults
// =============================================================================

/// How long transient notices (save success, info banners) stay visible.
pub const NOTICE_DISPLAY_MS: u64 = 3_000;

/// Default UI body font size in points.
pub const DEFAULT_FONT_SIZE: f32 = 14.5;

/// Minimum user-configurable UI font size (points).
pub const MIN_FONT_SIZE: f32 = 10.0;

/// Maximum user-configurable UI font size (points).
pub const MAX_FONT_SIZE: f32 = 24.0;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
