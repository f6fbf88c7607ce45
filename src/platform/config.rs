// WolPanel - platform/config.rs
//
// Platform-specific configuration, data directory resolution, and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::fmt::Display;
use std::path::{Path, PathBuf};

/// Resolved platform paths for WolPanel data and configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/wolpanel/ or %APPDATA%\WolPanel\config\)
    pub config_dir: PathBuf,

    /// Data directory holding the local activity log store.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
                data_dir: PathBuf::from("."),
            }
        }
    }

    /// Full path of the local log store inside `data_dir`.
    pub fn log_store_path(&self) -> PathBuf {
        self.data_dir.join(constants::LOG_STORE_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[server]` section.
    pub server: ServerSection,
    /// `[logs]` section.
    pub logs: LogsSection,
    /// `[ui]` section.
    pub ui: UiSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[server]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Base URL of the relay, e.g. "http://192.168.31.2:18808".
    pub base_url: Option<String>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
}

/// `[logs]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LogsSection {
    /// Relay log poll interval in ms.
    pub poll_interval_ms: Option<u64>,
    /// Cap on locally stored log entries.
    pub max_stored_entries: Option<usize>,
}

/// `[ui]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct UiSection {
    /// Theme: "dark" or "light".
    pub theme: Option<String>,
    /// Body font size in points.
    pub font_size: Option<f32>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    // -- Server --
    /// Relay base URL without a trailing slash.
    pub server_url: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    // -- Logs --
    /// Relay log poll interval in ms.
    pub poll_interval_ms: u64,
    /// Cap on locally stored log entries.
    pub max_stored_logs: usize,

    // -- UI --
    /// Dark mode (true) or light mode (false).
    pub dark_mode: bool,
    /// Body font size in points.
    pub font_size: f32,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// Log file path.
    pub log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: constants::DEFAULT_SERVER_URL.to_string(),
            request_timeout_secs: constants::DEFAULT_REQUEST_TIMEOUT_SECS,
            poll_interval_ms: constants::LOG_POLL_INTERVAL_MS,
            max_stored_logs: constants::DEFAULT_MAX_STORED_LOGS,
            dark_mode: true,
            font_size: constants::DEFAULT_FONT_SIZE,
            log_level: None,
            log_file: None,
        }
    }
}

/// Normalise a user-supplied base URL: trims whitespace and trailing slashes.
///
/// Returns `None` unless the result starts with `http://` or `https://`.
pub fn normalise_server_url(raw: &str) -> Option<String> {
    let url = raw.trim().trim_end_matches('/');
    let has_host = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .is_some_and(|rest| !rest.is_empty());
    has_host.then(|| url.to_string())
}

/// Load and validate `config.toml` from the given config directory.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first-run).
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<String>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), Vec::new());
    }

    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(e) => {
            let err = ConfigError::Io {
                path: config_path.clone(),
                source: e,
            };
            let msg = format!("{err}. Using defaults.");
            tracing::warn!("{}", msg);
            return (AppConfig::default(), vec![msg]);
        }
    };

    let (config, warnings) = parse_config(&content, &config_path);
    tracing::info!(path = %config_path.display(), "Loaded config.toml");
    (config, warnings)
}

/// Parse and validate config.toml content. `origin` is only used in messages.
pub fn parse_config(content: &str, origin: &Path) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    let raw: RawConfig = match toml::from_str(content) {
        Ok(r) => r,
        Err(e) => {
            let err = ConfigError::TomlParse {
                path: origin.to_path_buf(),
                source: e,
            };
            let msg = format!("{err}. Using defaults.");
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    let mut config = AppConfig::default();

    // -- Server: base_url --
    if let Some(ref url) = raw.server.base_url {
        match normalise_server_url(url) {
            Some(u) => config.server_url = u,
            None => warnings.push(format!(
                "[server] base_url = \"{url}\" is not an http(s) URL. Using default ({}).",
                constants::DEFAULT_SERVER_URL,
            )),
        }
    }

    // -- Server: request_timeout_secs --
    if let Some(secs) = raw.server.request_timeout_secs {
        if (constants::MIN_REQUEST_TIMEOUT_SECS..=constants::MAX_REQUEST_TIMEOUT_SECS)
            .contains(&secs)
        {
            config.request_timeout_secs = secs;
        } else {
            warnings.push(out_of_range(
                "server.request_timeout_secs",
                secs,
                constants::MIN_REQUEST_TIMEOUT_SECS,
                constants::MAX_REQUEST_TIMEOUT_SECS,
                constants::DEFAULT_REQUEST_TIMEOUT_SECS,
            ));
        }
    }

    // -- Logs: poll_interval_ms --
    if let Some(ms) = raw.logs.poll_interval_ms {
        if (constants::MIN_LOG_POLL_INTERVAL_MS..=constants::MAX_LOG_POLL_INTERVAL_MS).contains(&ms)
        {
            config.poll_interval_ms = ms;
        } else {
            warnings.push(out_of_range(
                "logs.poll_interval_ms",
                ms,
                constants::MIN_LOG_POLL_INTERVAL_MS,
                constants::MAX_LOG_POLL_INTERVAL_MS,
                constants::LOG_POLL_INTERVAL_MS,
            ));
        }
    }

    // -- Logs: max_stored_entries --
    if let Some(max) = raw.logs.max_stored_entries {
        if (constants::MIN_MAX_STORED_LOGS..=constants::ABSOLUTE_MAX_STORED_LOGS).contains(&max) {
            config.max_stored_logs = max;
        } else {
            warnings.push(out_of_range(
                "logs.max_stored_entries",
                max,
                constants::MIN_MAX_STORED_LOGS,
                constants::ABSOLUTE_MAX_STORED_LOGS,
                constants::DEFAULT_MAX_STORED_LOGS,
            ));
        }
    }

    // -- UI: theme --
    if let Some(ref theme) = raw.ui.theme {
        match theme.to_lowercase().as_str() {
            "dark" => config.dark_mode = true,
            "light" => config.dark_mode = false,
            other => {
                warnings.push(format!(
                    "[ui] theme = \"{other}\" is not recognised. Expected \"dark\" or \"light\". Using default (dark).",
                ));
            }
        }
    }

    // -- UI: font_size --
    if let Some(size) = raw.ui.font_size {
        if (constants::MIN_FONT_SIZE..=constants::MAX_FONT_SIZE).contains(&size) {
            config.font_size = size;
        } else {
            warnings.push(out_of_range(
                "ui.font_size",
                size,
                constants::MIN_FONT_SIZE,
                constants::MAX_FONT_SIZE,
                constants::DEFAULT_FONT_SIZE,
            ));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    // -- Logging: file --
    if let Some(ref file) = raw.logging.file {
        if !file.is_empty() {
            config.log_file = Some(file.clone());
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}

/// Warning text for a value outside `min..=max`.
fn out_of_range(
    field: &str,
    value: impl Display,
    min: impl Display,
    max: impl Display,
    default: impl Display,
) -> String {
    let err = ConfigError::ValueOutOfRange {
        field: field.to_string(),
        value: value.to_string(),
        expected: format!("{min}-{max}"),
    };
    format!("{err}. Using default ({default}).")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(content: &str) -> (AppConfig, Vec<String>) {
        parse_config(content, Path::new("config.toml"))
    }

    #[test]
    fn test_missing_file_gives_defaults_without_warnings() {
        let dir = TempDir::new().unwrap();
        let (config, warnings) = load_config(dir.path());
        assert_eq!(config, AppConfig::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_valid_values_are_applied() {
        let (config, warnings) = parse(
            r#"
            [server]
            base_url = "http://192.168.31.2:18808/"
            request_timeout_secs = 5

            [logs]
            poll_interval_ms = 1000
            max_stored_entries = 250

            [ui]
            theme = "Light"
            "#,
        );
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(config.server_url, "http://192.168.31.2:18808");
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.poll_interval_ms, 1000);
        assert_eq!(config.max_stored_logs, 250);
        assert!(!config.dark_mode);
    }

    #[test]
    fn test_out_of_range_values_warn_and_fall_back() {
        let (config, warnings) = parse(
            r#"
            [logs]
            poll_interval_ms = 10
            max_stored_entries = 5
            "#,
        );
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("logs.poll_interval_ms"));
        assert_eq!(config.poll_interval_ms, constants::LOG_POLL_INTERVAL_MS);
        assert_eq!(config.max_stored_logs, constants::DEFAULT_MAX_STORED_LOGS);
    }

    #[test]
    fn test_non_http_url_rejected() {
        let (config, warnings) = parse("[server]\nbase_url = \"ftp://relay\"\n");
        assert_eq!(warnings.len(), 1);
        assert_eq!(config.server_url, constants::DEFAULT_SERVER_URL);
    }

    #[test]
    fn test_unparseable_file_gives_defaults_with_warning() {
        let (config, warnings) = parse("[server\nbase_url = ");
        assert_eq!(config, AppConfig::default());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_normalise_server_url() {
        assert_eq!(
            normalise_server_url(" https://relay.lan/ ").as_deref(),
            Some("https://relay.lan")
        );
        assert_eq!(normalise_server_url("http://"), None);
        assert_eq!(normalise_server_url("relay.lan"), None);
    }
}
