// WolPanel - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers, and double as the
// wire shapes of the relay's REST API.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Client configuration
// =============================================================================

/// One device the relay can wake: the MQTT topic it listens on, the target's
/// MAC and broadcast address, and the credentials used for remote shutdown.
///
/// Field names match the relay's JSON document exactly.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    pub topic: String,
    pub target_mac: String,
    pub broadcast_ip: String,
    pub ip: String,
    pub username: String,
    pub password: String,
}

impl ClientConfig {
    /// A blank configuration with a generated `new-client-<epoch-ms>` topic.
    pub fn placeholder(epoch_ms: i64) -> Self {
        Self {
            topic: format!(
                "{}{epoch_ms}",
                crate::util::constants::NEW_CLIENT_TOPIC_PREFIX
            ),
            ..Default::default()
        }
    }
}

/// Stable in-memory identity of a client configuration.
///
/// Generated locally and never sent to the server; a reload assigns fresh ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(pub u64);

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Body of `GET /api/config` and `POST /api/config`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfigDocument {
    #[serde(default)]
    pub clients: Vec<ClientConfig>,
}

/// Reply to `POST /api/config`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct SaveResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

// =============================================================================
// Activity log
// =============================================================================

/// Category of an activity log entry.
///
/// The relay emits `info`, `success` and `error`; anything else is kept
/// verbatim in `Other` so unknown categories still filter by equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LogKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
    Other(String),
}

impl LogKind {
    /// Categories offered in the type filter, in display order.
    pub const KNOWN: &'static [LogKind] = &[
        LogKind::Info,
        LogKind::Success,
        LogKind::Warning,
        LogKind::Error,
    ];

    /// Wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            LogKind::Info => "info",
            LogKind::Success => "success",
            LogKind::Warning => "warning",
            LogKind::Error => "error",
            LogKind::Other(s) => s,
        }
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &str {
        match self {
            LogKind::Info => "Info",
            LogKind::Success => "Success",
            LogKind::Warning => "Warning",
            LogKind::Error => "Error",
            LogKind::Other(s) => s,
        }
    }
}

impl From<String> for LogKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "info" => LogKind::Info,
            "success" => LogKind::Success,
            "warning" => LogKind::Warning,
            "error" => LogKind::Error,
            _ => LogKind::Other(s),
        }
    }
}

impl From<&str> for LogKind {
    fn from(s: &str) -> Self {
        LogKind::from(s.to_string())
    }
}

impl From<LogKind> for String {
    fn from(kind: LogKind) -> Self {
        match kind {
            LogKind::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for LogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single activity log event as held in the local store.
///
/// Appended only; never mutated or reordered once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    /// Serialised as RFC 3339 (ISO-8601) in UTC.
    pub timestamp: DateTime<Utc>,
    pub message: String,
    #[serde(rename = "type", default)]
    pub kind: LogKind,
    #[serde(default)]
    pub source: String,
}

/// One record of `GET /api/logs`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RelayLogRecord {
    /// Seconds since the Unix epoch, with fractional part.
    pub timestamp: f64,
    pub message: String,
    #[serde(rename = "type", default)]
    pub kind: LogKind,
    #[serde(default)]
    pub source: String,
}

impl RelayLogRecord {
    /// Event time as UTC. Non-finite or out-of-range values map to `None`.
    pub fn time(&self) -> Option<DateTime<Utc>> {
        if !self.timestamp.is_finite() {
            return None;
        }
        let secs = self.timestamp.floor();
        let nanos = ((self.timestamp - secs) * 1_000_000_000.0) as u32;
        if secs < i64::MIN as f64 || secs > i64::MAX as f64 {
            return None;
        }
        Utc.timestamp_opt(secs as i64, nanos.min(999_999_999)).single()
    }
}

/// Body of `GET /api/logs`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct LogsResponse {
    #[serde(default)]
    pub logs: Vec<RelayLogRecord>,
}
