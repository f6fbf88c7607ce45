// WolPanel - app/log_manager.rs
//
// Operator-facing activity log: merges relay records and locally produced
// events into the persistent store and tracks which entries the current
// filter shows.

use crate::app::log_store::LogStore;
use crate::core::filter::{self, FilterState};
use crate::core::model::{LogEntry, LogKind, RelayLogRecord};
use crate::util::error::StoreError;
use chrono::{DateTime, Utc};

/// Append-only activity log backed by a `LogStore`.
#[derive(Debug)]
pub struct LogManager {
    store: LogStore,
    entries: Vec<LogEntry>,
    filter: FilterState,
    /// Indices into `entries` that pass `filter`.
    visible: Vec<usize>,
    /// Disambiguates ids of entries created in the same millisecond.
    next_seq: u64,
    /// Set whenever entries are appended; the view scrolls to the newest
    /// entry and clears it.
    pub scroll_to_latest: bool,
}

impl LogManager {
    /// Open the store and show whatever it already holds.
    pub fn new(store: LogStore) -> Self {
        let entries = store.load();
        tracing::info!(
            path = %store.path().display(),
            count = entries.len(),
            "Activity log opened"
        );
        let mut manager = Self {
            store,
            entries,
            filter: FilterState::default(),
            visible: Vec::new(),
            next_seq: 0,
            scroll_to_latest: true,
        };
        manager.apply_filter();
        manager
    }

    /// Record a locally produced event.
    pub fn add_log(&mut self, message: impl Into<String>, kind: LogKind, source: &str) {
        let timestamp = Utc::now();
        let entry = LogEntry {
            id: self.make_id(timestamp),
            timestamp,
            message: message.into(),
            kind,
            source: source.to_string(),
        };
        self.append(vec![entry]);
    }

    /// Merge records received from the relay. Returns how many were added.
    pub fn ingest(&mut self, records: Vec<RelayLogRecord>) -> usize {
        let entries: Vec<LogEntry> = records
            .into_iter()
            .map(|record| {
                let timestamp = record.time().unwrap_or_else(|| {
                    tracing::debug!(raw = record.timestamp, "Relay record has no valid time");
                    Utc::now()
                });
                LogEntry {
                    id: self.make_id(timestamp),
                    timestamp,
                    message: record.message,
                    kind: record.kind,
                    source: record.source,
                }
            })
            .collect();
        let count = entries.len();
        self.append(entries);
        count
    }

    fn make_id(&mut self, timestamp: DateTime<Utc>) -> String {
        let seq = self.next_seq;
        self.next_seq += 1;
        format!("{}-{seq}", timestamp.timestamp_millis())
    }

    fn append(&mut self, new_entries: Vec<LogEntry>) {
        if new_entries.is_empty() {
            return;
        }
        self.entries.extend(new_entries);
        let dropped = self.store.trim(&mut self.entries);
        if dropped > 0 {
            tracing::debug!(dropped, "Oldest log entries dropped to respect the store cap");
        }
        if let Err(e) = self.store.save(&self.entries) {
            // The view keeps the entries even if they could not be persisted.
            tracing::warn!(error = %e, "Failed to persist activity log");
        }
        self.apply_filter();
        self.scroll_to_latest = true;
    }

    /// Erase the store and the view. Server-side history is unaffected.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.store.clear()?;
        self.entries.clear();
        self.visible.clear();
        tracing::info!("Activity log cleared");
        Ok(())
    }

    /// Discard the in-memory view and re-read the store.
    pub fn reload(&mut self) {
        self.entries = self.store.load();
        self.apply_filter();
        self.scroll_to_latest = true;
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Mutable filter access for UI bindings; call `apply_filter` after
    /// changing it.
    pub fn filter_mut(&mut self) -> &mut FilterState {
        &mut self.filter
    }

    pub fn set_filter(&mut self, filter: FilterState) {
        self.filter = filter;
        self.apply_filter();
    }

    /// Recompute which entries the current filter shows.
    pub fn apply_filter(&mut self) {
        self.visible = filter::apply_filters(&self.entries, &self.filter);
    }

    /// All entries in arrival order.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Entries passing the current filter, in arrival order.
    pub fn visible_entries(&self) -> impl Iterator<Item = &LogEntry> + '_ {
        self.visible.iter().filter_map(|&i| self.entries.get(i))
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    /// Visible entry at display position `row`.
    pub fn visible_entry(&self, row: usize) -> Option<&LogEntry> {
        self.visible.get(row).and_then(|&i| self.entries.get(i))
    }

    pub fn store(&self) -> &LogStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manager(dir: &TempDir, cap: usize) -> LogManager {
        LogManager::new(LogStore::new(dir.path().join("wol_logs.json"), cap))
    }

    fn record(ts: f64, message: &str, kind: &str) -> RelayLogRecord {
        RelayLogRecord {
            timestamp: ts,
            message: message.to_string(),
            kind: LogKind::from(kind),
            source: "mqtt".to_string(),
        }
    }

    #[test]
    fn test_add_log_persists_immediately() {
        let dir = TempDir::new().unwrap();
        let mut logs = manager(&dir, 100);
        logs.add_log("Configuration saved", LogKind::Success, "config");

        let stored = logs.store().load();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].message, "Configuration saved");
        assert_eq!(stored[0].kind, LogKind::Success);
        assert_eq!(stored[0].source, "config");
    }

    #[test]
    fn test_ingest_converts_epoch_seconds() {
        let dir = TempDir::new().unwrap();
        let mut logs = manager(&dir, 100);
        let added = logs.ingest(vec![record(1_700_000_000.0, "on from office-pc", "info")]);

        assert_eq!(added, 1);
        let e = &logs.entries()[0];
        assert_eq!(e.timestamp.timestamp(), 1_700_000_000);
        assert!(e.id.starts_with("1700000000000-"));
    }

    #[test]
    fn test_ids_are_unique_within_one_millisecond() {
        let dir = TempDir::new().unwrap();
        let mut logs = manager(&dir, 100);
        logs.ingest(vec![record(5.0, "a", "info"), record(5.0, "b", "info")]);
        assert_ne!(logs.entries()[0].id, logs.entries()[1].id);
    }

    #[test]
    fn test_type_filter_leaves_storage_untouched() {
        let dir = TempDir::new().unwrap();
        let mut logs = manager(&dir, 100);
        logs.ingest(vec![
            record(1.0, "received on", "info"),
            record(2.0, "send failed", "error"),
            record(3.0, "done", "success"),
        ]);

        logs.set_filter(FilterState::only(LogKind::Error));

        let visible: Vec<_> = logs.visible_entries().map(|e| e.message.as_str()).collect();
        assert_eq!(visible, vec!["send failed"]);
        assert_eq!(logs.entries().len(), 3);
        assert_eq!(logs.store().load().len(), 3);
    }

    #[test]
    fn test_new_entries_respect_active_filter() {
        let dir = TempDir::new().unwrap();
        let mut logs = manager(&dir, 100);
        logs.set_filter(FilterState::only(LogKind::Error));
        logs.add_log("hidden", LogKind::Info, "system");
        logs.add_log("shown", LogKind::Error, "system");
        assert_eq!(logs.visible_count(), 1);
        assert_eq!(logs.visible_entry(0).map(|e| e.message.as_str()), Some("shown"));
    }

    #[test]
    fn test_clear_then_reload_is_empty() {
        let dir = TempDir::new().unwrap();
        let mut logs = manager(&dir, 100);
        logs.add_log("one", LogKind::Info, "system");
        logs.clear().unwrap();
        logs.reload();
        assert!(logs.entries().is_empty());

        let reopened = manager(&dir, 100);
        assert_eq!(reopened.visible_count(), 0);
    }

    #[test]
    fn test_cap_drops_oldest() {
        let dir = TempDir::new().unwrap();
        let mut logs = manager(&dir, 2);
        logs.ingest(vec![
            record(1.0, "first", "info"),
            record(2.0, "second", "info"),
            record(3.0, "third", "info"),
        ]);
        let messages: Vec<_> = logs.store().load().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["second", "third"]);
        assert_eq!(logs.visible_count(), 2);
    }

    #[test]
    fn test_arrivals_request_scroll_to_latest() {
        let dir = TempDir::new().unwrap();
        let mut logs = manager(&dir, 100);

        std::mem::take(&mut logs.scroll_to_latest);
        logs.add_log("Admin panel started", LogKind::Info, "system");
        assert!(logs.scroll_to_latest);

        std::mem::take(&mut logs.scroll_to_latest);
        assert_eq!(logs.ingest(Vec::new()), 0);
        assert!(!logs.scroll_to_latest);

        logs.ingest(vec![record(1.0, "woke nas", "success")]);
        assert!(logs.scroll_to_latest);
    }
}
