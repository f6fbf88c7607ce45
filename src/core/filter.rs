// WolPanel - core/filter.rs
//
// Activity log view filter. Text and type filters are AND-combined.
// Core layer: pure logic, no I/O or UI dependencies.
//
// Filtering only decides which stored entries are visible; it never touches
// the entries themselves.

use crate::core::model::{LogEntry, LogKind};

/// Current filter settings of the log view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Substring search on the message (case-insensitive). Empty = no filter.
    pub text_search: String,

    /// Only show entries of this type. None = all types.
    pub kind: Option<LogKind>,
}

impl FilterState {
    /// Returns true if no filters are active.
    pub fn is_empty(&self) -> bool {
        self.text_search.is_empty() && self.kind.is_none()
    }

    /// Quick-filter for a single type.
    pub fn only(kind: LogKind) -> Self {
        Self {
            kind: Some(kind),
            ..Default::default()
        }
    }
}

/// Apply the filter to a slice of entries, returning indices of visible ones.
pub fn apply_filters(entries: &[LogEntry], filter: &FilterState) -> Vec<usize> {
    if filter.is_empty() {
        return (0..entries.len()).collect();
    }

    let text_lower = filter.text_search.to_lowercase();

    entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| matches_all(entry, filter, &text_lower))
        .map(|(idx, _)| idx)
        .collect()
}

/// Check if a single entry matches all active filters.
pub fn matches_all(entry: &LogEntry, filter: &FilterState, text_lower: &str) -> bool {
    if let Some(ref kind) = filter.kind {
        if entry.kind != *kind {
            return false;
        }
    }

    if !text_lower.is_empty() && !entry.message.to_lowercase().contains(text_lower) {
        return false;
    }

    true
}
