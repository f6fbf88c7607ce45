// WolPanel - core/export.rs
//
// CSV and JSON export of the visible activity log entries.
// Core layer: writes to any Write trait object.

use crate::core::model::LogEntry;
use crate::util::error::ExportError;
use std::io::Write;
use std::path::Path;

/// Export entries to CSV format.
///
/// Writes: timestamp, type, source, message
pub fn export_csv<W: Write>(
    entries: &[&LogEntry],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let csv_err = |e| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(["timestamp", "type", "source", "message"])
        .map_err(csv_err)?;

    for entry in entries {
        csv_writer
            .write_record([
                entry.timestamp.to_rfc3339().as_str(),
                entry.kind.as_str(),
                entry.source.as_str(),
                entry.message.as_str(),
            ])
            .map_err(csv_err)?;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(entries.len())
}

/// Export entries to JSON format (array of objects, same shape as the store).
pub fn export_json<W: Write>(
    entries: &[&LogEntry],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    serde_json::to_writer_pretty(writer, entries).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(entries.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::LogKind;
    use chrono::Utc;

    fn make_entry(id: u64, message: &str) -> LogEntry {
        LogEntry {
            id: id.to_string(),
            timestamp: Utc::now(),
            message: message.to_string(),
            kind: LogKind::Error,
            source: "config".to_string(),
        }
    }

    #[test]
    fn test_csv_export() {
        let a = make_entry(1, "Save failed, quoted \"value\"");
        let b = make_entry(2, "Error two");
        let mut buf = Vec::new();
        let count = export_csv(&[&a, &b], &mut buf, Path::new("out.csv")).unwrap();
        assert_eq!(count, 2);

        let output = String::from_utf8(buf).unwrap();
        assert!(output.starts_with("timestamp,type,source,message"));
        assert!(output.contains("\"Save failed, quoted \"\"value\"\"\""));
        assert!(output.contains(",error,config,Error two"));
    }

    #[test]
    fn test_json_export() {
        let a = make_entry(1, "Test message");
        let mut buf = Vec::new();
        let count = export_json(&[&a], &mut buf, Path::new("out.json")).unwrap();
        assert_eq!(count, 1);

        let parsed: Vec<LogEntry> = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed, vec![a]);
    }
}
