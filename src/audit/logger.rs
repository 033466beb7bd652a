//! Append-only JSONL audit file

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use crate::error::{BackofficeError, BackofficeResult};

use super::entry::AuditEntry;

/// Writes audit entries as one JSON object per line
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append entries and flush once
    pub fn append(&self, entries: &[AuditEntry]) -> BackofficeResult<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut buffer = String::new();
        for entry in entries {
            buffer.push_str(&serde_json::to_string(entry)?);
            buffer.push('\n');
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| BackofficeError::Io(format!("Failed to open audit log: {}", e)))?;
        file.write_all(buffer.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| BackofficeError::Io(format!("Failed to write audit log: {}", e)))
    }

    /// The last `count` entries, oldest first
    ///
    /// Lines that no longer parse (for example from an older log format) are
    /// skipped rather than failing the whole read.
    pub fn read_recent(&self, count: usize) -> BackofficeResult<Vec<AuditEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| BackofficeError::Io(format!("Failed to open audit log: {}", e)))?;

        let mut entries = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line
                .map_err(|e| BackofficeError::Io(format!("Failed to read audit log: {}", e)))?;
            if let Ok(entry) = serde_json::from_str::<AuditEntry>(&line) {
                entries.push(entry);
            }
        }

        let start = entries.len().saturating_sub(count);
        Ok(entries.split_off(start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entry::Action;
    use crate::models::CollectionKind;
    use tempfile::TempDir;

    fn logger() -> (TempDir, AuditLogger) {
        let temp_dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(temp_dir.path().join("audit.log"));
        (temp_dir, logger)
    }

    fn deleted(i: usize) -> AuditEntry {
        AuditEntry::deleted(
            CollectionKind::Labor,
            format!("lab-{}", i),
            format!("Worker {}", i),
            &serde_json::json!({"index": i}),
        )
    }

    #[test]
    fn test_missing_log_reads_empty() {
        let (_temp, logger) = logger();
        assert!(logger.read_recent(10).unwrap().is_empty());
    }

    #[test]
    fn test_read_recent_keeps_order() {
        let (_temp, logger) = logger();
        let entries: Vec<AuditEntry> = (0..10).map(deleted).collect();
        logger.append(&entries[..4]).unwrap();
        logger.append(&entries[4..]).unwrap();

        let recent = logger.read_recent(3).unwrap();
        let ids: Vec<_> = recent.iter().filter_map(|e| e.record_id.as_deref()).collect();
        assert_eq!(ids, vec!["lab-7", "lab-8", "lab-9"]);
        assert_eq!(logger.read_recent(100).unwrap().len(), 10);
    }

    #[test]
    fn test_unreadable_lines_are_skipped() {
        let (temp, logger) = logger();
        logger.append(&[deleted(1)]).unwrap();
        let mut file = OpenOptions::new()
            .append(true)
            .open(temp.path().join("audit.log"))
            .unwrap();
        writeln!(file, "{{\"operation\":\"create\"}}").unwrap();
        writeln!(file).unwrap();
        logger
            .append(&[AuditEntry::bulk(Action::Clear, CollectionKind::Labor, vec![])])
            .unwrap();

        let entries = logger.read_recent(10).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].action, Action::Clear);
    }

    #[test]
    fn test_empty_append_creates_nothing() {
        let (temp, logger) = logger();
        logger.append(&[]).unwrap();
        assert!(!temp.path().join("audit.log").exists());
    }
}
