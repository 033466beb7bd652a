//! File I/O utilities with atomic writes
//!
//! Provides safe file operations that won't corrupt data on failure.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::BackofficeError;

/// Read JSON from a file, recovering from a corrupt file
///
/// A missing or blank file yields the default value. A file that fails to
/// parse is moved aside to `<file>.corrupt` and the default value is returned
/// together with a notice for the user. Only I/O failures are errors.
pub fn read_json_or_recover<T, P>(path: P) -> Result<(T, Option<String>), BackofficeError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok((T::default(), None));
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| BackofficeError::Storage(format!("Failed to read {}: {}", path.display(), e)))?;

    if contents.trim().is_empty() {
        return Ok((T::default(), None));
    }

    match serde_json::from_str(&contents) {
        Ok(value) => Ok((value, None)),
        Err(parse_err) => {
            let quarantine = corrupt_path(path);
            fs::rename(path, &quarantine).map_err(|e| {
                BackofficeError::Storage(format!(
                    "Failed to move corrupt file {} aside: {}",
                    path.display(),
                    e
                ))
            })?;
            let notice = format!(
                "Could not parse {} ({}); starting with an empty collection. The unreadable file was kept as {}",
                path.display(),
                parse_err,
                quarantine.display()
            );
            Ok((T::default(), Some(notice)))
        }
    }
}

fn corrupt_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".corrupt");
    path.with_file_name(name)
}

/// Write JSON to a file atomically (write to temp, then rename)
///
/// This ensures that the file is either completely written or not modified at all,
/// preventing corruption on crashes or power failures.
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), BackofficeError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            BackofficeError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Create temp file in same directory (important for atomic rename)
    let temp_path = path.with_extension("json.tmp");

    // Write to temp file
    let file = File::create(&temp_path)
        .map_err(|e| BackofficeError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| BackofficeError::Storage(format!("Failed to serialize data: {}", e)))?;

    writer
        .flush()
        .map_err(|e| BackofficeError::Storage(format!("Failed to flush data: {}", e)))?;

    // Sync to disk before rename
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| BackofficeError::Storage(format!("Failed to sync data: {}", e)))?;

    // Atomic rename
    fs::rename(&temp_path, path).map_err(|e| {
        // Try to clean up temp file if rename fails
        let _ = fs::remove_file(&temp_path);
        BackofficeError::Storage(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}
