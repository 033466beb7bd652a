//! YAML snapshot export
//!
//! Exports the complete ledger to YAML for a human-readable backup.

use crate::error::{BackofficeError, BackofficeResult};
use crate::export::json::FullExport;
use crate::storage::Storage;
use std::io::Write;

fn export_err(e: impl std::fmt::Display) -> BackofficeError {
    BackofficeError::Export(e.to_string())
}

/// Export the full ledger to YAML format
pub fn export_full_yaml<W: Write>(storage: &Storage, writer: &mut W) -> BackofficeResult<()> {
    let export = FullExport::from_storage(storage)?;

    // Add a header comment
    writeln!(writer, "# Back-office ledger snapshot").map_err(export_err)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(export_err)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(export_err)?;
    writeln!(writer).map_err(export_err)?;

    serde_yaml::to_writer(writer, &export).map_err(export_err)?;

    Ok(())
}
