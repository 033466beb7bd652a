//! CLI commands for moving data in and out
//!
//! CSV import and export per collection, header-only templates, and full
//! JSON/YAML snapshots.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::ValueEnum;

use super::{create_output, today, ListArgs};
use crate::config::Settings;
use crate::error::{BackofficeError, BackofficeResult};
use crate::export::{
    export_collection_csv, export_filename, export_full_json, export_full_yaml, template_filename,
    write_template,
};
use crate::models::CollectionKind;
use crate::services::ImportService;
use crate::storage::Storage;

/// Snapshot format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SnapshotFormat {
    /// JSON (machine-readable)
    Json,
    /// YAML (human-readable)
    Yaml,
}

fn parse_collection(value: &str) -> BackofficeResult<CollectionKind> {
    value.parse().map_err(BackofficeError::Validation)
}

/// Handle `import <collection> <file>`
pub fn handle_import_command(
    storage: &Storage,
    settings: &Settings,
    collection: &str,
    file: &Path,
) -> BackofficeResult<()> {
    let kind = parse_collection(collection)?;

    if !file.exists() {
        return Err(BackofficeError::Import(format!(
            "File not found: {}",
            file.display()
        )));
    }
    let content = std::fs::read_to_string(file)
        .map_err(|e| BackofficeError::Import(format!("Failed to read file: {}", e)))?;

    let result = ImportService::new(storage)
        .with_author(settings.import_author.clone())
        .import_csv(kind, &content)?;

    for warning in &result.warnings {
        eprintln!("Warning: {}", warning);
    }

    if result.header_only {
        println!("The CSV file only contains a header row. No data to import.");
    } else {
        println!("Successfully imported {} {} records.", result.imported, kind);
    }

    Ok(())
}

/// Handle `export <collection>`
pub fn handle_export_command(
    storage: &Storage,
    collection: &str,
    output: Option<PathBuf>,
    filter: &ListArgs,
) -> BackofficeResult<()> {
    let kind = parse_collection(collection)?;

    // Build in memory so a failed export leaves no empty file behind
    let mut buffer = Vec::new();
    let rows = export_collection_csv(storage, kind, &filter.to_filter(), &mut buffer)?;

    let output = output.unwrap_or_else(|| PathBuf::from(export_filename(kind, today())));
    let mut writer = create_output(&output)?;
    writer
        .write_all(&buffer)
        .and_then(|_| writer.flush())
        .map_err(|e| BackofficeError::Export(e.to_string()))?;

    println!("Exported {} {} records to: {}", rows, kind, output.display());
    Ok(())
}

/// Handle `template <collection>`
pub fn handle_template_command(collection: &str, output: Option<PathBuf>) -> BackofficeResult<()> {
    let kind = parse_collection(collection)?;

    let mut buffer = Vec::new();
    write_template(kind, &mut buffer)?;

    let output = output.unwrap_or_else(|| PathBuf::from(template_filename(kind)));
    let mut writer = create_output(&output)?;
    writer
        .write_all(&buffer)
        .and_then(|_| writer.flush())
        .map_err(|e| BackofficeError::Export(e.to_string()))?;

    println!("Template written to: {}", output.display());
    Ok(())
}

/// Handle `snapshot <file>`
pub fn handle_snapshot_command(
    storage: &Storage,
    output: &Path,
    format: SnapshotFormat,
    pretty: bool,
) -> BackofficeResult<()> {
    let mut writer = create_output(output)?;

    match format {
        SnapshotFormat::Json => export_full_json(storage, &mut writer, pretty)?,
        SnapshotFormat::Yaml => export_full_yaml(storage, &mut writer)?,
    }
    writer
        .flush()
        .map_err(|e| BackofficeError::Export(e.to_string()))?;

    println!("Full snapshot exported to: {}", output.display());
    Ok(())
}
