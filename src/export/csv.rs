//! CSV Export functionality
//!
//! Writes the filtered view of labor, materials or tasks in the same layout
//! the importer reads, plus header-only template files.

use chrono::NaiveDate;
use std::io::Write;

use crate::error::{BackofficeError, BackofficeResult};
use crate::models::comment::join_comment_texts;
use crate::models::{CollectionKind, LaborItem, MaterialItem, Task};
use crate::services::{LaborService, ListFilter, MaterialService, TaskService};
use crate::storage::Storage;

fn export_err(e: std::io::Error) -> BackofficeError {
    BackofficeError::Export(e.to_string())
}

/// `{collection}_export_{YYYY-MM-DD}.csv`
pub fn export_filename(kind: CollectionKind, date: NaiveDate) -> String {
    format!("{}_export_{}.csv", kind.name(), date.format("%Y-%m-%d"))
}

/// `{collection}_template.csv`
pub fn template_filename(kind: CollectionKind) -> String {
    format!("{}_template.csv", kind.name())
}

/// Export the filtered view of a collection, returning the number of rows
///
/// Fails for invoices and for an empty view.
pub fn export_collection_csv<W: Write>(
    storage: &Storage,
    kind: CollectionKind,
    filter: &ListFilter,
    writer: &mut W,
) -> BackofficeResult<usize> {
    match kind {
        CollectionKind::Labor => {
            let items = LaborService::new(storage).list(filter)?;
            ensure_not_empty(items.len())?;
            export_labor_csv(&items, writer)?;
            Ok(items.len())
        }
        CollectionKind::Materials => {
            let items = MaterialService::new(storage).list(filter)?;
            ensure_not_empty(items.len())?;
            export_materials_csv(&items, writer)?;
            Ok(items.len())
        }
        CollectionKind::Tasks => {
            let tasks = TaskService::new(storage).list(filter)?;
            ensure_not_empty(tasks.len())?;
            export_tasks_csv(&tasks, writer)?;
            Ok(tasks.len())
        }
        CollectionKind::Invoices => Err(BackofficeError::Export(
            "Exporting invoices is not supported".into(),
        )),
    }
}

fn ensure_not_empty(rows: usize) -> BackofficeResult<()> {
    if rows == 0 {
        return Err(BackofficeError::Export("No data to export".into()));
    }
    Ok(())
}

/// Write a header-only template for a collection
pub fn write_template<W: Write>(kind: CollectionKind, writer: &mut W) -> BackofficeResult<()> {
    let headers = kind.csv_headers().ok_or_else(|| {
        BackofficeError::Export(
            "Invoices are generated from labor and materials. A template is not applicable."
                .into(),
        )
    })?;
    writeln!(writer, "{}", headers.join(",")).map_err(export_err)
}

/// Export labor entries to CSV
pub fn export_labor_csv<W: Write>(items: &[LaborItem], writer: &mut W) -> BackofficeResult<()> {
    write_header(CollectionKind::Labor, writer)?;

    for item in items {
        writeln!(
            writer,
            "{},{},{},{},{},{}",
            escape_csv(&item.name),
            item.date.format("%Y-%m-%d"),
            item.hours,
            item.rate,
            item.total,
            item.status
        )
        .map_err(export_err)?;
    }

    Ok(())
}

/// Export materials to CSV
pub fn export_materials_csv<W: Write>(items: &[MaterialItem], writer: &mut W) -> BackofficeResult<()> {
    write_header(CollectionKind::Materials, writer)?;

    for item in items {
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{}",
            escape_csv(&item.name),
            item.date.format("%Y-%m-%d"),
            item.quantity,
            item.unit_price,
            item.total,
            item.status,
            escape_csv(item.link_url.as_deref().unwrap_or("")),
            escape_csv(&join_comment_texts(&item.comments))
        )
        .map_err(export_err)?;
    }

    Ok(())
}

/// Export tasks to CSV
pub fn export_tasks_csv<W: Write>(tasks: &[Task], writer: &mut W) -> BackofficeResult<()> {
    write_header(CollectionKind::Tasks, writer)?;

    for task in tasks {
        let due_date = task
            .due_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();

        writeln!(
            writer,
            "{},{},{},{},{},{},{},{},{}",
            escape_csv(&task.title),
            task.date.format("%Y-%m-%d"),
            due_date,
            escape_csv(task.status.label()),
            escape_csv(&task.description),
            escape_csv(&task.notes),
            escape_csv(task.image_url.as_deref().unwrap_or("")),
            escape_csv(task.link_url.as_deref().unwrap_or("")),
            escape_csv(&join_comment_texts(&task.comments))
        )
        .map_err(export_err)?;
    }

    Ok(())
}

fn write_header<W: Write>(kind: CollectionKind, writer: &mut W) -> BackofficeResult<()> {
    let headers = kind.csv_headers().unwrap_or(&[]);
    writeln!(writer, "{}", headers.join(",")).map_err(export_err)
}

/// Escape a string for CSV output
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
