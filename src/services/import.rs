//! CSV import service
//!
//! Appends labor, materials or tasks from a CSV file laid out like the
//! export and template files. Rows are matched to columns by header name,
//! malformed rows are skipped with a warning, and every imported record gets
//! a fresh id.

use std::collections::HashMap;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};

use crate::audit::Action;
use crate::error::{BackofficeError, BackofficeResult};
use crate::models::comment::split_comment_texts;
use crate::models::{
    CollectionKind, LaborItem, MaterialItem, Money, PaymentStatus, Task, TaskStatus,
};
use crate::storage::Storage;

/// Result of a completed import
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    /// Number of records appended
    pub imported: usize,
    /// One message per skipped row or questionable value
    pub warnings: Vec<String>,
    /// The file had a header row and nothing else
    pub header_only: bool,
}

/// A data row keyed by lower-cased header name
struct Row<'r> {
    line: u64,
    values: HashMap<String, &'r str>,
}

impl<'r> Row<'r> {
    /// Field value with surrounding whitespace removed
    fn get(&self, column: &str) -> &'r str {
        self.text(column).trim()
    }

    /// Field value as written, for free-text columns
    fn text(&self, column: &str) -> &'r str {
        self.values
            .get(&column.to_lowercase())
            .copied()
            .unwrap_or("")
    }

    fn optional(&self, column: &str) -> Option<String> {
        Some(self.get(column))
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    fn number(&self, column: &str) -> f64 {
        self.get(column)
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .unwrap_or(0.0)
    }

    fn money(&self, column: &str) -> Money {
        Money::parse(self.get(column)).unwrap_or_default()
    }
}

/// Service for CSV import
pub struct ImportService<'a> {
    storage: &'a Storage,
    author: String,
}

impl<'a> ImportService<'a> {
    /// Create a new import service
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            author: "Imported".to_string(),
        }
    }

    /// Author recorded on comments read from the `comments` column
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Import CSV content into a collection
    pub fn import_csv(&self, kind: CollectionKind, content: &str) -> BackofficeResult<ImportResult> {
        if kind == CollectionKind::Invoices {
            return Err(BackofficeError::Import(
                "Importing invoices is not supported".into(),
            ));
        }

        if content.trim().is_empty() {
            return Err(BackofficeError::Import(
                "CSV file is empty or contains only whitespace.".into(),
            ));
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(content.as_bytes());

        let mut records: Vec<StringRecord> = Vec::new();
        for result in reader.records() {
            let record = result?;
            if record.iter().all(|field| field.trim().is_empty()) {
                continue;
            }
            records.push(record);
        }

        let mut rows = records.iter();
        let header = match rows.next() {
            Some(header) => header,
            None => {
                return Err(BackofficeError::Import(
                    "CSV file is empty or contains only whitespace.".into(),
                ))
            }
        };
        let columns: Vec<String> = header.iter().map(|h| h.trim().to_lowercase()).collect();

        let name_column = kind.name_column();
        if !columns.iter().any(|c| c == name_column) {
            return Err(BackofficeError::Import(format!(
                "Missing required column '{}' in header",
                name_column
            )));
        }

        let mut result = ImportResult::default();
        if records.len() == 1 {
            result.header_only = true;
            return Ok(result);
        }

        let mut parsed = Vec::new();
        for record in rows {
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let mut values: Vec<&str> = record.iter().collect();

            if values.len() == columns.len() + 1 && values.last().is_some_and(|v| v.trim().is_empty()) {
                values.pop();
            }
            if values.len() != columns.len() {
                result.warnings.push(format!(
                    "Skipping row {}: Incorrect number of columns. Expected {}, but found {}.",
                    line,
                    columns.len(),
                    values.len()
                ));
                continue;
            }

            parsed.push(Row {
                line,
                values: columns.iter().cloned().zip(values).collect(),
            });
        }

        result.imported = match kind {
            CollectionKind::Labor => self.import_labor(&parsed, &mut result.warnings)?,
            CollectionKind::Materials => self.import_materials(&parsed, &mut result.warnings)?,
            CollectionKind::Tasks => self.import_tasks(&parsed, &mut result.warnings)?,
            CollectionKind::Invoices => 0,
        };

        Ok(result)
    }

    fn import_labor(&self, rows: &[Row<'_>], warnings: &mut Vec<String>) -> BackofficeResult<usize> {
        let mut items = Vec::new();
        for row in rows {
            let Some((name, date)) = required_fields(row, "name", warnings) else {
                continue;
            };

            let mut item = LaborItem::new(name, date, row.number("hours"), row.money("rate"));
            item.status = PaymentStatus::parse(row.get("status")).unwrap_or_default();

            if let Err(e) = item.validate() {
                warnings.push(format!("Skipping row {}: {}", row.line, e));
                continue;
            }
            items.push(item);
        }

        let ids: Vec<String> = items.iter().map(|r| r.id.to_string()).collect();
        let count = ids.len();

        self.storage.labor.append(items)?;
        self.storage.labor.save()?;
        if count > 0 {
            self.storage.log_bulk(Action::Import, CollectionKind::Labor, ids)?;
        }

        Ok(count)
    }

    fn import_materials(
        &self,
        rows: &[Row<'_>],
        warnings: &mut Vec<String>,
    ) -> BackofficeResult<usize> {
        let mut items = Vec::new();
        for row in rows {
            let Some((name, date)) = required_fields(row, "name", warnings) else {
                continue;
            };

            let mut item =
                MaterialItem::new(name, date, row.number("quantity"), row.money("unitPrice"));
            item.status = PaymentStatus::parse(row.get("status")).unwrap_or_default();
            item.link_url = row.optional("linkUrl");
            item.comments = split_comment_texts(row.get("comments"), &self.author);

            if let Err(e) = item.validate() {
                warnings.push(format!("Skipping row {}: {}", row.line, e));
                continue;
            }
            items.push(item);
        }

        let ids: Vec<String> = items.iter().map(|r| r.id.to_string()).collect();
        let count = ids.len();

        self.storage.materials.append(items)?;
        self.storage.materials.save()?;
        if count > 0 {
            self.storage.log_bulk(Action::Import, CollectionKind::Materials, ids)?;
        }

        Ok(count)
    }

    fn import_tasks(&self, rows: &[Row<'_>], warnings: &mut Vec<String>) -> BackofficeResult<usize> {
        let mut tasks = Vec::new();
        for row in rows {
            let Some((title, date)) = required_fields(row, "title", warnings) else {
                continue;
            };

            let mut task = Task::new(title, date);
            task.status = TaskStatus::parse(row.get("status")).unwrap_or_default();
            task.due_date = match row.get("dueDate") {
                "" => None,
                raw => match parse_date(raw) {
                    Some(due) => Some(due),
                    None => {
                        warnings.push(format!(
                            "Row {}: could not parse due date '{}'; left empty",
                            row.line, raw
                        ));
                        None
                    }
                },
            };
            task.description = blank_to_empty(row.text("description"));
            task.notes = blank_to_empty(row.text("notes"));
            task.image_url = row.optional("imageUrl");
            task.link_url = row.optional("linkUrl");
            task.comments = split_comment_texts(row.get("comments"), &self.author);
            tasks.push(task);
        }

        let ids: Vec<String> = tasks.iter().map(|r| r.id.to_string()).collect();
        let count = ids.len();

        self.storage.tasks.append(tasks)?;
        self.storage.tasks.save()?;
        if count > 0 {
            self.storage.log_bulk(Action::Import, CollectionKind::Tasks, ids)?;
        }

        Ok(count)
    }
}

fn blank_to_empty(text: &str) -> String {
    if text.trim().is_empty() {
        String::new()
    } else {
        text.to_string()
    }
}

/// Name and date of a row, or a warning when either is unusable
fn required_fields<'r>(
    row: &Row<'r>,
    name_column: &str,
    warnings: &mut Vec<String>,
) -> Option<(&'r str, NaiveDate)> {
    let name = row.get(name_column);
    if name.is_empty() {
        warnings.push(format!("Skipping row {}: missing {}", row.line, name_column));
        return None;
    }

    let raw_date = row.get("date");
    match parse_date(raw_date) {
        Some(date) => Some((name, date)),
        None => {
            warnings.push(format!(
                "Skipping row {}: Could not parse date: '{}'",
                row.line, raw_date
            ));
            None
        }
    }
}

/// Parse a date string using multiple format attempts
fn parse_date(s: &str) -> Option<NaiveDate> {
    let formats = [
        "%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%d/%m/%Y", "%d/%m/%y", "%Y/%m/%d", "%m-%d-%Y",
        "%d-%m-%Y",
    ];

    formats
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
        .or_else(|| {
            // ISO timestamps such as 2024-01-01T00:00:00.000Z
            s.get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        })
}
