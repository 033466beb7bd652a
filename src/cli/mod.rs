//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod confirm;
pub mod invoice;
pub mod labor;
pub mod material;
pub mod task;
pub mod transfer;

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::NaiveDate;
use clap::{Args, ValueEnum};

use crate::error::{BackofficeError, BackofficeResult};
use crate::models::Money;
use crate::services::{BulkOutcome, ListFilter, SortDirection};

pub use confirm::StdinConfirm;
pub use invoice::{handle_invoice_command, InvoiceCommands};
pub use labor::{handle_labor_command, LaborCommands};
pub use material::{handle_material_command, MaterialCommands};
pub use task::{handle_task_command, TaskCommands};
pub use transfer::{
    handle_export_command, handle_import_command, handle_snapshot_command,
    handle_template_command, SnapshotFormat,
};

/// Date sort order on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortOrder {
    /// Oldest first
    Asc,
    /// Newest first
    Desc,
}

/// Search, status and sort options shared by list and export commands
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Case-insensitive text to search for in any column
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only show records with this status
    #[arg(long)]
    pub status: Option<String>,

    /// Date sort order
    #[arg(long, value_enum, default_value = "desc")]
    pub sort: SortOrder,
}

impl ListArgs {
    pub fn to_filter(&self) -> ListFilter {
        ListFilter {
            search: self.search.clone(),
            status: self.status.clone(),
            sort: match self.sort {
                SortOrder::Asc => SortDirection::Ascending,
                SortOrder::Desc => SortDirection::Descending,
            },
        }
    }
}

/// Today's date in local time
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Parse a `YYYY-MM-DD` date argument
pub fn parse_date(value: &str, field: &str) -> BackofficeResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        BackofficeError::Validation(format!(
            "Invalid {} '{}'. Use YYYY-MM-DD",
            field, value
        ))
    })
}

/// Parse an optional date argument, defaulting to today
pub fn parse_date_or_today(value: Option<&str>, field: &str) -> BackofficeResult<NaiveDate> {
    match value {
        Some(v) => parse_date(v, field),
        None => Ok(today()),
    }
}

/// Parse an amount such as "30", "30.5" or "30.50"
pub fn parse_money(value: &str, field: &str) -> BackofficeResult<Money> {
    Money::parse(value).map_err(|e| {
        BackofficeError::Validation(format!(
            "Invalid {} '{}'. Use a format like '30.00' or '30'. Error: {}",
            field, value, e
        ))
    })
}

/// Parse a non-negative number such as hours or quantity
pub fn parse_amount(value: &str, field: &str) -> BackofficeResult<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && *n >= 0.0)
        .ok_or_else(|| {
            BackofficeError::Validation(format!(
                "Invalid {} '{}'. Expected a non-negative number",
                field, value
            ))
        })
}

/// Create an output file for writing
pub fn create_output(path: &Path) -> BackofficeResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        BackofficeError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}

/// Print the outcome of a delete-all command
pub fn print_bulk_outcome(outcome: BulkOutcome, noun: &str) {
    match outcome {
        BulkOutcome::Deleted(n) => println!("Deleted {} {}.", n, noun),
        BulkOutcome::NothingToDelete => println!("No {} to delete.", noun),
        BulkOutcome::Cancelled => println!("Cancelled."),
    }
}
