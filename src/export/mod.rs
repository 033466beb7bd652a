//! Export module for the back-office ledger
//!
//! - CSV: per-collection export and import templates (spreadsheet-compatible)
//! - JSON: machine-readable full snapshot
//! - YAML: human-readable full snapshot

pub mod csv;
pub mod json;
pub mod yaml;

pub use csv::{
    export_collection_csv, export_filename, export_labor_csv, export_materials_csv,
    export_tasks_csv, template_filename, write_template,
};
pub use json::{export_full_json, FullExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_full_yaml;
