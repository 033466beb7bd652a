//! Display formatting for terminal output
//!
//! List views are rendered as tables with `tabled`; detail views are plain
//! labelled lines.

pub mod invoice;
pub mod labor;
pub mod material;
pub mod task;

use tabled::settings::Style;
use tabled::{Table, Tabled};

pub use invoice::{format_invoice_details, format_invoice_list, format_unbilled_items};
pub use labor::{format_labor_details, format_labor_list};
pub use material::{format_material_details, format_material_list};
pub use task::{format_task_details, format_task_list};

/// Render rows as a table, or `empty` when there are none
pub(crate) fn render_table<T: Tabled>(rows: Vec<T>, empty: &str) -> String {
    if rows.is_empty() {
        return format!("{}\n", empty);
    }
    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!("{}\n", table)
}

/// Shorten long free text for a table cell
pub(crate) fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
