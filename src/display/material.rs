//! Material display formatting

use tabled::Tabled;

use super::{render_table, truncate};
use crate::models::{MaterialItem, Money};

#[derive(Tabled)]
struct MaterialRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Qty")]
    quantity: String,
    #[tabled(rename = "Unit Price")]
    unit_price: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Comments")]
    comments: usize,
}

/// Format materials as a table with a grand total
pub fn format_material_list(items: &[MaterialItem], currency_symbol: &str) -> String {
    if items.is_empty() {
        return "No materials found.\n".to_string();
    }

    let rows: Vec<MaterialRow> = items
        .iter()
        .map(|item| MaterialRow {
            id: item.id.to_string(),
            date: item.date.to_string(),
            name: truncate(&item.name, 32),
            quantity: item.quantity.to_string(),
            unit_price: item.unit_price.format_with_symbol(currency_symbol),
            total: item.total.format_with_symbol(currency_symbol),
            status: item.status.to_string(),
            comments: item.comments.len(),
        })
        .collect();

    let total: Money = items.iter().map(|i| i.total).sum();
    let mut output = render_table(rows, "");
    output.push_str(&format!(
        "{} materials, total {}\n",
        items.len(),
        total.format_with_symbol(currency_symbol)
    ));
    output
}

/// Format a single material's details, including its comment thread
pub fn format_material_details(item: &MaterialItem, currency_symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Material: {}\n", item.name));
    output.push_str(&format!("  ID:         {}\n", item.id));
    output.push_str(&format!("  Date:       {}\n", item.date));
    output.push_str(&format!("  Quantity:   {}\n", item.quantity));
    output.push_str(&format!(
        "  Unit Price: {}\n",
        item.unit_price.format_with_symbol(currency_symbol)
    ));
    output.push_str(&format!(
        "  Total:      {}\n",
        item.total.format_with_symbol(currency_symbol)
    ));
    output.push_str(&format!("  Status:     {}\n", item.status));
    if let Some(link) = &item.link_url {
        output.push_str(&format!("  Link:       {}\n", link));
    }

    if !item.comments.is_empty() {
        output.push_str("\nComments:\n");
        for comment in &item.comments {
            output.push_str(&format!(
                "  [{}] {}: {}\n",
                comment.timestamp.format("%Y-%m-%d %H:%M"),
                comment.author,
                comment.text
            ));
            if let Some(link) = &comment.link_url {
                output.push_str(&format!("      {}\n", link));
            }
        }
    }

    output
}
