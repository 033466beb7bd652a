//! Invoice display formatting

use tabled::Tabled;

use super::{render_table, truncate};
use crate::models::{Invoice, InvoiceItem};
use crate::services::unbilled_total;

#[derive(Tabled)]
struct InvoiceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Number")]
    number: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Client")]
    client: String,
    #[tabled(rename = "Items")]
    items: usize,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Description")]
    title: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

fn item_rows(items: &[InvoiceItem], currency_symbol: &str) -> Vec<ItemRow> {
    items
        .iter()
        .map(|item| ItemRow {
            date: item.date.to_string(),
            title: truncate(&item.title, 48),
            kind: item.kind.to_string(),
            amount: item.amount.format_with_symbol(currency_symbol),
        })
        .collect()
}

/// Format invoices as a table
pub fn format_invoice_list(invoices: &[Invoice], currency_symbol: &str) -> String {
    let rows: Vec<InvoiceRow> = invoices
        .iter()
        .map(|invoice| InvoiceRow {
            id: invoice.id.to_string(),
            number: invoice.invoice_number.clone(),
            date: invoice.date.to_string(),
            client: truncate(&invoice.client.name, 28),
            items: invoice.items.len(),
            total: invoice.total.format_with_symbol(currency_symbol),
            status: invoice.status.to_string(),
        })
        .collect();

    render_table(rows, "No invoices found.")
}

/// Format an invoice with its client block and line items
pub fn format_invoice_details(invoice: &Invoice, currency_symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Invoice {} ({})\n", invoice.invoice_number, invoice.status));
    output.push_str(&format!("  ID:       {}\n", invoice.id));
    output.push_str(&format!("  Date:     {}\n", invoice.date));
    if let Some(due) = invoice.due_date {
        output.push_str(&format!("  Due:      {}\n", due));
    }

    let client = &invoice.client;
    output.push_str("\nBill to:\n");
    output.push_str(&format!("  {}\n", client.name));
    for line in [
        &client.address,
        &client.postal_code,
        &client.vat_info,
        &client.phone,
        &client.email,
    ]
    .into_iter()
    .flatten()
    {
        output.push_str(&format!("  {}\n", line));
    }

    output.push('\n');
    output.push_str(&render_table(
        item_rows(&invoice.items, currency_symbol),
        "No items to bill.",
    ));
    output.push_str(&format!(
        "Total: {}\n",
        invoice.total.format_with_symbol(currency_symbol)
    ));

    output
}

/// Format the current unbilled lines
pub fn format_unbilled_items(items: &[InvoiceItem], currency_symbol: &str) -> String {
    let mut output = render_table(item_rows(items, currency_symbol), "No unbilled items.");
    if !items.is_empty() {
        output.push_str(&format!(
            "Unbilled total: {}\n",
            unbilled_total(items).format_with_symbol(currency_symbol)
        ));
    }
    output
}
