//! Labor display formatting

use tabled::Tabled;

use super::{render_table, truncate};
use crate::models::{LaborItem, Money};

#[derive(Tabled)]
struct LaborRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Hours")]
    hours: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Status")]
    status: String,
}

/// Format labor entries as a table with a grand total
pub fn format_labor_list(items: &[LaborItem], currency_symbol: &str) -> String {
    if items.is_empty() {
        return "No labor entries found.\n".to_string();
    }

    let rows: Vec<LaborRow> = items
        .iter()
        .map(|item| LaborRow {
            id: item.id.to_string(),
            date: item.date.to_string(),
            name: truncate(&item.name, 32),
            hours: format!("{:.2}", item.hours),
            rate: item.rate.format_with_symbol(currency_symbol),
            total: item.total.format_with_symbol(currency_symbol),
            status: item.status.to_string(),
        })
        .collect();

    let total: Money = items.iter().map(|i| i.total).sum();
    let mut output = render_table(rows, "");
    output.push_str(&format!(
        "{} entries, total {}\n",
        items.len(),
        total.format_with_symbol(currency_symbol)
    ));
    output
}

/// Format a single labor entry's details
pub fn format_labor_details(item: &LaborItem, currency_symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Labor: {}\n", item.name));
    output.push_str(&format!("  ID:       {}\n", item.id));
    output.push_str(&format!("  Date:     {}\n", item.date));
    output.push_str(&format!("  Hours:    {}\n", item.hours));
    output.push_str(&format!(
        "  Rate:     {}\n",
        item.rate.format_with_symbol(currency_symbol)
    ));
    output.push_str(&format!(
        "  Total:    {}\n",
        item.total.format_with_symbol(currency_symbol)
    ));
    output.push_str(&format!("  Status:   {}\n", item.status));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_format_labor_list() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let items = vec![
            LaborItem::new("Leo", date, 6.0, Money::from_cents(3000)),
            LaborItem::new("Mia", date, 1.5, Money::from_cents(2000)),
        ];

        let output = format_labor_list(&items, "$");
        assert!(output.contains("Leo"));
        assert!(output.contains("$180.00"));
        assert!(output.contains("1.50"));
        assert!(output.contains("2 entries, total $210.00"));
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(format_labor_list(&[], "$"), "No labor entries found.\n");
    }
}
