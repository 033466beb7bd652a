//! Unbilled item consolidation
//!
//! Derives the invoice lines that a draft invoice shows: unpaid labor is
//! consolidated per worker name, unpaid materials become one line each.

use std::collections::HashMap;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::{
    Invoice, InvoiceItem, LaborItem, LineKind, MaterialItem, Money, PaymentStatus,
};

/// Running totals for one consolidated labor group
struct LaborGroup {
    key: String,
    name: String,
    date: NaiveDate,
    hours: f64,
    amount: Money,
    ids: Vec<Uuid>,
}

/// Build the list of unbilled invoice lines
///
/// Unpaid labor with a name is grouped by lower-cased name. Each group sums
/// hours and totals and keeps the latest date; its title uses the first
/// row's spelling. Unpaid materials map to one line each. The result is
/// stable-sorted ascending by date.
pub fn consolidate_unbilled(labor: &[LaborItem], materials: &[MaterialItem]) -> Vec<InvoiceItem> {
    let mut groups: Vec<LaborGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in labor
        .iter()
        .filter(|l| l.status == PaymentStatus::Unpaid && !l.name.trim().is_empty())
    {
        let key = item.name.to_lowercase();
        match index.get(&key) {
            Some(&i) => {
                let group = &mut groups[i];
                group.hours += item.hours;
                group.amount += item.total;
                if item.date > group.date {
                    group.date = item.date;
                }
                group.ids.push(*item.id.as_uuid());
            }
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(LaborGroup {
                    key,
                    name: item.name.clone(),
                    date: item.date,
                    hours: item.hours,
                    amount: item.total,
                    ids: vec![*item.id.as_uuid()],
                });
            }
        }
    }

    let mut items: Vec<InvoiceItem> = groups
        .into_iter()
        .map(|g| InvoiceItem {
            id: format!("inv-lab-{}", g.key.replace(char::is_whitespace, "-")),
            title: format!("{} (Labor - {:.2} hrs)", g.name, g.hours),
            date: g.date,
            amount: g.amount,
            status: PaymentStatus::Unpaid,
            link_url: None,
            original_ids: g.ids,
            kind: LineKind::Labor,
        })
        .collect();

    items.extend(
        materials
            .iter()
            .filter(|m| m.status == PaymentStatus::Unpaid)
            .map(|m| InvoiceItem {
                id: format!("inv-mat-{}", m.id.as_uuid()),
                title: m.name.clone(),
                date: m.date,
                amount: m.total,
                status: PaymentStatus::Unpaid,
                link_url: m.link_url.clone(),
                original_ids: vec![*m.id.as_uuid()],
                kind: LineKind::Material,
            }),
    );

    items.sort_by_key(|i| i.date);
    items
}

/// Sum of the amounts of a list of invoice lines
pub fn unbilled_total(items: &[InvoiceItem]) -> Money {
    items.iter().map(|i| i.amount).sum()
}

/// How an invoice should be shown
///
/// A draft follows the live unbilled list; a paid invoice shows what was
/// frozen onto it when it was finalized.
pub fn draft_view(invoice: &Invoice, unbilled: &[InvoiceItem]) -> Invoice {
    let mut view = invoice.clone();
    if invoice.is_draft() {
        view.items = unbilled.to_vec();
        view.total = unbilled_total(unbilled);
    }
    view
}
