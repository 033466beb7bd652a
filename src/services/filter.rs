//! Search, status filter and date sort for list views
//!
//! The same filtered view feeds both the terminal tables and CSV export.

use chrono::NaiveDate;

use crate::models::{Invoice, LaborItem, MaterialItem, Task};

/// Date sort order for a list view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

/// Filter applied to a list view
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    /// Case-insensitive substring matched against every displayed field
    pub search: Option<String>,
    /// Status label, e.g. "Unpaid" or "in progress"
    pub status: Option<String>,
    pub sort: SortDirection,
}

/// A record that can appear in a list view
pub trait Listable {
    fn list_date(&self) -> NaiveDate;
    fn status_label(&self) -> &'static str;
    fn search_fields(&self) -> Vec<String>;
}

impl Listable for LaborItem {
    fn list_date(&self) -> NaiveDate {
        self.date
    }

    fn status_label(&self) -> &'static str {
        self.status.label()
    }

    fn search_fields(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.date.to_string(),
            self.hours.to_string(),
            self.rate.to_string(),
            self.total.to_string(),
            self.status.label().to_string(),
        ]
    }
}

impl Listable for MaterialItem {
    fn list_date(&self) -> NaiveDate {
        self.date
    }

    fn status_label(&self) -> &'static str {
        self.status.label()
    }

    fn search_fields(&self) -> Vec<String> {
        let mut fields = vec![
            self.name.clone(),
            self.date.to_string(),
            self.quantity.to_string(),
            self.unit_price.to_string(),
            self.total.to_string(),
            self.status.label().to_string(),
        ];
        fields.extend(self.link_url.clone());
        fields.extend(self.comments.iter().map(|c| c.text.clone()));
        fields
    }
}

impl Listable for Task {
    fn list_date(&self) -> NaiveDate {
        self.date
    }

    fn status_label(&self) -> &'static str {
        self.status.label()
    }

    fn search_fields(&self) -> Vec<String> {
        let mut fields = vec![
            self.title.clone(),
            self.description.clone(),
            self.notes.clone(),
            self.date.to_string(),
            self.status.label().to_string(),
        ];
        fields.extend(self.due_date.map(|d| d.to_string()));
        fields.extend(self.comments.iter().map(|c| c.text.clone()));
        fields
    }
}

impl Listable for Invoice {
    fn list_date(&self) -> NaiveDate {
        self.date
    }

    fn status_label(&self) -> &'static str {
        self.status.label()
    }

    fn search_fields(&self) -> Vec<String> {
        vec![
            self.invoice_number.clone(),
            self.client.name.clone(),
            self.date.to_string(),
            self.total.to_string(),
            self.status.label().to_string(),
        ]
    }
}

fn normalize_status(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '_' || c == '-' { ' ' } else { c })
        .collect()
}

impl ListFilter {
    /// Whether a record passes the search and status filters
    pub fn matches<T: Listable>(&self, record: &T) -> bool {
        if let Some(status) = self.status.as_deref().filter(|s| !s.trim().is_empty()) {
            if normalize_status(status) != normalize_status(record.status_label()) {
                return false;
            }
        }

        match self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(needle) => {
                let needle = needle.to_lowercase();
                record
                    .search_fields()
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            }
            None => true,
        }
    }

    /// Filter and date-sort a list of records
    ///
    /// The sort is stable, so records on the same date keep their stored order.
    pub fn apply<T: Listable>(&self, records: Vec<T>) -> Vec<T> {
        let mut view: Vec<T> = records.into_iter().filter(|r| self.matches(r)).collect();
        match self.sort {
            SortDirection::Ascending => view.sort_by_key(|r| r.list_date()),
            SortDirection::Descending => view.sort_by(|a, b| b.list_date().cmp(&a.list_date())),
        }
        view
    }
}
