//! One line of the audit trail

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{CollectionKind, Invoice};

/// What happened to the record (or collection) an entry names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Update,
    Delete,
    /// A draft invoice was finalized and its sources marked paid
    Bill,
    /// A paid invoice went back to draft, or was deleted, and its sources were released
    Release,
    /// Rows appended from a CSV file
    Import,
    /// Every record of a collection removed at once
    Clear,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Action::Create => "CREATE",
            Action::Update => "UPDATE",
            Action::Delete => "DELETE",
            Action::Bill => "BILL",
            Action::Release => "RELEASE",
            Action::Import => "IMPORT",
            Action::Clear => "CLEAR",
        };
        f.write_str(label)
    }
}

/// A single audit log entry
///
/// Record-level entries carry `record_id` and `label`. Collection-level
/// entries (imports, clears) leave them empty and list the touched ids in
/// `affected` instead. Invoice transitions put the labor and material ids
/// whose status moved in `affected`, so one line covers the whole batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub action: Action,
    pub collection: CollectionKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,

    /// Name, title or invoice number at the time of the action
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub affected: Vec<String>,

    /// Full record after a create, or before a delete
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<serde_json::Value>,
}

impl AuditEntry {
    fn new(action: Action, collection: CollectionKind) -> Self {
        Self {
            timestamp: Utc::now(),
            action,
            collection,
            record_id: None,
            label: None,
            changes: Vec::new(),
            affected: Vec::new(),
            snapshot: None,
        }
    }

    fn for_record(
        action: Action,
        collection: CollectionKind,
        record_id: String,
        label: String,
    ) -> Self {
        Self {
            record_id: Some(record_id),
            label: Some(label),
            ..Self::new(action, collection)
        }
    }

    pub fn created<T: Serialize>(
        collection: CollectionKind,
        record_id: String,
        label: String,
        record: &T,
    ) -> Self {
        Self {
            snapshot: serde_json::to_value(record).ok(),
            ..Self::for_record(Action::Create, collection, record_id, label)
        }
    }

    pub fn updated(
        collection: CollectionKind,
        record_id: String,
        label: String,
        changes: Vec<String>,
    ) -> Self {
        Self {
            changes,
            ..Self::for_record(Action::Update, collection, record_id, label)
        }
    }

    pub fn deleted<T: Serialize>(
        collection: CollectionKind,
        record_id: String,
        label: String,
        record: &T,
    ) -> Self {
        Self {
            snapshot: serde_json::to_value(record).ok(),
            ..Self::for_record(Action::Delete, collection, record_id, label)
        }
    }

    /// An invoice changing hands between draft and paid, or being deleted
    ///
    /// `affected` lists the labor and material ids whose status was flipped.
    pub fn invoice_transition(
        action: Action,
        before: &Invoice,
        after: Option<&Invoice>,
        affected: Vec<String>,
    ) -> Self {
        let mut changes = Vec::new();
        match after {
            Some(after) => {
                if before.status != after.status {
                    changes.push(format!("status: {} -> {}", before.status, after.status));
                }
                if before.total != after.total {
                    changes.push(format!("total: {} -> {}", before.total, after.total));
                }
                if before.items.len() != after.items.len() {
                    changes.push(format!(
                        "items: {} -> {}",
                        before.items.len(),
                        after.items.len()
                    ));
                }
            }
            None => changes.push(format!("deleted while {}", before.status)),
        }

        Self {
            changes,
            affected,
            ..Self::for_record(
                action,
                CollectionKind::Invoices,
                before.id.to_string(),
                before.invoice_number.clone(),
            )
        }
    }

    /// A whole-collection action: `Import` or `Clear`
    pub fn bulk(action: Action, collection: CollectionKind, ids: Vec<String>) -> Self {
        Self {
            affected: ids,
            ..Self::new(action, collection)
        }
    }

    /// One-line summary, with changes on a second line when present
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.action,
            self.collection
        );

        match (&self.record_id, &self.label) {
            (Some(id), Some(label)) => output.push_str(&format!(" {} ({})", id, label)),
            (Some(id), None) => output.push_str(&format!(" {}", id)),
            _ => {}
        }

        if !self.affected.is_empty() {
            let noun = if self.record_id.is_some() { "sources" } else { "records" };
            output.push_str(&format!(" [{} {}]", self.affected.len(), noun));
        }

        if !self.changes.is_empty() {
            output.push_str(&format!("\n  Changes: {}", self.changes.join(", ")));
        }

        output
    }
}
