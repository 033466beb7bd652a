//! Status enums for billable records, tasks and invoices
//!
//! JSON storage uses snake_case names; CSV files and terminal output use the
//! human labels ("Paid", "Unpaid", "In Progress", "Completed", "Draft").

use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment status of a labor entry or material purchase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Paid,
}

impl PaymentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unpaid => "Unpaid",
            Self::Paid => "Paid",
        }
    }

    /// Parse a status label (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "paid" => Some(Self::Paid),
            "unpaid" => Some(Self::Unpaid),
            _ => None,
        }
    }

    pub fn is_paid(&self) -> bool {
        matches!(self, Self::Paid)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Workflow status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    InProgress,
    Completed,
    Unpaid,
    Paid,
}

impl TaskStatus {
    /// All statuses, in dashboard order
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Unpaid,
        TaskStatus::Paid,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Unpaid => "Unpaid",
            Self::Paid => "Paid",
        }
    }

    /// Parse a status label (case-insensitive; "in_progress" and
    /// "in-progress" are accepted as well)
    pub fn parse(s: &str) -> Option<Self> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == '_' || c == '-' { ' ' } else { c })
            .collect();
        match normalized.as_str() {
            "in progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "unpaid" => Some(Self::Unpaid),
            "paid" => Some(Self::Paid),
            _ => None,
        }
    }

    /// Finished tasks are never reported as overdue
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Completed | Self::Paid)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lifecycle status of an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    #[default]
    Draft,
    Paid,
}

impl InvoiceStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Paid => "Paid",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "paid" => Some(Self::Paid),
            _ => None,
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_status_parse() {
        assert_eq!(PaymentStatus::parse("Paid"), Some(PaymentStatus::Paid));
        assert_eq!(PaymentStatus::parse(" unpaid "), Some(PaymentStatus::Unpaid));
        assert_eq!(PaymentStatus::parse("settled"), None);
    }

    #[test]
    fn test_task_status_labels() {
        for status in TaskStatus::ALL {
            assert_eq!(TaskStatus::parse(status.label()), Some(status));
        }
        assert_eq!(TaskStatus::parse("in_progress"), Some(TaskStatus::InProgress));
        assert_eq!(TaskStatus::parse("Blocked"), None);
    }

    #[test]
    fn test_storage_names() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(serde_json::to_string(&InvoiceStatus::Draft).unwrap(), "\"draft\"");
    }
}
