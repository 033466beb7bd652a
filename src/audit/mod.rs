//! Audit trail for the back-office ledger
//!
//! Every mutation appends a line to `audit.log`. Single-record edits carry a
//! field-level change list; invoice transitions, imports and bulk deletes
//! are written as one entry that lists the ids they touched.

mod diff;
mod entry;
mod logger;

pub use diff::field_changes;
pub use entry::{Action, AuditEntry};
pub use logger::AuditLogger;
