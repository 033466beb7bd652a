//! Core data models for the back-office ledger
//!
//! This module contains the records kept by the ledger: labor entries,
//! material purchases, tasks and invoices, plus the value types they share.

pub mod collection;
pub mod comment;
pub mod ids;
pub mod invoice;
pub mod labor;
pub mod material;
pub mod money;
pub mod status;
pub mod task;

pub use collection::CollectionKind;
pub use comment::Comment;
pub use ids::{ChecklistItemId, CommentId, InvoiceId, LaborId, MaterialId, TaskId};
pub use invoice::{ClientInfo, Invoice, InvoiceItem, LineKind};
pub use labor::LaborItem;
pub use material::MaterialItem;
pub use money::Money;
pub use status::{InvoiceStatus, PaymentStatus, TaskStatus};
pub use task::{ChecklistItem, Task};
