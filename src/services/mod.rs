//! Service layer for the back-office ledger
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, computed fields, and cross-entity operations such
//! as keeping labor and material statuses in step with invoices.

pub mod billing;
pub mod confirm;
pub mod filter;
pub mod import;
pub mod invoice;
pub mod labor;
pub mod material;
pub mod reset;
pub mod task;

pub use billing::{consolidate_unbilled, draft_view, unbilled_total};
pub use confirm::{AssumeNo, AssumeYes, BulkOutcome, Confirm};
pub use filter::{ListFilter, Listable, SortDirection};
pub use import::{ImportResult, ImportService};
pub use invoice::{CreateInvoiceInput, InvoiceService, InvoiceUpdate};
pub use labor::{CreateLaborInput, LaborService, LaborUpdate};
pub use material::{CreateMaterialInput, MaterialService, MaterialUpdate};
pub use reset::reset_all;
pub use task::{CreateTaskInput, TaskService, TaskUpdate};
