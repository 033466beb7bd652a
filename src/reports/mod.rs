//! Reports module for the back-office ledger
//!
//! Currently the dashboard: cost breakdowns, monthly costs, task progress
//! and billing counts.

pub mod dashboard;

pub use dashboard::{DashboardReport, RecentTask};
