//! Back-office ledger for labor, materials, tasks and invoices
//!
//! This library provides the core functionality of the `backoffice` command:
//! recording labor and material costs, tracking tasks, and billing unpaid
//! work through a single draft invoice that is finalized into a paid one.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (labor, materials, tasks, invoices)
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer (billing, status transitions, import)
//! - `audit`: Audit logging system
//! - `export`: CSV export and full snapshots
//! - `reports`: Dashboard report
//! - `display`: Terminal formatting
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use backoffice::config::{paths::BackofficePaths, settings::Settings};
//!
//! let paths = BackofficePaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::BackofficeError;
