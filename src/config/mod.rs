//! Configuration module for the back-office ledger
//!
//! This module provides configuration management including:
//! - Platform-aware path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::BackofficePaths;
pub use settings::Settings;
