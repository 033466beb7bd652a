//! Custom error types for the back-office ledger
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for ledger operations
#[derive(Error, Debug)]
pub enum BackofficeError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for user input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// An identifier prefix matched more than one record
    #[error("{entity_type} identifier '{identifier}' is ambiguous ({matches} matches)")]
    AmbiguousId {
        entity_type: &'static str,
        identifier: String,
        matches: usize,
    },

    /// A second draft invoice would violate the single-draft rule
    #[error("Another draft invoice already exists. You can't have more than one draft at a time.")]
    DraftExists,

    /// Finalizing a draft with no unbilled items
    #[error("Cannot finalize an empty invoice. Delete it instead.")]
    EmptyInvoice,

    /// Record is part of a paid invoice and must stay intact
    #[error("Cannot delete {entity_type} {identifier}: referenced by a paid invoice. Revert the invoice to draft or delete it first.")]
    ReferencedByPaidInvoice {
        entity_type: &'static str,
        identifier: String,
    },

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl BackofficeError {
    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error guards one of the invoice invariants
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            Self::DraftExists | Self::EmptyInvoice | Self::ReferencedByPaidInvoice { .. }
        )
    }
}

impl From<std::io::Error> for BackofficeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BackofficeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for BackofficeError {
    fn from(err: csv::Error) -> Self {
        Self::Import(err.to_string())
    }
}

/// Result type alias for ledger operations
pub type BackofficeResult<T> = Result<T, BackofficeError>;
