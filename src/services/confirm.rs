//! Confirmation gate for destructive operations

/// Asks the user to approve a destructive operation
pub trait Confirm {
    /// Returns true only on an affirmative answer
    fn confirm(&self, prompt: &str) -> bool;
}

/// Approves every prompt (`--yes`)
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Declines every prompt
pub struct AssumeNo;

impl Confirm for AssumeNo {
    fn confirm(&self, _prompt: &str) -> bool {
        false
    }
}

/// Result of a bulk delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkOutcome {
    /// This many records were removed
    Deleted(usize),
    /// The collection was already empty
    NothingToDelete,
    /// The user declined the confirmation
    Cancelled,
}
