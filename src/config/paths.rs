//! Path management for the back-office ledger
//!
//! ## Path Resolution Order
//!
//! 1. `BACKOFFICE_DATA_DIR` environment variable (if set)
//! 2. The platform configuration directory (`~/.config/backoffice` on Linux,
//!    `~/Library/Application Support/backoffice` on macOS,
//!    `%APPDATA%\backoffice` on Windows)

use std::path::PathBuf;

use directories::BaseDirs;

use crate::error::BackofficeError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "BACKOFFICE_DATA_DIR";

/// Manages all paths used by the ledger
#[derive(Debug, Clone)]
pub struct BackofficePaths {
    /// Base directory for all ledger data
    base_dir: PathBuf,
}

impl BackofficePaths {
    /// Create a new BackofficePaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, BackofficeError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create BackofficePaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory holding the collection files
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    pub fn labor_file(&self) -> PathBuf {
        self.data_dir().join("laborData.json")
    }

    pub fn materials_file(&self) -> PathBuf {
        self.data_dir().join("materialsData.json")
    }

    pub fn tasks_file(&self) -> PathBuf {
        self.data_dir().join("tasksData.json")
    }

    pub fn invoices_file(&self) -> PathBuf {
        self.data_dir().join("invoicesData.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), BackofficeError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| BackofficeError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| BackofficeError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if the ledger has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, BackofficeError> {
    let dirs = BaseDirs::new()
        .ok_or_else(|| BackofficeError::Config("Could not determine home directory".into()))?;
    Ok(dirs.config_dir().join("backoffice"))
}
