//! User settings for the back-office ledger
//!
//! Manages display preferences and invoice numbering.

use serde::{Deserialize, Serialize};

use super::paths::BackofficePaths;
use crate::error::BackofficeError;

/// User settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used when printing amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format) for terminal output
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Prefix of suggested invoice numbers
    #[serde(default = "default_invoice_prefix")]
    pub invoice_prefix: String,

    /// Zero-padded width of the numeric part of suggested invoice numbers
    #[serde(default = "default_invoice_number_width")]
    pub invoice_number_width: usize,

    /// Author recorded on comments created by CSV import
    #[serde(default = "default_import_author")]
    pub import_author: String,

    /// Number of tasks listed under "recent tasks" on the dashboard
    #[serde(default = "default_recent_task_count")]
    pub recent_task_count: usize,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "₱".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_invoice_prefix() -> String {
    "INV-".to_string()
}

fn default_invoice_number_width() -> usize {
    3
}

fn default_import_author() -> String {
    "Imported".to_string()
}

fn default_recent_task_count() -> usize {
    5
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            invoice_prefix: default_invoice_prefix(),
            invoice_number_width: default_invoice_number_width(),
            import_author: default_import_author(),
            recent_task_count: default_recent_task_count(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &BackofficePaths) -> Result<Self, BackofficeError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                BackofficeError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                BackofficeError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &BackofficePaths) -> Result<(), BackofficeError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            BackofficeError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            BackofficeError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.invoice_prefix, "INV-");
        assert_eq!(settings.invoice_number_width, 3);
        assert_eq!(settings.import_author, "Imported");
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BackofficePaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.currency_symbol = "$".into();
        settings.invoice_prefix = "B-".into();
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.currency_symbol, "$");
        assert_eq!(loaded.invoice_prefix, "B-");
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let loaded: Settings = serde_json::from_str(r#"{"currency_symbol": "€"}"#).unwrap();
        assert_eq!(loaded.currency_symbol, "€");
        assert_eq!(loaded.schema_version, 1);
        assert_eq!(loaded.recent_task_count, 5);
    }
}
