//! The four persisted collections, as named on the command line and in files

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// CSV header of the labor collection
pub const LABOR_CSV_HEADERS: [&str; 6] = ["name", "date", "hours", "rate", "total", "status"];

/// CSV header of the materials collection
pub const MATERIAL_CSV_HEADERS: [&str; 8] = [
    "name",
    "date",
    "quantity",
    "unitPrice",
    "total",
    "status",
    "linkUrl",
    "comments",
];

/// CSV header of the tasks collection
pub const TASK_CSV_HEADERS: [&str; 9] = [
    "title",
    "date",
    "dueDate",
    "status",
    "description",
    "notes",
    "imageUrl",
    "linkUrl",
    "comments",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    Labor,
    Materials,
    Tasks,
    Invoices,
}

impl CollectionKind {
    pub const ALL: [CollectionKind; 4] = [
        CollectionKind::Labor,
        CollectionKind::Materials,
        CollectionKind::Tasks,
        CollectionKind::Invoices,
    ];

    /// Name used in file names and on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Self::Labor => "labor",
            Self::Materials => "materials",
            Self::Tasks => "tasks",
            Self::Invoices => "invoices",
        }
    }

    /// CSV header row; invoices have no CSV form
    pub fn csv_headers(&self) -> Option<&'static [&'static str]> {
        match self {
            Self::Labor => Some(&LABOR_CSV_HEADERS),
            Self::Materials => Some(&MATERIAL_CSV_HEADERS),
            Self::Tasks => Some(&TASK_CSV_HEADERS),
            Self::Invoices => None,
        }
    }

    /// The column every imported row must name
    pub fn name_column(&self) -> &'static str {
        match self {
            Self::Tasks => "title",
            _ => "name",
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CollectionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "labor" | "labour" => Ok(Self::Labor),
            "materials" | "material" => Ok(Self::Materials),
            "tasks" | "task" => Ok(Self::Tasks),
            "invoices" | "invoice" => Ok(Self::Invoices),
            other => Err(format!(
                "Unknown collection '{}'. Expected labor, materials, tasks or invoices",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_collection() {
        assert_eq!("Labor".parse::<CollectionKind>().unwrap(), CollectionKind::Labor);
        assert_eq!("material".parse::<CollectionKind>().unwrap(), CollectionKind::Materials);
        assert!("payees".parse::<CollectionKind>().is_err());
    }

    #[test]
    fn test_headers() {
        assert_eq!(CollectionKind::Labor.csv_headers().unwrap().join(","), "name,date,hours,rate,total,status");
        assert!(CollectionKind::Invoices.csv_headers().is_none());
        assert_eq!(CollectionKind::Tasks.name_column(), "title");
    }
}
