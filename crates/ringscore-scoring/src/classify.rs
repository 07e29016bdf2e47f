use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TableError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassEntry {
    pub min_total: u64,
    pub label: String,
}

/// Result of classifying a session total.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Total is below the lowest threshold.
    Unclassified,
    Label(String),
}

impl Classification {
    pub fn label(&self) -> Option<&str> {
        match self {
            Classification::Unclassified => None,
            Classification::Label(l) => Some(l),
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Unclassified => f.write_str("unclassified"),
            Classification::Label(l) => f.write_str(l),
        }
    }
}

/// Thresholds ordered by ascending `min_total`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ClassEntry>", into = "Vec<ClassEntry>")]
pub struct ClassificationTable {
    entries: Vec<ClassEntry>,
}

impl ClassificationTable {
    pub fn new(entries: Vec<ClassEntry>) -> Result<Self, TableError> {
        if entries.is_empty() {
            return Err(TableError::Empty);
        }
        if let Some(index) =
            (1..entries.len()).find(|&i| entries[i].min_total <= entries[i - 1].min_total)
        {
            return Err(TableError::NotAscending { index });
        }
        Ok(Self { entries })
    }

    pub fn from_pairs(pairs: &[(u64, &str)]) -> Result<Self, TableError> {
        Self::new(
            pairs
                .iter()
                .map(|&(min_total, label)| ClassEntry {
                    min_total,
                    label: label.to_string(),
                })
                .collect(),
        )
    }

    pub fn entries(&self) -> &[ClassEntry] {
        &self.entries
    }

    /// Label of the highest threshold the total reaches.
    pub fn classify(&self, total: u64) -> Classification {
        self.entries
            .iter()
            .rev()
            .find(|e| total >= e.min_total)
            .map_or(Classification::Unclassified, |e| {
                Classification::Label(e.label.clone())
            })
    }
}

impl TryFrom<Vec<ClassEntry>> for ClassificationTable {
    type Error = TableError;

    fn try_from(entries: Vec<ClassEntry>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<ClassificationTable> for Vec<ClassEntry> {
    fn from(table: ClassificationTable) -> Self {
        table.entries
    }
}

/// Free-function form of [`ClassificationTable::classify`].
pub fn classify(total: u64, table: &ClassificationTable) -> Classification {
    table.classify(total)
}
