//! Semantic column kinds
//!
//! A column kind is what a publish column "means", independent of how a
//! particular database spells the type.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::sql::rust_type_to_pg_type;

/// Semantic type of a database column
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKind {
    Boolean,
    Date,
    DateTime,
    /// Any other type, keeping the database spelling for error messages
    Other(String),
}

impl ColumnKind {
    /// Classify a PostgreSQL type name
    ///
    /// Accepts both DDL spellings (`TIMESTAMPTZ`) and the `data_type` values
    /// reported by `information_schema.columns` (`timestamp with time zone`).
    pub fn from_pg_type(pg_type: &str) -> Self {
        let lowered = pg_type.trim().to_ascii_lowercase();
        match lowered.as_str() {
            "boolean" | "bool" => ColumnKind::Boolean,
            "date" => ColumnKind::Date,
            "timestamp"
            | "timestamptz"
            | "timestamp with time zone"
            | "timestamp without time zone" => ColumnKind::DateTime,
            _ => ColumnKind::Other(pg_type.trim().to_string()),
        }
    }

    /// Classify a Rust field type as written in a struct definition
    pub fn from_rust_type(rust_type: &str) -> Self {
        Self::from_pg_type(rust_type_to_pg_type(rust_type))
    }

    /// Date and datetime columns carry a moment and can be ordered
    pub fn is_temporal(&self) -> bool {
        matches!(self, ColumnKind::Date | ColumnKind::DateTime)
    }

    pub fn as_str(&self) -> &str {
        match self {
            ColumnKind::Boolean => "boolean",
            ColumnKind::Date => "date",
            ColumnKind::DateTime => "datetime",
            ColumnKind::Other(name) => name,
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
