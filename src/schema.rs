//! Model schema metadata and column access
//!
//! `ModelSchema` describes a model's table; `ColumnAccess` reads and writes
//! individual column values on an instance. Both are normally generated by
//! `#[derive(PublishModel)]`, but can be written by hand for models the
//! derive does not fit.

use serde::{Deserialize, Serialize};
use type_mapping::ColumnKind;

use crate::value::ColumnValue;

/// One column of a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    /// Database spelling of the type, e.g. `TIMESTAMP WITH TIME ZONE`
    pub sql_type: String,
    pub kind: ColumnKind,
    pub nullable: bool,
}

impl ColumnDef {
    pub fn new(name: &str, sql_type: &str, nullable: bool) -> Self {
        Self {
            name: name.to_string(),
            sql_type: sql_type.to_string(),
            kind: ColumnKind::from_pg_type(sql_type),
            nullable,
        }
    }
}

/// Column metadata for one table, as known at bind time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub table: String,
    pub primary_key: Option<String>,
    pub columns: Vec<ColumnDef>,
    /// Whether the table exists in the database
    pub materialized: bool,
}

impl TableSchema {
    pub fn new(table: &str, columns: Vec<ColumnDef>) -> Self {
        Self {
            table: table.to_string(),
            primary_key: None,
            columns,
            materialized: true,
        }
    }

    /// Schema for a table that does not exist (yet)
    pub fn unmaterialized(table: &str) -> Self {
        Self {
            table: table.to_string(),
            primary_key: None,
            columns: Vec::new(),
            materialized: false,
        }
    }

    pub fn with_primary_key(mut self, primary_key: &str) -> Self {
        self.primary_key = Some(primary_key.to_string());
        self
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }
}

/// Static table metadata of a model type
pub trait ModelSchema {
    fn table_name() -> &'static str;

    fn primary_key() -> Option<&'static str> {
        None
    }

    fn columns() -> Vec<ColumnDef>;

    fn table_schema() -> TableSchema {
        TableSchema {
            table: Self::table_name().to_string(),
            primary_key: Self::primary_key().map(str::to_string),
            columns: Self::columns(),
            materialized: true,
        }
    }
}

/// Per-instance access to publish-capable columns
pub trait ColumnAccess {
    /// Current value of `column`, or `None` when the column is not accessible
    fn read_column(&self, column: &str) -> Option<ColumnValue>;

    /// Store `value` into `column`. Returns false when the column is not
    /// accessible or cannot hold the value (e.g. NULL into a non-optional field).
    fn write_column(&mut self, column: &str, value: ColumnValue) -> bool;

    /// Primary key as JSON; `Null` when the model has none
    fn primary_key_value(&self) -> serde_json::Value {
        serde_json::Value::Null
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_def_classifies_type() {
        let column = ColumnDef::new("published_at", "timestamp with time zone", true);
        assert_eq!(column.kind, ColumnKind::DateTime);
        assert!(column.nullable);

        let column = ColumnDef::new("title", "VARCHAR", false);
        assert_eq!(column.kind, ColumnKind::Other("VARCHAR".to_string()));
    }

    #[test]
    fn test_table_schema_lookup() {
        let schema = TableSchema::new(
            "albums",
            vec![
                ColumnDef::new("id", "BIGINT", false),
                ColumnDef::new("published_at", "TIMESTAMP WITH TIME ZONE", true),
            ],
        )
        .with_primary_key("id");

        assert!(schema.materialized);
        assert!(schema.has_column("published_at"));
        assert!(!schema.has_column("published"));
        assert_eq!(schema.primary_key.as_deref(), Some("id"));
    }

    #[test]
    fn test_unmaterialized_schema_is_empty() {
        let schema = TableSchema::unmaterialized("albums");
        assert!(!schema.materialized);
        assert!(schema.columns.is_empty());
    }
}
