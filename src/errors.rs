//! Error types for the publishable crate
//!
//! This module contains all error types that can be returned by publishable operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PublishableError {
    /// Raised by `bind` only: missing column, unsupported column type or
    /// unmaterialized table
    #[error("Configuration error on model '{model}': {message}")]
    Configuration { model: String, message: String },

    #[error("Invalid publish argument '{input}': {message}")]
    InvalidArgument { input: String, message: String },

    #[error("Unsupported query on '{table}': {message}")]
    UnsupportedQuery { table: String, message: String },

    #[error("Record in '{table}' has no primary key value")]
    MissingPrimaryKey { table: String },

    #[error("Record not found in '{table}': {key}")]
    NotFound { table: String, key: String },

    #[error("Database error during {operation} on '{table}': {source}")]
    Database {
        table: String,
        operation: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Database connection error: {0}")]
    DatabaseConnection(#[from] sqlx::Error),
}

impl PublishableError {
    pub fn configuration(model: &str, message: impl Into<String>) -> Self {
        Self::Configuration {
            model: model.to_string(),
            message: message.into(),
        }
    }

    pub fn invalid_argument(input: &str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            input: input.to_string(),
            message: message.into(),
        }
    }

    pub fn unsupported_query(table: &str, message: impl Into<String>) -> Self {
        Self::UnsupportedQuery {
            table: table.to_string(),
            message: message.into(),
        }
    }

    pub fn database_operation(table: &str, operation: &str, source: sqlx::Error) -> Self {
        Self::Database {
            table: table.to_string(),
            operation: operation.to_string(),
            source,
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}
