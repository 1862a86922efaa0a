//! # publishable
//!
//! Publish/unpublish semantics for database models. One column of a model,
//! boolean, date or datetime, is bound as the publish indicator; the
//! resulting `Publisher` answers "is this record published?", publishes and
//! unpublishes records, and builds the `published`, `unpublished`, `recent`
//! and `upcoming` query scopes.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use publishable::prelude::*;
//!
//! #[model]
//! #[table(name = "albums")]
//! pub struct Album {
//!     #[primary_key]
//!     pub id: i64,
//!     pub title: String,
//!     pub published_at: Option<DateTime<Utc>>,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let albums = Publisher::<Album>::new(&BindOptions::new())?;
//!     let store = MemoryStore::<Album>::new();
//!
//!     let mut album = Album { id: 1, title: "Debut".to_string(), published_at: None };
//!     albums.publish_and_save(&mut album, &store).await?;
//!
//!     let recent = store.find(albums.temporal().unwrap().recent(Some(10))).await?;
//!     println!("{} recent albums", recent.len());
//!     Ok(())
//! }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod arg;
pub mod binding;
pub mod errors;
pub mod moment;
pub mod prelude;
pub mod publisher;
pub mod schema;
pub mod scope;
pub mod store;
pub mod value;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Re-export the main public types for convenience
pub use arg::PublishArg;
pub use binding::{bind, bind_schema, BindOptions, PublishBinding, PublishKind, DEFAULT_COLUMNS};
pub use errors::PublishableError;
pub use moment::{Clock, FixedClock, Moment, SystemClock};
pub use publisher::{Publisher, TemporalScopes};
pub use schema::{ColumnAccess, ColumnDef, ModelSchema, TableSchema};
pub use store::{MemoryStore, PgStore, RecordStore};
pub use value::{ColumnValue, ColumnValueType};

// Re-export centralized config
pub use config::{AppConfig, ConfigError, DatabaseConfig, MissingColumnPolicy, PublishableConfig};

// Re-export internal crates used by macros and public API
// These MUST be public for the generated macro code to work correctly
pub use model_derive::{model, PublishModel};
pub use query_builder;
pub use serde_json;
pub use type_mapping;
pub use type_mapping::ColumnKind;

// Re-export external dependencies used in public API
pub use async_trait;
pub use sqlx;
