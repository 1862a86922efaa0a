//! Convenience re-exports for common publishable usage
//!
//! ```rust
//! use publishable::prelude::*;
//!
//! let options = BindOptions::new().on("published_at");
//! assert_eq!(options.column.as_deref(), Some("published_at"));
//! ```

pub use crate::arg::PublishArg;
pub use crate::binding::{bind, bind_schema, BindOptions, PublishBinding, PublishKind};
pub use crate::errors::PublishableError;
pub use crate::moment::{Clock, FixedClock, Moment, SystemClock};
pub use crate::publisher::{Publisher, TemporalScopes};
pub use crate::schema::{ColumnAccess, ColumnDef, ModelSchema, TableSchema};
pub use crate::store::{
    connect, connect_options, introspect_table, MemoryStore, PgStore, RecordStore,
};
pub use crate::value::{ColumnValue, ColumnValueType};

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, MissingColumnPolicy, PublishableConfig};

pub use query_builder::{QueryBuilder, QueryFilter, SortOrder};
pub use type_mapping::ColumnKind;

pub use model_derive::{model, PublishModel};

// Common external dependencies
pub use anyhow;
pub use async_trait;
pub use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
pub use sqlx;
pub use tokio;

pub use sqlx::{FromRow, PgPool};
