//! Record stores
//!
//! A store is the persistence side a `Publisher` talks to: it materializes
//! scopes and saves records after `publish_and_save` / `unpublish_and_save`.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use query_builder::QueryBuilder;

pub use memory::MemoryStore;
pub use postgres::{connect, connect_options, introspect_table, PgStore};

#[async_trait]
pub trait RecordStore<T: Send + Sync>: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist the current state of `record`
    async fn save(&self, record: &T) -> Result<(), Self::Error>;

    /// Materialize `query`
    async fn find(&self, query: QueryBuilder) -> Result<Vec<T>, Self::Error>;
}
