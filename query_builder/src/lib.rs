//! Query builder utilities
//!
//! Lazy, composable query descriptors. Nothing in this crate talks to a
//! database: a store turns a `QueryBuilder` into SQL (see `SqlGenerator`)
//! or evaluates it some other way.

pub mod builder;
pub mod filter;
pub mod ordering;
pub mod sql_generation;

#[cfg(test)]
mod tests;

pub use builder::QueryBuilder;
pub use filter::{QueryCondition, QueryFilter, QueryOperator};
pub use ordering::SortOrder;
pub use sql_generation::SqlGenerator;
