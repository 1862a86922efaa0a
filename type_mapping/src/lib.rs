//! Unified type mapping between Rust types, PostgreSQL types and column kinds
//! This crate provides the mapping logic shared by the derive macro and the runtime

pub mod kind;
pub mod sql;

pub use kind::ColumnKind;
pub use sql::{is_optional_type, normalize_rust_type, rust_type_to_pg_type};
