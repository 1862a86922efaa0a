//! SQL type conversion utilities
//!
//! This module handles conversion between Rust type names
//! and their PostgreSQL equivalents.

/// Path prefixes that do not change the mapped type
const IGNORED_PREFIXES: &[&str] = &[
    "std::option::",
    "std::string::",
    "core::option::",
    "chrono::",
    "uuid::",
    "serde_json::",
    "rust_decimal::",
    "bigdecimal::",
];

/// Remove whitespace and well-known crate paths from a Rust type name
///
/// `Option < chrono :: DateTime < chrono :: Utc > >` becomes `Option<DateTime<Utc>>`.
pub fn normalize_rust_type(rust_type: &str) -> String {
    let mut normalized: String = rust_type.chars().filter(|c| !c.is_whitespace()).collect();
    for prefix in IGNORED_PREFIXES {
        normalized = normalized.replace(prefix, "");
    }
    normalized
}

/// Check if a Rust type is Optional (nullable in SQL)
pub fn is_optional_type(rust_type: &str) -> bool {
    let normalized = normalize_rust_type(rust_type);
    normalized.starts_with("Option<") && normalized.ends_with('>')
}

fn strip_option(normalized: &str) -> &str {
    normalized
        .strip_prefix("Option<")
        .and_then(|inner| inner.strip_suffix('>'))
        .unwrap_or(normalized)
}

/// Map Rust type names to PostgreSQL types
pub fn rust_type_to_pg_type(rust_type: &str) -> &'static str {
    let normalized = normalize_rust_type(rust_type);
    match strip_option(&normalized) {
        "Uuid" => "UUID",
        "String" | "&str" => "VARCHAR",
        "i8" | "i16" => "SMALLINT",
        "i32" => "INTEGER",
        "i64" => "BIGINT",
        "u16" => "INTEGER",
        "u32" => "BIGINT",
        "u64" => "NUMERIC(20,0)", // PostgreSQL doesn't have native u64
        "f32" => "REAL",
        "f64" => "DOUBLE PRECISION",
        "bool" => "BOOLEAN",
        "DateTime<Utc>" => "TIMESTAMP WITH TIME ZONE",
        "NaiveDateTime" => "TIMESTAMP",
        "NaiveDate" => "DATE",
        "Decimal" => "NUMERIC(28,10)",
        "BigDecimal" => "NUMERIC",
        "Value" => "JSONB",
        "Vec<String>" => "TEXT[]",
        _ => "VARCHAR", // default fallback
    }
}
