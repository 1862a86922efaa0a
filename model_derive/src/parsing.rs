//! Parsing utilities for table and field attributes
//!
//! This module handles the parsing of `#[table]` and `#[primary_key]`
//! attributes and validation of table and column names.

use quote::quote;
use syn::{Attribute, Data, Error, Fields, Ident, Meta, Result, Type};

/// Validate table name and return syn::Error for better proc macro error handling
pub fn validate_table_name_syn(name: &str, span: proc_macro2::Span) -> Result<()> {
    validate_identifier(name)
        .map_err(|e| Error::new(span, format!("Invalid table name '{}': {}", name, e)))
}

/// Validate column name and return syn::Error for better proc macro error handling
pub fn validate_column_name_syn(name: &str, span: proc_macro2::Span) -> Result<()> {
    validate_identifier(name)
        .map_err(|e| Error::new(span, format!("Invalid column name '{}': {}", name, e)))
}

/// Column and table names end up verbatim in generated SQL, so only plain
/// PostgreSQL identifiers are accepted
fn validate_identifier(name: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("Name cannot be empty".to_string());
    }

    // PostgreSQL identifier limit
    if name.len() > 63 {
        return Err(format!(
            "Name '{}' is too long: {} characters (max 63)",
            name,
            name.len()
        ));
    }

    let first_char = name
        .chars()
        .next()
        .ok_or_else(|| "Name cannot be empty".to_string())?;
    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err(format!(
            "Name '{}' must start with a letter or underscore",
            name
        ));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!(
            "Name '{}' contains invalid characters: only alphanumeric characters and underscores are allowed",
            name
        ));
    }

    if is_reserved_keyword(name) {
        return Err(format!("Name '{}' is a reserved SQL keyword", name));
    }

    Ok(())
}

/// Check if a name is a reserved SQL keyword
fn is_reserved_keyword(name: &str) -> bool {
    const RESERVED_KEYWORDS: &[&str] = &[
        "ALL", "AND", "ANY", "AS", "ASC", "BETWEEN", "BY", "CASE", "CHECK", "COLUMN",
        "CONSTRAINT", "CREATE", "DEFAULT", "DELETE", "DESC", "DISTINCT", "DROP", "ELSE", "END",
        "EXISTS", "FALSE", "FOREIGN", "FROM", "GROUP", "HAVING", "IN", "INDEX", "INSERT", "INTO",
        "IS", "JOIN", "KEY", "LIKE", "LIMIT", "NOT", "NULL", "OFFSET", "ON", "OR", "ORDER",
        "PRIMARY", "REFERENCES", "RETURNING", "SELECT", "SET", "TABLE", "THEN", "TO", "TRUE",
        "UNION", "UNIQUE", "UPDATE", "USER", "USING", "WHEN", "WHERE", "WITH",
    ];

    RESERVED_KEYWORDS.contains(&name.to_ascii_uppercase().as_str())
}

#[derive(Debug)]
pub struct TableInfo {
    pub name: String,
}

/// One struct field mapped to a column
pub struct ColumnField {
    pub ident: Ident,
    pub name: String,
    /// Whitespace-free type as written, e.g. `Option<DateTime<Utc>>`
    pub rust_type: String,
    pub ty: Type,
}

pub struct FieldInfo {
    pub primary_key: Option<Ident>,
    pub columns: Vec<ColumnField>,
}

pub fn parse_table_attributes(attrs: &[Attribute]) -> Result<TableInfo> {
    let mut table_name = None;

    for attr in attrs {
        if !attr.path().is_ident("table") {
            continue;
        }

        if let Meta::List(meta_list) = &attr.meta {
            meta_list.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let value: syn::LitStr = meta.value()?.parse()?;
                    table_name = Some((value.value(), value.span()));
                    Ok(())
                } else {
                    Err(meta.error("unsupported table attribute, expected `name = \"...\"`"))
                }
            })?;
        }
    }

    let (name, span) = table_name.ok_or_else(|| {
        Error::new(
            proc_macro2::Span::call_site(),
            "table attribute is required: add #[table(name = \"table_name\")] to your struct",
        )
    })?;

    validate_table_name_syn(&name, span)?;

    Ok(TableInfo { name })
}

pub fn parse_field_attributes(data: &Data) -> Result<FieldInfo> {
    let fields_named = match data {
        Data::Struct(data_struct) => match &data_struct.fields {
            Fields::Named(fields_named) => fields_named,
            _ => {
                return Err(Error::new(
                    proc_macro2::Span::call_site(),
                    "PublishModel can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                proc_macro2::Span::call_site(),
                "PublishModel can only be derived for structs with named fields",
            ))
        }
    };

    let mut primary_key = None;
    let mut columns = Vec::new();

    for field in &fields_named.named {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new_spanned(field, "Field must have a name"))?;
        let field_name_str = field_name.to_string();

        validate_column_name_syn(&field_name_str, field_name.span())?;

        if has_attribute(&field.attrs, "primary_key") {
            if primary_key.is_some() {
                return Err(Error::new_spanned(
                    field,
                    "only one field can be marked #[primary_key]",
                ));
            }
            primary_key = Some(field_name.clone());
        }

        let ty = &field.ty;
        let rust_type = quote!(#ty).to_string().replace(' ', "");

        columns.push(ColumnField {
            ident: field_name.clone(),
            name: field_name_str,
            rust_type,
            ty: ty.clone(),
        });
    }

    Ok(FieldInfo {
        primary_key,
        columns,
    })
}

pub fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}
