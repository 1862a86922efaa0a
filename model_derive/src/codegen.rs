//! Code generation for `ModelSchema` and `ColumnAccess`
//!
//! Generated code refers to the runtime crate as `::publishable`.

use proc_macro2::TokenStream;
use quote::quote;
use syn::Ident;
use type_mapping::{is_optional_type, normalize_rust_type, rust_type_to_pg_type};

use crate::parsing::{ColumnField, FieldInfo, TableInfo};

/// Field types that can carry publish state, with or without `Option`
const ACCESSIBLE_TYPES: &[&str] = &["bool", "NaiveDate", "NaiveDateTime", "DateTime<Utc>"];

fn is_accessible(column: &ColumnField) -> bool {
    let normalized = normalize_rust_type(&column.rust_type);
    let base = normalized
        .strip_prefix("Option<")
        .and_then(|inner| inner.strip_suffix('>'))
        .unwrap_or(&normalized);
    ACCESSIBLE_TYPES.contains(&base)
}

pub fn generate_model_schema_impl(
    name: &Ident,
    table_info: &TableInfo,
    field_info: &FieldInfo,
) -> TokenStream {
    let table_name = &table_info.name;

    let primary_key = match &field_info.primary_key {
        Some(ident) => {
            let pk_name = ident.to_string();
            quote! { ::core::option::Option::Some(#pk_name) }
        }
        None => quote! { ::core::option::Option::None },
    };

    let column_defs = field_info.columns.iter().map(|column| {
        let column_name = &column.name;
        let sql_type = rust_type_to_pg_type(&column.rust_type);
        let nullable = is_optional_type(&column.rust_type);
        quote! {
            ::publishable::ColumnDef::new(#column_name, #sql_type, #nullable)
        }
    });

    quote! {
        impl ::publishable::ModelSchema for #name {
            fn table_name() -> &'static str {
                #table_name
            }

            fn primary_key() -> ::core::option::Option<&'static str> {
                #primary_key
            }

            fn columns() -> ::std::vec::Vec<::publishable::ColumnDef> {
                ::std::vec![#(#column_defs),*]
            }
        }
    }
}

pub fn generate_column_access_impl(name: &Ident, field_info: &FieldInfo) -> TokenStream {
    let accessible: Vec<&ColumnField> = field_info
        .columns
        .iter()
        .filter(|column| is_accessible(column))
        .collect();

    let read_arms = accessible.iter().map(|column| {
        let column_name = &column.name;
        let ident = &column.ident;
        let ty = &column.ty;
        quote! {
            #column_name => ::core::option::Option::Some(
                <#ty as ::publishable::ColumnValueType>::to_column_value(&self.#ident)
            ),
        }
    });

    let write_arms = accessible.iter().map(|column| {
        let column_name = &column.name;
        let ident = &column.ident;
        let ty = &column.ty;
        quote! {
            #column_name => match <#ty as ::publishable::ColumnValueType>::from_column_value(value) {
                ::core::option::Option::Some(converted) => {
                    self.#ident = converted;
                    true
                }
                ::core::option::Option::None => false,
            },
        }
    });

    let primary_key_value = field_info.primary_key.as_ref().map(|pk| {
        quote! {
            fn primary_key_value(&self) -> ::publishable::serde_json::Value {
                ::publishable::serde_json::to_value(&self.#pk)
                    .unwrap_or(::publishable::serde_json::Value::Null)
            }
        }
    });

    quote! {
        impl ::publishable::ColumnAccess for #name {
            fn read_column(&self, column: &str) -> ::core::option::Option<::publishable::ColumnValue> {
                match column {
                    #(#read_arms)*
                    _ => ::core::option::Option::None,
                }
            }

            fn write_column(&mut self, column: &str, value: ::publishable::ColumnValue) -> bool {
                match column {
                    #(#write_arms)*
                    _ => {
                        let _ = value;
                        false
                    }
                }
            }

            #primary_key_value
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::{parse_field_attributes, parse_table_attributes};

    fn expand(input: syn::DeriveInput) -> (String, String) {
        let table = parse_table_attributes(&input.attrs).expect("table attribute");
        let fields = parse_field_attributes(&input.data).expect("named fields");
        (
            generate_model_schema_impl(&input.ident, &table, &fields).to_string(),
            generate_column_access_impl(&input.ident, &fields).to_string(),
        )
    }

    #[test]
    fn test_schema_lists_every_column_with_sql_type() {
        let (schema, _) = expand(syn::parse_quote! {
            #[table(name = "albums")]
            struct Album {
                #[primary_key]
                id: i64,
                title: String,
                published_at: Option<chrono::DateTime<chrono::Utc>>,
            }
        });

        assert!(schema.contains("\"albums\""));
        assert!(schema.contains("\"id\" , \"BIGINT\" , false"));
        assert!(schema.contains("\"title\" , \"VARCHAR\" , false"));
        assert!(schema.contains("\"published_at\" , \"TIMESTAMP WITH TIME ZONE\" , true"));
    }

    #[test]
    fn test_access_only_covers_publishable_types() {
        let (_, access) = expand(syn::parse_quote! {
            #[table(name = "posts")]
            struct Post {
                #[primary_key]
                id: i64,
                title: String,
                published: bool,
                public_since: Option<NaiveDate>,
            }
        });

        assert!(access.contains("\"published\" =>"));
        assert!(access.contains("\"public_since\" =>"));
        assert!(!access.contains("\"title\" =>"));
        assert!(access.contains("fn primary_key_value"));
    }

    #[test]
    fn test_no_primary_key_keeps_default_value() {
        let (schema, access) = expand(syn::parse_quote! {
            #[table(name = "settings")]
            struct Setting {
                enabled: bool,
            }
        });

        assert!(schema.contains(":: core :: option :: Option :: None"));
        assert!(!access.contains("fn primary_key_value"));
    }
}
