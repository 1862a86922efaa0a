//! Procedural macros for publishable models
//!
//! This crate provides the `#[model]` attribute and the `PublishModel` derive,
//! which generate the schema metadata (`ModelSchema`) and the per-column value
//! access (`ColumnAccess`) that publish bindings need.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod codegen;
mod model_macro;
mod parsing;

use codegen::{generate_column_access_impl, generate_model_schema_impl};
use model_macro::model_attribute;
use parsing::{parse_field_attributes, parse_table_attributes};

/// Derive macro for `ModelSchema` and `ColumnAccess`
///
/// Every named field becomes a column. Fields typed `bool`, `NaiveDate`,
/// `NaiveDateTime` or `DateTime<Utc>` (optionally wrapped in `Option`) are
/// readable and writable through `ColumnAccess`.
///
/// ```rust,ignore
/// #[derive(Debug, Clone, serde::Serialize, PublishModel)]
/// #[table(name = "albums")]
/// pub struct Album {
///     #[primary_key]
///     pub id: Uuid,
///     pub title: String,
///     pub published_at: Option<DateTime<Utc>>,
/// }
/// ```
#[proc_macro_derive(PublishModel, attributes(table, primary_key))]
pub fn derive_publish_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = &input.ident;

    let table_info = match parse_table_attributes(&input.attrs) {
        Ok(attrs) => attrs,
        Err(e) => return e.to_compile_error().into(),
    };

    let field_info = match parse_field_attributes(&input.data) {
        Ok(info) => info,
        Err(e) => return e.to_compile_error().into(),
    };

    let model_schema_impl = generate_model_schema_impl(name, &table_info, &field_info);
    let column_access_impl = generate_column_access_impl(name, &field_info);

    let expanded = quote::quote! {
        #model_schema_impl
        #column_access_impl
    };

    TokenStream::from(expanded)
}

/// Convenience attribute macro that adds all derives a stored publishable model needs
///
/// ```rust,ignore
/// #[model]
/// #[table(name = "posts")]
/// pub struct Post {
///     #[primary_key]
///     pub id: i64,
///     pub published: bool,
/// }
/// ```
#[proc_macro_attribute]
pub fn model(attr: TokenStream, item: TokenStream) -> TokenStream {
    model_attribute(attr, item)
}
