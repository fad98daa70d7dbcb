//! Derive macros for sqlweave
//!
//! Provides `#[derive(Record)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod attrs;
mod record;

/// Derive the `Record` trait for a struct with named fields.
///
/// # Example
///
/// ```ignore
/// use sqlweave::Record;
///
/// #[derive(Debug, Default, Record)]
/// struct User {
///     #[orm(type = "integer", suffix = "primary key")]
///     id: i64,
///     #[orm(column = "user_name")]
///     name: String,
///     email: Option<String>,
///     #[orm(ignore)]
///     cache: Vec<u8>,
/// }
/// ```
///
/// # Attributes
///
/// - `#[orm(column = "name")]` - Map field to a different column name (`name = "..."` is an alias)
/// - `#[orm(type = "varchar(64)")]` - Storage type for DDL, overriding the dialect
/// - `#[orm(suffix = "not null")]` - Text appended after the type in DDL
/// - `#[orm(ignore)]` - Field has no column
///
/// Mapped fields need `Clone`, `Into<Value>` and `FromValue`; fields without
/// a `type` also need `ColumnType`.
#[proc_macro_derive(Record, attributes(orm))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
