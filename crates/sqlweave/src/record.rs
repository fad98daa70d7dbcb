//! Record types: structs whose fields map to columns.
//!
//! Implemented by `#[derive(Record)]`. The field table is static: each
//! [`FieldDef`] carries the declared name, the raw tag string from
//! `#[orm(...)]`, and the declared type. Column names are not computed here;
//! the [`Catalog`](crate::Catalog) derives them.

use crate::value::{TypeRef, Value, ValueError};

/// One declared field of a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    /// Raw tag, e.g. `"column=user_id;type=integer;suffix=primary key"`.
    pub tag: &'static str,
    pub ty: TypeRef,
}

impl FieldDef {
    pub const fn new(name: &'static str, tag: &'static str, ty: TypeRef) -> Self {
        Self { name, tag, ty }
    }
}

/// A struct whose fields can be written as parameters and read back from rows.
///
/// Field indices are declaration order and match [`Record::fields`].
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
///     #[orm(ignore)]
///     cache: Vec<u8>,
/// }
/// ```
pub trait Record: Send + Sync + 'static {
    /// Type name used in diagnostics.
    fn record_name() -> &'static str;

    fn fields() -> Vec<FieldDef>;

    /// Current value of the field at `index`; `None` for ignored fields and
    /// out-of-range indices.
    fn field_value(&self, index: usize) -> Option<Value>;

    /// Overwrite the field at `index`. Ignored fields and out-of-range
    /// indices are left untouched.
    fn set_field_value(&mut self, index: usize, value: Value) -> Result<(), ValueError>;
}
