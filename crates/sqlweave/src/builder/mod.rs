//! Statement builders.
//!
//! Each builder accumulates clauses through `&mut self` methods and turns
//! them into a [`Template`](crate::Template) on [`SqlBuilder::build`].
//! Accumulation never fails, except where a record has to be resolved
//! through the catalog; those methods return `OrmResult<&mut Self>`.
//! Checks that need the whole statement (parity, missing WHERE, ragged
//! batch rows) run in [`SqlBuilder::validate`], which the `fetch_*` and
//! `execute` helpers call before touching the database.

mod batch_insert;
mod columns;
mod delete;
mod insert;
mod select;
mod table;
mod traits;
mod update;

pub use batch_insert::BatchInsertBuilder;
pub use columns::ColumnFilter;
pub use delete::DeleteBuilder;
pub use insert::InsertBuilder;
pub use select::QueryBuilder;
pub use table::{TableBuilder, TableDef, batch_create_tables, batch_drop_tables};
pub use traits::{MutationBuilder, SqlBuilder};
pub use update::UpdateBuilder;

use crate::catalog::Column;

/// `select cols from table`; an empty column list selects `*`.
pub fn select(table: impl Into<String>, columns: &[&str]) -> QueryBuilder {
    let mut builder = QueryBuilder::new(table);
    builder.columns(columns);
    builder
}

pub fn insert(table: impl Into<String>) -> InsertBuilder {
    InsertBuilder::new(table)
}

pub fn update(table: impl Into<String>) -> UpdateBuilder {
    UpdateBuilder::new(table)
}

pub fn delete(table: impl Into<String>) -> DeleteBuilder {
    DeleteBuilder::new(table)
}

pub fn batch_insert(table: impl Into<String>) -> BatchInsertBuilder {
    BatchInsertBuilder::new(table)
}

pub fn create_table(table: impl Into<String>, columns: Vec<Column>) -> TableBuilder {
    let mut builder = TableBuilder::new();
    builder.create_table(table, columns);
    builder
}

pub fn drop_table(table: impl Into<String>) -> TableBuilder {
    let mut builder = TableBuilder::new();
    builder.drop_table(table);
    builder
}

#[cfg(test)]
mod tests;
