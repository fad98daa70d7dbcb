//! # sqlweave
//!
//! Composable SQL templates with positional parameters, plus record mapping.
//!
//! ## Features
//!
//! - **Templates**: a [`Template`] is SQL text with `?` placeholders and the
//!   values bound to them, in order. Templates compose by appending,
//!   wrapping and joining; an empty template vanishes from any join.
//! - **Builders**: SELECT / INSERT / UPDATE / DELETE / batch INSERT /
//!   CREATE and DROP TABLE, each producing a template on `build()`.
//! - **Records**: `#[derive(Record)]` structs are mapped to columns through
//!   a [`Catalog`] that caches per-type field metadata.
//! - **Dialects**: storage types for DDL come from a [`DialectRegistry`].
//! - **Rows**: results bind to records by column name, not position.
//! - **Safe defaults**: UPDATE and DELETE without WHERE need `all_rows()`.
//!
//! ## Example
//!
//! ```ignore
//! use sqlweave::prelude::*;
//!
//! #[derive(Debug, Default, Record)]
//! struct User {
//!     id: i64,
//!     #[orm(column = "user_name")]
//!     name: String,
//! }
//!
//! let db = Db::new(client);
//!
//! let mut q = select("users", &[]);
//! q.record_columns::<User>(db.catalog())?
//!     .and_where("id > ?", values![10])
//!     .limit(20);
//! let users: Vec<User> = q.fetch_all(&db).await?;
//!
//! let mut u = update("users");
//! u.set("user_name", "alice").and_where("id = ?", values![1]);
//! u.execute(&db).await?;
//! ```

extern crate self as sqlweave;

pub mod builder;
pub mod catalog;
pub mod client;
pub mod condition;
pub mod db;
pub mod dialect;
pub mod error;
pub mod expr;
pub mod prelude;
pub mod record;
pub mod rows;
pub mod template;
pub mod value;

#[cfg(feature = "postgres")]
pub mod pg;

pub use builder::{
    BatchInsertBuilder, DeleteBuilder, InsertBuilder, MutationBuilder, QueryBuilder, SqlBuilder,
    TableBuilder, TableDef, UpdateBuilder, batch_create_tables, batch_drop_tables, batch_insert,
    create_table, delete, drop_table, insert, select, update,
};
pub use catalog::{Catalog, CatalogConfig, Column, FieldDescriptor, RecordInfo, ZeroValues};
pub use client::{BufferedCursor, Cursor, Executor};
pub use condition::{Conditions, Junction};
pub use db::{Db, DbConfig};
pub use dialect::{DEFAULT_DIALECT, Dialect, DialectRegistry, Postgres, Sqlite};
pub use error::{OrmError, OrmResult};
pub use record::{FieldDef, Record};
pub use rows::{Flow, Rows, ValueMap};
pub use template::Template;
pub use value::{ColumnType, FromValue, TypeKind, TypeRef, Value, ValueError};

#[cfg(feature = "derive")]
pub use sqlweave_derive::Record;
