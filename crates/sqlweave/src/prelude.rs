//! Convenient imports for typical `sqlweave` usage.
//!
//! ```ignore
//! use sqlweave::prelude::*;
//! ```

pub use crate::builder::{
    MutationBuilder, SqlBuilder, batch_insert, create_table, delete, drop_table, insert, select,
    update,
};
pub use crate::{
    Catalog, Column, Conditions, Db, DbConfig, Executor, Flow, OrmError, OrmResult, Record,
    Template, Value, ZeroValues, expr, values,
};
