//! Executor and cursor traits: the boundary to a database driver.
//!
//! sqlweave never talks to a database itself. Anything that can run SQL text
//! with positional `?` parameters and hand back a cursor implements
//! [`Executor`]; a plain connection and a transaction implement it the same
//! way, so every builder works identically inside and outside transactions.

use crate::error::{OrmError, OrmResult};
use crate::value::Value;
use std::collections::VecDeque;

/// A forward-only result cursor.
pub trait Cursor {
    /// Column names of the result, in result order.
    fn columns(&self) -> &[String];

    /// Advance to the next row. Returns `false` once rows are exhausted.
    fn next(&mut self) -> OrmResult<bool>;

    /// Values of the current row, one per column.
    fn scan(&mut self) -> OrmResult<Vec<Value>>;

    /// Release the cursor. Closing twice is a no-op.
    fn close(&mut self) -> OrmResult<()>;
}

/// Runs SQL text with positional `?` parameters.
pub trait Executor: Send + Sync {
    type Cursor: Cursor + Send;

    /// Execute a statement and return the affected row count.
    fn execute(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<u64>> + Send;

    /// Run a query and return a cursor over its rows.
    fn query(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<Self::Cursor>> + Send;
}

impl<E: Executor> Executor for &E {
    type Cursor = E::Cursor;

    fn execute(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<u64>> + Send {
        (**self).execute(sql, params)
    }

    fn query(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl std::future::Future<Output = OrmResult<Self::Cursor>> + Send {
        (**self).query(sql, params)
    }
}

/// A cursor over rows already held in memory.
///
/// Used by executors that fetch eagerly (the tokio-postgres adapter) and by
/// tests.
#[derive(Debug, Clone, Default)]
pub struct BufferedCursor {
    columns: Vec<String>,
    rows: VecDeque<Vec<Value>>,
    current: Option<Vec<Value>>,
    closed: bool,
}

impl BufferedCursor {
    pub fn new<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        rows: impl IntoIterator<Item = Vec<Value>>,
    ) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: rows.into_iter().collect(),
            current: None,
            closed: false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Rows not yet consumed.
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }
}

impl Cursor for BufferedCursor {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn next(&mut self) -> OrmResult<bool> {
        if self.closed {
            return Err(OrmError::Other("cursor is closed".to_string()));
        }
        self.current = self.rows.pop_front();
        Ok(self.current.is_some())
    }

    fn scan(&mut self) -> OrmResult<Vec<Value>> {
        let row = self
            .current
            .take()
            .ok_or_else(|| OrmError::Other("scan called without a current row".to_string()))?;
        if row.len() != self.columns.len() {
            return Err(OrmError::decode(
                "*",
                format!("row has {} values for {} columns", row.len(), self.columns.len()),
            ));
        }
        Ok(row)
    }

    fn close(&mut self) -> OrmResult<()> {
        self.closed = true;
        self.rows.clear();
        self.current = None;
        Ok(())
    }
}
