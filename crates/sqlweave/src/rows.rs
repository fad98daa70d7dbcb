//! Row materialization: cursors into maps, records and scalars.
//!
//! [`Rows`] owns a cursor and closes it on every exit path. Each `into_*`
//! method consumes the guard; if the guard is dropped without being
//! consumed, `Drop` closes the cursor and logs any failure.
//!
//! Record decoding binds result columns to fields by name through the
//! [`Catalog`], so result column order never has to match declaration
//! order. Columns with no matching field are read and discarded.

use crate::catalog::Catalog;
use crate::client::Cursor;
use crate::error::{OrmError, OrmResult};
use crate::record::Record;
use crate::value::{FromValue, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// One row as a column-name → value map.
pub type ValueMap = BTreeMap<String, Value>;

/// Whether [`Rows::scan_each`] should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Abort,
}

/// Scoped owner of a result cursor.
pub struct Rows<C: Cursor> {
    cursor: C,
    catalog: Arc<Catalog>,
    closed: bool,
}

impl<C: Cursor> Rows<C> {
    pub fn new(cursor: C, catalog: Arc<Catalog>) -> Self {
        Self {
            cursor,
            catalog,
            closed: false,
        }
    }

    pub fn columns(&self) -> &[String] {
        self.cursor.columns()
    }

    /// Call `f` with the column names and each row's values until the rows
    /// run out, `f` returns [`Flow::Abort`], or `f` fails.
    pub fn scan_each<F>(mut self, f: F) -> OrmResult<()>
    where
        F: FnMut(&[String], Vec<Value>) -> OrmResult<Flow>,
    {
        let result = self.read_each(f);
        self.finish(result)
    }

    /// First row as a map; [`OrmError::NotFound`] if there are no rows.
    pub fn into_map(mut self) -> OrmResult<ValueMap> {
        let result = self.read_first().map(|(columns, row)| to_map(&columns, row));
        self.finish(result)
    }

    pub fn into_maps(mut self) -> OrmResult<Vec<ValueMap>> {
        let mut maps = Vec::new();
        let result = self.read_each(|columns, row| {
            maps.push(to_map(columns, row));
            Ok(Flow::Continue)
        });
        self.finish(result.map(|()| maps))
    }

    /// First row as a record; [`OrmError::NotFound`] if there are no rows.
    pub fn into_record<R: Record + Default>(mut self) -> OrmResult<R> {
        let result = self.read_first_record();
        self.finish(result)
    }

    pub fn into_records<R: Record + Default>(mut self) -> OrmResult<Vec<R>> {
        let result = self.read_records();
        self.finish(result)
    }

    /// The single column of the first row; [`OrmError::NotFound`] if there
    /// are no rows.
    pub fn into_scalar<T: FromValue>(mut self) -> OrmResult<T> {
        let result = self.read_first_scalar();
        self.finish(result)
    }

    pub fn into_scalars<T: FromValue>(mut self) -> OrmResult<Vec<T>> {
        let result = self.read_scalars();
        self.finish(result)
    }

    /// Close the cursor and pick the error to report: the read error if
    /// there is one, otherwise the close error.
    fn finish<T>(&mut self, result: OrmResult<T>) -> OrmResult<T> {
        self.closed = true;
        let closed = self.cursor.close();
        let value = result?;
        closed?;
        Ok(value)
    }

    fn next_row(&mut self) -> OrmResult<Option<Vec<Value>>> {
        if !self.cursor.next()? {
            return Ok(None);
        }
        self.cursor.scan().map(Some)
    }

    fn read_each<F>(&mut self, mut f: F) -> OrmResult<()>
    where
        F: FnMut(&[String], Vec<Value>) -> OrmResult<Flow>,
    {
        let columns = self.cursor.columns().to_vec();
        while let Some(row) = self.next_row()? {
            if f(&columns, row)? == Flow::Abort {
                break;
            }
        }
        Ok(())
    }

    fn read_first(&mut self) -> OrmResult<(Vec<String>, Vec<Value>)> {
        let columns = self.cursor.columns().to_vec();
        let row = self
            .next_row()?
            .ok_or_else(|| OrmError::not_found("Expected one row, got none"))?;
        Ok((columns, row))
    }

    /// Resolve each result column to a field index once per result set.
    fn bind_columns<R: Record>(&self) -> OrmResult<Vec<Option<usize>>> {
        let info = self.catalog.fields_of::<R>()?;
        let mut targets = Vec::with_capacity(self.cursor.columns().len());
        for column in self.cursor.columns() {
            let target = info.find_field_by_column_name(column).map(|f| f.index);
            if target.is_none() {
                tracing::trace!(
                    target: "sqlweave.rows",
                    record = R::record_name(),
                    column = column.as_str(),
                    "no field for column, value discarded"
                );
            }
            targets.push(target);
        }
        Ok(targets)
    }

    fn read_first_record<R: Record + Default>(&mut self) -> OrmResult<R> {
        let targets = self.bind_columns::<R>()?;
        let (columns, row) = self.read_first()?;
        decode_record(&columns, &targets, row)
    }

    fn read_records<R: Record + Default>(&mut self) -> OrmResult<Vec<R>> {
        let targets = self.bind_columns::<R>()?;
        let mut records = Vec::new();
        self.read_each(|columns, row| {
            records.push(decode_record(columns, &targets, row)?);
            Ok(Flow::Continue)
        })?;
        Ok(records)
    }

    fn single_column(&self) -> OrmResult<String> {
        match self.cursor.columns() {
            [column] => Ok(column.clone()),
            columns => Err(OrmError::decode(
                "*",
                format!("expected a single column, got {}", columns.len()),
            )),
        }
    }

    fn read_first_scalar<T: FromValue>(&mut self) -> OrmResult<T> {
        let column = self.single_column()?;
        let (_, row) = self.read_first()?;
        decode_scalar(&column, row)
    }

    fn read_scalars<T: FromValue>(&mut self) -> OrmResult<Vec<T>> {
        let column = self.single_column()?;
        let mut out = Vec::new();
        self.read_each(|_, row| {
            out.push(decode_scalar(&column, row)?);
            Ok(Flow::Continue)
        })?;
        Ok(out)
    }
}

fn to_map(columns: &[String], row: Vec<Value>) -> ValueMap {
    columns.iter().cloned().zip(row).collect()
}

fn decode_record<R: Record + Default>(
    columns: &[String],
    targets: &[Option<usize>],
    row: Vec<Value>,
) -> OrmResult<R> {
    let mut record = R::default();
    for ((column, target), value) in columns.iter().zip(targets).zip(row) {
        if let Some(index) = *target {
            record
                .set_field_value(index, value)
                .map_err(|e| OrmError::decode(column.as_str(), e.to_string()))?;
        }
    }
    Ok(record)
}

fn decode_scalar<T: FromValue>(column: &str, mut row: Vec<Value>) -> OrmResult<T> {
    let value = row.pop().unwrap_or_default();
    T::from_value(value).map_err(|e| OrmError::decode(column, e.to_string()))
}

impl<C: Cursor> Drop for Rows<C> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.cursor.close() {
            tracing::warn!(target: "sqlweave.rows", error = %e, "failed to close cursor");
        }
    }
}
