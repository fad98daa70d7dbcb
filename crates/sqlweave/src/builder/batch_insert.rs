use super::columns::ColumnFilter;
use super::traits::{MutationBuilder, SqlBuilder};
use crate::catalog::{Catalog, ZeroValues};
use crate::error::{OrmError, OrmResult};
use crate::record::Record;
use crate::template::Template;
use crate::value::Value;
use std::collections::BTreeMap;

/// Multi-row INSERT.
///
/// The column list is taken from the first row's keys, in key order. Later
/// rows are read by those keys: a missing key builds as `NULL` and is
/// reported by `validate`; extra keys are ignored.
///
/// ```rust
/// use sqlweave::builder::{batch_insert, SqlBuilder};
/// use sqlweave::{values, Value};
///
/// let mut b = batch_insert("user");
/// b.row([("id", Value::from(1)), ("name", Value::from("a"))]);
/// b.row([("id", Value::from(2)), ("name", Value::from("b"))]);
/// let t = b.build();
/// assert_eq!(t.format, "insert into user(id,name) values(?,?),(?,?)");
/// assert_eq!(t.values, values![1, "a", 2, "b"]);
/// ```
#[derive(Debug, Clone)]
pub struct BatchInsertBuilder {
    table: String,
    rows: Vec<BTreeMap<String, Value>>,
    filter: ColumnFilter,
}

impl BatchInsertBuilder {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            rows: Vec::new(),
            filter: ColumnFilter::default(),
        }
    }

    pub fn row<K, I>(&mut self, pairs: I) -> &mut Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        self.rows
            .push(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect());
        self
    }

    /// One row per record, with every mapped field (zero values included).
    pub fn record_rows<R: Record>(
        &mut self,
        catalog: &Catalog,
        records: &[R],
    ) -> OrmResult<&mut Self> {
        for record in records {
            let pairs = catalog.values_of(record, ZeroValues::Include)?;
            self.row(pairs);
        }
        Ok(self)
    }

    pub fn include(&mut self, columns: &[&str]) -> &mut Self {
        self.filter.include(columns.iter().copied());
        self
    }

    pub fn exclude(&mut self, columns: &[&str]) -> &mut Self {
        self.filter.exclude(columns.iter().copied());
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn keys(&self) -> Vec<&str> {
        self.rows
            .first()
            .map(|first| {
                first
                    .keys()
                    .map(String::as_str)
                    .filter(|k| self.filter.allows(k))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl SqlBuilder for BatchInsertBuilder {
    fn build(&self) -> Template {
        let keys = self.keys();
        if keys.is_empty() {
            return Template::default();
        }
        let group = format!("({})", vec!["?"; keys.len()].join(","));
        let mut values = Vec::with_capacity(keys.len() * self.rows.len());
        for row in &self.rows {
            for key in &keys {
                values.push(row.get(*key).cloned().unwrap_or_default());
            }
        }
        Template::with_values(
            format!(
                "insert into {}({}) values{}",
                self.table,
                keys.join(","),
                vec![group; self.rows.len()].join(",")
            ),
            values,
        )
    }

    fn validate(&self) -> OrmResult<()> {
        let keys = self.keys();
        for (i, row) in self.rows.iter().enumerate().skip(1) {
            if let Some(missing) = keys.iter().find(|k| !row.contains_key(**k)) {
                return Err(OrmError::validation(format!(
                    "batch insert into {}: row {i} has no value for column {missing}",
                    self.table
                )));
            }
        }
        self.build().validate()
    }
}

impl MutationBuilder for BatchInsertBuilder {}
