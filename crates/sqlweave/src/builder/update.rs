use super::columns::Assignments;
use super::traits::{MutationBuilder, SqlBuilder};
use crate::catalog::{Catalog, ZeroValues};
use crate::condition::Conditions;
use crate::error::{OrmError, OrmResult};
use crate::record::Record;
use crate::template::Template;
use crate::value::Value;

/// Builder for UPDATE statements.
///
/// An UPDATE with no WHERE conditions builds nothing unless
/// [`all_rows`](UpdateBuilder::all_rows) was called, and `validate` reports
/// why.
///
/// ```rust
/// use sqlweave::builder::{update, SqlBuilder};
/// use sqlweave::values;
///
/// let mut u = update("user");
/// u.set("name", "X").and_where("id = ?", values![1]);
/// assert_eq!(u.build().format, "update user set name=? where (id = ?)");
///
/// let mut unsafe_update = update("user");
/// unsafe_update.set("name", "X");
/// assert!(unsafe_update.validate().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct UpdateBuilder {
    table: String,
    assignments: Assignments,
    wheres: Conditions,
    all_rows: bool,
}

impl UpdateBuilder {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            assignments: Assignments::default(),
            wheres: Conditions::and(),
            all_rows: false,
        }
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.assignments.set(column.into(), value.into());
        self
    }

    pub fn set_map<K, V, I>(&mut self, pairs: I) -> &mut Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.assignments.set_map(pairs);
        self
    }

    pub fn set_record<R: Record>(
        &mut self,
        catalog: &Catalog,
        record: &R,
        zero: ZeroValues,
    ) -> OrmResult<&mut Self> {
        self.assignments.set_record(catalog, record, zero)?;
        Ok(self)
    }

    pub fn include(&mut self, columns: &[&str]) -> &mut Self {
        self.assignments.filter.include(columns.iter().copied());
        self
    }

    pub fn exclude(&mut self, columns: &[&str]) -> &mut Self {
        self.assignments.filter.exclude(columns.iter().copied());
        self
    }

    pub fn and_where(&mut self, format: &str, values: Vec<Value>) -> &mut Self {
        self.wheres.push_format(format, values);
        self
    }

    pub fn and_where_template(&mut self, condition: impl Into<Template>) -> &mut Self {
        self.wheres.push(condition);
        self
    }

    pub fn and_where_map<K, V, I>(&mut self, pairs: I) -> &mut Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.wheres.push_map(pairs);
        self
    }

    pub fn and_where_record<R: Record>(
        &mut self,
        catalog: &Catalog,
        record: &R,
        zero: ZeroValues,
    ) -> OrmResult<&mut Self> {
        self.wheres.push_record(catalog, record, zero)?;
        Ok(self)
    }

    /// Allow an UPDATE with no WHERE conditions.
    pub fn all_rows(&mut self) -> &mut Self {
        self.all_rows = true;
        self
    }
}

impl SqlBuilder for UpdateBuilder {
    fn build(&self) -> Template {
        if self.assignments.is_empty() || (self.wheres.is_empty() && !self.all_rows) {
            return Template::default();
        }
        let mut sets = Vec::new();
        let mut values = Vec::new();
        for (column, value) in self.assignments.visible() {
            sets.push(format!("{column}=?"));
            values.push(value.clone());
        }
        Template::with_values(
            format!("update {} set {}", self.table, sets.join(",")),
            values,
        )
        .join(" where ", self.wheres.build())
    }

    fn validate(&self) -> OrmResult<()> {
        if self.assignments.is_empty() {
            return Err(OrmError::validation(format!(
                "UPDATE {} has no columns to set",
                self.table
            )));
        }
        if self.wheres.is_empty() && !self.all_rows {
            return Err(OrmError::validation(format!(
                "UPDATE {} without WHERE; call all_rows() to update every row",
                self.table
            )));
        }
        self.build().validate()
    }
}

impl MutationBuilder for UpdateBuilder {}
