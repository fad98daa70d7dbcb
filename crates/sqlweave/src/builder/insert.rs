use super::columns::Assignments;
use super::traits::{MutationBuilder, SqlBuilder};
use crate::catalog::{Catalog, ZeroValues};
use crate::condition::Conditions;
use crate::error::OrmResult;
use crate::record::Record;
use crate::template::Template;
use crate::value::Value;

/// Builder for single-row INSERT statements.
///
/// Builds `insert into t(a,b) values(?,?)`. A WHERE clause is appended only
/// when conditions were added, for dialects that accept one.
#[derive(Debug, Clone)]
pub struct InsertBuilder {
    table: String,
    assignments: Assignments,
    wheres: Conditions,
}

impl InsertBuilder {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            assignments: Assignments::default(),
            wheres: Conditions::and(),
        }
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.assignments.set(column.into(), value.into());
        self
    }

    /// Set each pair, in key order.
    pub fn set_map<K, V, I>(&mut self, pairs: I) -> &mut Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.assignments.set_map(pairs);
        self
    }

    /// Set every mapped field of `record`, in declaration order.
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
}

impl SqlBuilder for InsertBuilder {
    fn build(&self) -> Template {
        if self.assignments.is_empty() {
            return Template::default();
        }
        let mut columns = Vec::new();
        let mut values = Vec::new();
        for (column, value) in self.assignments.visible() {
            columns.push(column.as_str());
            values.push(value.clone());
        }
        let marks = vec!["?"; columns.len()].join(",");
        Template::with_values(
            format!(
                "insert into {}({}) values({marks})",
                self.table,
                columns.join(",")
            ),
            values,
        )
        .join(" where ", self.wheres.build())
    }
}

impl MutationBuilder for InsertBuilder {}
