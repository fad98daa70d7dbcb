use super::traits::{MutationBuilder, SqlBuilder};
use crate::catalog::{Catalog, ZeroValues};
use crate::condition::Conditions;
use crate::error::{OrmError, OrmResult};
use crate::record::Record;
use crate::template::Template;
use crate::value::Value;

/// Builder for DELETE statements.
///
/// Like [`UpdateBuilder`](super::UpdateBuilder), a DELETE without WHERE
/// conditions needs an explicit [`all_rows`](DeleteBuilder::all_rows).
#[derive(Debug, Clone)]
pub struct DeleteBuilder {
    table: String,
    wheres: Conditions,
    all_rows: bool,
}

impl DeleteBuilder {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            wheres: Conditions::and(),
            all_rows: false,
        }
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

    /// Allow a DELETE with no WHERE conditions.
    pub fn all_rows(&mut self) -> &mut Self {
        self.all_rows = true;
        self
    }
}

impl SqlBuilder for DeleteBuilder {
    fn build(&self) -> Template {
        if self.wheres.is_empty() && !self.all_rows {
            return Template::default();
        }
        Template::new(format!("delete from {}", self.table)).join(" where ", self.wheres.build())
    }

    fn validate(&self) -> OrmResult<()> {
        if self.wheres.is_empty() && !self.all_rows {
            return Err(OrmError::validation(format!(
                "DELETE FROM {} without WHERE; call all_rows() to delete every row",
                self.table
            )));
        }
        self.build().validate()
    }
}

impl MutationBuilder for DeleteBuilder {}
