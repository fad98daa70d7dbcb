use super::columns::ColumnFilter;
use super::traits::{MutationBuilder, SqlBuilder};
use crate::catalog::{Catalog, Column};
use crate::error::OrmResult;
use crate::record::Record;
use crate::template::Template;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableAction {
    Create,
    Drop,
}

/// Builder for `create table` / `drop table` statements.
///
/// Output layout: prepended statements, then the main statement, then
/// appended statements. Inner items (constraints, table-level keys) go
/// inside the column list of a CREATE, before or after the columns.
///
/// With [`indent`](TableBuilder::indent) set, every column and inner item
/// sits on its own line and the result ends with a newline.
///
/// ```rust
/// use sqlweave::builder::{create_table, SqlBuilder};
/// use sqlweave::Column;
///
/// let mut t = create_table(
///     "user",
///     vec![
///         Column::new("id", "integer").suffix("primary key"),
///         Column::new("name", "text"),
///     ],
/// );
/// t.if_not_exists();
/// assert_eq!(
///     t.build().format,
///     "create table if not exists user (id integer primary key,name text);"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct TableBuilder {
    table: String,
    action: Option<TableAction>,
    columns: Vec<Column>,
    filter: ColumnFilter,
    dialect: String,
    if_not_exists: bool,
    if_exists: bool,
    prefix: String,
    indent: String,
    pretty: bool,
    prepends: Vec<Template>,
    appends: Vec<Template>,
    inner_prepends: Vec<Template>,
    inner_appends: Vec<Template>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dialect used by [`create_table_record`](TableBuilder::create_table_record);
    /// `""` is the registry default.
    pub fn dialect(&mut self, dialect: &str) -> &mut Self {
        self.dialect = dialect.to_string();
        self
    }

    pub fn create_table(&mut self, table: impl Into<String>, columns: Vec<Column>) -> &mut Self {
        self.table = table.into();
        self.action = Some(TableAction::Create);
        self.columns = columns;
        self
    }

    /// CREATE with the columns of `R`, resolved through the builder's dialect.
    pub fn create_table_record<R: Record>(
        &mut self,
        catalog: &Catalog,
        table: impl Into<String>,
    ) -> OrmResult<&mut Self> {
        let columns = catalog.columns_of::<R>(&self.dialect)?;
        Ok(self.create_table(table, columns))
    }

    pub fn drop_table(&mut self, table: impl Into<String>) -> &mut Self {
        self.table = table.into();
        self.action = Some(TableAction::Drop);
        self
    }

    pub fn if_not_exists(&mut self) -> &mut Self {
        self.if_not_exists = true;
        self
    }

    pub fn if_exists(&mut self) -> &mut Self {
        self.if_exists = true;
        self
    }

    /// Put each column on its own line, starting with `indent` then `prefix`.
    pub fn indent(&mut self, prefix: &str, indent: &str) -> &mut Self {
        self.prefix = prefix.to_string();
        self.indent = indent.to_string();
        self.pretty = true;
        self
    }

    /// Statement emitted before the main one.
    pub fn prepend(&mut self, item: impl Into<Template>) -> &mut Self {
        self.prepends.push(item.into());
        self
    }

    /// Statement emitted after the main one.
    pub fn append(&mut self, item: impl Into<Template>) -> &mut Self {
        self.appends.push(item.into());
        self
    }

    /// Item placed inside the column list, before the columns.
    pub fn prepend_inner(&mut self, item: impl Into<Template>) -> &mut Self {
        self.inner_prepends.push(item.into());
        self
    }

    /// Item placed inside the column list, after the columns,
    /// e.g. `primary key (a, b)`.
    pub fn append_inner(&mut self, item: impl Into<Template>) -> &mut Self {
        self.inner_appends.push(item.into());
        self
    }

    pub fn include(&mut self, columns: &[&str]) -> &mut Self {
        self.filter.include(columns.iter().copied());
        self
    }

    pub fn exclude(&mut self, columns: &[&str]) -> &mut Self {
        self.filter.exclude(columns.iter().copied());
        self
    }

    fn newline(&self) -> &'static str {
        if self.pretty { "\n" } else { "" }
    }

    fn write_create(&self, buf: &mut String, values: &mut Vec<Value>) {
        let columns: Vec<&Column> = self
            .columns
            .iter()
            .filter(|c| self.filter.allows(&c.name))
            .collect();
        if columns.is_empty() {
            return;
        }
        let nl = self.newline();
        let line_start = format!("{}{}", self.indent, self.prefix);

        buf.push_str("create table ");
        if self.if_not_exists {
            buf.push_str("if not exists ");
        }
        buf.push_str(&self.table);
        buf.push_str(" (");
        buf.push_str(nl);

        for item in self.inner_prepends.iter().filter(|t| !t.is_empty()) {
            push_line(buf, &line_start, &item.format, nl);
            values.extend(item.values.iter().cloned());
        }
        for column in columns {
            let mut def = format!("{} {}", column.name, column.sql_type);
            if !column.suffix.is_empty() {
                def.push(' ');
                def.push_str(&column.suffix);
            }
            push_line(buf, &line_start, &def, nl);
        }
        for item in self.inner_appends.iter().filter(|t| !t.is_empty()) {
            push_line(buf, &line_start, &item.format, nl);
            values.extend(item.values.iter().cloned());
        }

        let kept = buf.trim_end_matches([',', ' ', '\n']).len();
        buf.truncate(kept);
        buf.push_str(nl);
        buf.push_str(");");
        buf.push_str(nl);
    }

    fn write_drop(&self, buf: &mut String) {
        buf.push_str("drop table ");
        if self.if_exists {
            buf.push_str("if exists ");
        }
        buf.push_str(&self.table);
        buf.push(';');
        buf.push_str(self.newline());
    }

    fn write_outer(&self, items: &[Template], buf: &mut String, values: &mut Vec<Value>) {
        for item in items {
            if item.is_empty() {
                continue;
            }
            if !buf.is_empty() && !buf.ends_with('\n') {
                buf.push(if self.pretty { '\n' } else { ' ' });
            }
            buf.push_str(&item.format);
            buf.push_str(self.newline());
            values.extend(item.values.iter().cloned());
        }
    }
}

fn push_line(buf: &mut String, line_start: &str, body: &str, nl: &str) {
    buf.push_str(line_start);
    buf.push_str(body);
    buf.push(',');
    buf.push_str(nl);
}

impl SqlBuilder for TableBuilder {
    fn build(&self) -> Template {
        let mut buf = String::new();
        let mut values = Vec::new();

        self.write_outer(&self.prepends, &mut buf, &mut values);
        let mut main = String::new();
        match self.action {
            Some(TableAction::Create) => self.write_create(&mut main, &mut values),
            Some(TableAction::Drop) => self.write_drop(&mut main),
            None => {}
        }
        self.write_outer(&[Template::new(main)], &mut buf, &mut Vec::new());
        self.write_outer(&self.appends, &mut buf, &mut values);

        let mut format = buf.trim().to_string();
        if self.pretty && !format.is_empty() {
            format.push('\n');
        }
        Template::with_values(format, values)
    }
}

impl MutationBuilder for TableBuilder {}

/// One table for [`batch_create_tables`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDef {
    pub name: String,
    pub columns: Vec<Column>,
}

impl TableDef {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Table `name` with the columns of `R` in `dialect`.
    pub fn from_record<R: Record>(
        catalog: &Catalog,
        name: impl Into<String>,
        dialect: &str,
    ) -> OrmResult<Self> {
        Ok(Self::new(name, catalog.columns_of::<R>(dialect)?))
    }
}

/// CREATE statements for every table, one per line.
pub fn batch_create_tables(tables: &[TableDef], if_not_exists: bool) -> Template {
    Template::join_all(
        tables.iter().map(|def| {
            let mut builder = TableBuilder::new();
            builder.create_table(def.name.clone(), def.columns.clone());
            if if_not_exists {
                builder.if_not_exists();
            }
            builder.build()
        }),
        "\n",
        "",
        "",
    )
}

/// DROP statements for every table, one per line.
pub fn batch_drop_tables<S: AsRef<str>>(tables: &[S], if_exists: bool) -> Template {
    Template::join_all(
        tables.iter().map(|name| {
            let mut builder = TableBuilder::new();
            builder.drop_table(name.as_ref());
            if if_exists {
                builder.if_exists();
            }
            builder.build()
        }),
        "\n",
        "",
        "",
    )
}
