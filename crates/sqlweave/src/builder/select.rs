use super::columns::ColumnFilter;
use super::traits::SqlBuilder;
use crate::catalog::{Catalog, ZeroValues};
use crate::condition::Conditions;
use crate::error::{OrmError, OrmResult};
use crate::record::Record;
use crate::template::Template;
use crate::value::Value;

/// Builder for SELECT statements.
///
/// Clauses are emitted in a fixed order regardless of call order:
/// `select [distinct] cols from table [joins] [where] [group by] [having]
/// [order by] [paging]`. Empty clauses are left out entirely.
///
/// ```rust
/// use sqlweave::builder::{select, SqlBuilder};
/// use sqlweave::values;
///
/// let mut q = select("user", &["id", "name", "age"]);
/// q.and_where("age > ?", values![20]);
/// let t = q.build();
/// assert_eq!(t.format, "select id,name,age from user where (age > ?)");
/// assert_eq!(t.values, values![20]);
/// ```
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    table: String,
    distinct: bool,
    columns: Vec<Template>,
    filter: ColumnFilter,
    joins: Vec<Template>,
    wheres: Conditions,
    group_by: Vec<String>,
    havings: Conditions,
    order_by: Vec<String>,
    limit: Option<i64>,
    offset: Option<i64>,
    paging: Template,
}

impl QueryBuilder {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            distinct: false,
            columns: Vec::new(),
            filter: ColumnFilter::default(),
            joins: Vec::new(),
            wheres: Conditions::and(),
            group_by: Vec::new(),
            havings: Conditions::and(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
            paging: Template::default(),
        }
    }

    pub fn table(&mut self, table: impl Into<String>) -> &mut Self {
        self.table = table.into();
        self
    }

    pub fn distinct(&mut self) -> &mut Self {
        self.distinct = true;
        self
    }

    /// Add one result column; it may carry its own values
    /// (e.g. `coalesce(nick, ?) as nick`).
    pub fn column(&mut self, column: impl Into<Template>) -> &mut Self {
        self.columns.push(column.into());
        self
    }

    pub fn columns(&mut self, columns: &[&str]) -> &mut Self {
        self.columns.extend(columns.iter().map(|c| Template::new(*c)));
        self
    }

    /// Add every mapped column of `R`, in declaration order.
    pub fn record_columns<R: Record>(&mut self, catalog: &Catalog) -> OrmResult<&mut Self> {
        let names = catalog.column_names_of::<R>()?;
        self.columns.extend(names.into_iter().map(Template::new));
        Ok(self)
    }

    /// Keep only these columns when building.
    pub fn include(&mut self, columns: &[&str]) -> &mut Self {
        self.filter.include(columns.iter().copied());
        self
    }

    /// Drop these columns when building.
    pub fn exclude(&mut self, columns: &[&str]) -> &mut Self {
        self.filter.exclude(columns.iter().copied());
        self
    }

    /// Add a raw join clause, e.g. `left join orders o on o.user_id = u.id`.
    pub fn join(&mut self, join: impl Into<Template>) -> &mut Self {
        let join = join.into();
        if !join.is_empty() {
            self.joins.push(join);
        }
        self
    }

    pub fn inner_join(&mut self, table: &str, on: &str) -> &mut Self {
        self.join(format!("inner join {table} on {on}"))
    }

    pub fn left_join(&mut self, table: &str, on: &str) -> &mut Self {
        self.join(format!("left join {table} on {on}"))
    }

    pub fn and_where(&mut self, format: &str, values: Vec<Value>) -> &mut Self {
        self.wheres.push_format(format, values);
        self
    }

    /// Add a prebuilt condition, e.g. from [`crate::expr`] or a
    /// [`Conditions`] group.
    pub fn and_where_template(&mut self, condition: impl Into<Template>) -> &mut Self {
        self.wheres.push(condition);
        self
    }

    /// `key = ?` per entry, in key order.
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

    pub fn group_by(&mut self, columns: &[&str]) -> &mut Self {
        self.group_by.extend(columns.iter().map(|c| c.to_string()));
        self
    }

    pub fn having(&mut self, format: &str, values: Vec<Value>) -> &mut Self {
        self.havings.push_format(format, values);
        self
    }

    pub fn having_template(&mut self, condition: impl Into<Template>) -> &mut Self {
        self.havings.push(condition);
        self
    }

    /// Add ORDER BY terms, e.g. `&["created_at desc", "id"]`.
    pub fn order_by(&mut self, terms: &[&str]) -> &mut Self {
        self.order_by.extend(terms.iter().map(|t| t.to_string()));
        self
    }

    pub fn limit(&mut self, limit: i64) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(&mut self, offset: i64) -> &mut Self {
        self.offset = Some(offset);
        self
    }

    /// 1-based page of `per_page` rows, as `limit ? offset ?`.
    ///
    /// ```rust
    /// use sqlweave::builder::{select, SqlBuilder};
    /// use sqlweave::values;
    ///
    /// let mut q = select("user", &["id"]);
    /// q.order_by(&["id"]).page(3, 25).unwrap();
    /// let t = q.build();
    /// assert_eq!(t.format, "select id from user order by id limit ? offset ?");
    /// assert_eq!(t.values, values![25, 50]);
    /// ```
    pub fn page(&mut self, page: i64, per_page: i64) -> OrmResult<&mut Self> {
        if page < 1 {
            return Err(OrmError::Validation(format!(
                "page must be >= 1, got {page}"
            )));
        }
        self.limit = Some(per_page);
        self.offset = Some((page - 1) * per_page);
        Ok(self)
    }

    /// Raw paging clause; takes precedence over `limit`/`offset`.
    pub fn paging(&mut self, paging: impl Into<Template>) -> &mut Self {
        self.paging = paging.into();
        self
    }

    /// The built query as `(…) as alias`, for use in FROM or JOIN.
    pub fn as_subquery(&self, alias: &str) -> Template {
        self.build().bracket().append(&format!(" as {alias}"), vec![])
    }

    fn select_list(&self) -> Template {
        let visible = self
            .columns
            .iter()
            .filter(|c| self.filter.allows(c.format.trim()))
            .cloned();
        let list = Template::join_all(visible, ",", "", "");
        if list.is_empty() {
            return Template::new("*");
        }
        list
    }

    fn paging_clause(&self) -> Template {
        if !self.paging.is_empty() {
            return self.paging.clone();
        }
        let mut clause = Template::default();
        if let Some(limit) = self.limit {
            clause = clause.join(" ", Template::with_values("limit ?", vec![limit.into()]));
        }
        if let Some(offset) = self.offset {
            clause = clause.join(" ", Template::with_values("offset ?", vec![offset.into()]));
        }
        clause
    }
}

impl SqlBuilder for QueryBuilder {
    fn build(&self) -> Template {
        let keyword = if self.distinct {
            "select distinct "
        } else {
            "select "
        };
        let mut t = self
            .select_list()
            .prepend(keyword, vec![])
            .append(&format!(" from {}", self.table), vec![]);
        for join in &self.joins {
            t = t.join(" ", join.clone());
        }
        t = t.join(" where ", self.wheres.build());
        if !self.group_by.is_empty() {
            t = t.append(&format!(" group by {}", self.group_by.join(",")), vec![]);
        }
        t = t.join(" having ", self.havings.build());
        if !self.order_by.is_empty() {
            t = t.append(&format!(" order by {}", self.order_by.join(",")), vec![]);
        }
        t.join(" ", self.paging_clause())
    }
}
