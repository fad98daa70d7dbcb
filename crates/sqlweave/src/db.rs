//! `Db`: an executor bound to a catalog and runtime settings.

use crate::builder::TableBuilder;
use crate::catalog::{Catalog, Column};
use crate::client::Executor;
use crate::error::{OrmError, OrmResult};
use crate::record::Record;
use crate::rows::Rows;
use crate::template::Template;
use std::sync::Arc;
use std::time::Duration;

/// Runtime configuration for [`Db`].
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Dialect used for record-derived DDL. `""` means the registry default.
    pub dialect: String,
    /// Query timeout duration.
    pub query_timeout: Option<Duration>,
    /// Whether to log statements before running them.
    pub log_sql: bool,
    /// Truncate logged statements (in bytes). `None` means no truncation.
    pub max_log_length: Option<usize>,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            dialect: String::new(),
            query_timeout: None,
            log_sql: true,
            max_log_length: Some(500),
        }
    }
}

impl DbConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dialect(mut self, name: impl Into<String>) -> Self {
        self.dialect = name.into();
        self
    }

    /// Set query timeout.
    pub fn query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = Some(timeout);
        self
    }

    pub fn log_sql(mut self, enabled: bool) -> Self {
        self.log_sql = enabled;
        self
    }

    pub fn max_log_length(mut self, len: usize) -> Self {
        self.max_log_length = Some(len);
        self
    }

    /// Disable log truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_log_length = None;
        self
    }
}

/// An executor (connection or transaction) together with the catalog used
/// to map records and the settings applied to every statement.
///
/// ```ignore
/// let db = Db::new(client);
/// let users: Vec<User> = select("users", &["id", "name"])
///     .and_where("age > ?", values![20])
///     .fetch_all(&db)
///     .await?;
/// ```
pub struct Db<E> {
    executor: E,
    catalog: Arc<Catalog>,
    config: DbConfig,
}

impl<E: Executor> Db<E> {
    /// Bind `executor` to a fresh catalog over the built-in dialects.
    pub fn new(executor: E) -> Self {
        Self::with_config(executor, Arc::new(Catalog::default()), DbConfig::default())
    }

    pub fn with_config(executor: E, catalog: Arc<Catalog>, config: DbConfig) -> Self {
        Self {
            executor,
            catalog,
            config,
        }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Unwrap the executor, e.g. to commit a transaction.
    pub fn into_executor(self) -> E {
        self.executor
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    /// Columns of `R` in the configured dialect.
    pub fn columns_of<R: Record>(&self) -> OrmResult<Vec<Column>> {
        self.catalog.columns_of::<R>(&self.config.dialect)
    }

    /// A table builder preset to the configured dialect.
    pub fn table(&self) -> TableBuilder {
        let mut builder = TableBuilder::new();
        builder.dialect(&self.config.dialect);
        builder
    }

    /// Execute a statement and return the affected row count.
    pub async fn execute(&self, template: &Template) -> OrmResult<u64> {
        self.prepare(template)?;
        self.with_timeout(self.executor.execute(&template.format, &template.values))
            .await
    }

    /// Run a query and wrap its cursor for materialization.
    pub async fn query(&self, template: &Template) -> OrmResult<Rows<E::Cursor>> {
        self.prepare(template)?;
        let cursor = self
            .with_timeout(self.executor.query(&template.format, &template.values))
            .await?;
        Ok(Rows::new(cursor, Arc::clone(&self.catalog)))
    }

    fn prepare(&self, template: &Template) -> OrmResult<()> {
        if template.is_empty() {
            return Err(OrmError::EmptyTemplate);
        }
        template.validate()?;
        if self.config.log_sql {
            let rendered = self.truncate(template.to_string());
            tracing::debug!(
                target: "sqlweave.sql",
                params = template.values.len(),
                sql = %rendered,
                "executing"
            );
        }
        Ok(())
    }

    fn truncate(&self, mut rendered: String) -> String {
        if let Some(max) = self.config.max_log_length {
            if rendered.len() > max {
                let mut end = max;
                while !rendered.is_char_boundary(end) {
                    end -= 1;
                }
                rendered.truncate(end);
                rendered.push_str("...");
            }
        }
        rendered
    }

    async fn with_timeout<T, F>(&self, future: F) -> OrmResult<T>
    where
        F: std::future::Future<Output = OrmResult<T>>,
    {
        match self.config.query_timeout {
            Some(timeout) => tokio::time::timeout(timeout, future)
                .await
                .map_err(|_| OrmError::Timeout(timeout))?,
            None => future.await,
        }
    }
}
