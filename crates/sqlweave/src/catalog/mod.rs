//! Field catalog: per-record field metadata, column names and storage types.
//!
//! The catalog is a service, not a global. It owns a read-through cache of
//! [`RecordInfo`] keyed by `TypeId`; the first lookup for a type parses its
//! tags and checks it for duplicate column names, later lookups share the
//! cached `Arc`. Two threads racing on the first lookup compute the same
//! value and the second write is a no-op.
//!
//! Every column name, on the write path (insert/update column lists) and the
//! read path (binding result columns to fields), goes through
//! [`column_name_of`].

pub mod tag;

use crate::dialect::DialectRegistry;
use crate::error::{OrmError, OrmResult};
use crate::record::Record;
use crate::value::{TypeRef, Value};
use heck::ToSnakeCase;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

pub use tag::Tag;

/// Metadata for one declared field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Declaration index, as used by [`Record::field_value`].
    pub index: usize,
    pub name: &'static str,
    pub ty: TypeRef,
    pub tag: Tag,
}

/// The SQL projection of a field: what a `create table` column list needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub sql_type: String,
    pub suffix: String,
}

impl Column {
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
            suffix: String::new(),
        }
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }
}

/// Whether zero-valued fields count as set when a record is expanded into
/// column/value pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZeroValues {
    #[default]
    Include,
    Skip,
}

/// Column name of a field: the tag override, else the snake_case field name.
///
/// Ignored fields have no column.
pub fn column_name_of(field: &FieldDescriptor) -> Option<String> {
    if field.tag.is_ignored() {
        return None;
    }
    Some(match field.tag.column() {
        Some(explicit) => explicit.to_string(),
        None => field.name.to_snake_case(),
    })
}

/// Cached field table of one record type.
#[derive(Debug)]
pub struct RecordInfo {
    record: &'static str,
    fields: Vec<FieldDescriptor>,
    explicit: HashMap<String, usize>,
    computed: HashMap<String, usize>,
}

impl RecordInfo {
    fn build<R: Record>() -> OrmResult<Self> {
        let record = R::record_name();
        let fields: Vec<FieldDescriptor> = R::fields()
            .into_iter()
            .enumerate()
            .map(|(index, def)| FieldDescriptor {
                index,
                name: def.name,
                ty: def.ty,
                tag: Tag::parse(def.tag),
            })
            .collect();

        let mut explicit = HashMap::new();
        let mut computed = HashMap::new();
        for field in &fields {
            let Some(column) = column_name_of(field) else {
                continue;
            };
            if explicit.contains_key(&column) || computed.contains_key(&column) {
                return Err(OrmError::AmbiguousColumn {
                    record: record.to_string(),
                    column,
                });
            }
            if field.tag.column().is_some() {
                explicit.insert(column, field.index);
            } else {
                computed.insert(column, field.index);
            }
        }

        Ok(Self {
            record,
            fields,
            explicit,
            computed,
        })
    }

    pub fn record_name(&self) -> &'static str {
        self.record
    }

    /// All declared fields, ignored ones included, in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Fields that have a column, with that column name, in declaration order.
    pub fn mapped_fields(&self) -> impl Iterator<Item = (&FieldDescriptor, String)> {
        self.fields
            .iter()
            .filter_map(|f| column_name_of(f).map(|name| (f, name)))
    }

    /// Reverse lookup: explicitly named fields first, then computed names.
    pub fn find_field_by_column_name(&self, column: &str) -> Option<&FieldDescriptor> {
        self.explicit
            .get(column)
            .or_else(|| self.computed.get(column))
            .map(|&index| &self.fields[index])
    }
}

/// Catalog behaviour switches.
#[derive(Debug, Clone, Default)]
pub struct CatalogConfig {
    /// Turn "no storage type" and "no such dialect" into errors instead of
    /// silently dropping the column.
    pub strict: bool,
}

impl CatalogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// Field metadata service with a per-type cache.
#[derive(Debug)]
pub struct Catalog {
    dialects: Arc<DialectRegistry>,
    config: CatalogConfig,
    cache: RwLock<HashMap<TypeId, Arc<RecordInfo>>>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(Arc::new(DialectRegistry::with_builtins()))
    }
}

impl Catalog {
    pub fn new(dialects: Arc<DialectRegistry>) -> Self {
        Self::with_config(dialects, CatalogConfig::default())
    }

    pub fn with_config(dialects: Arc<DialectRegistry>, config: CatalogConfig) -> Self {
        Self {
            dialects,
            config,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn dialects(&self) -> &Arc<DialectRegistry> {
        &self.dialects
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Field table of `R`, computed on first access.
    pub fn fields_of<R: Record>(&self) -> OrmResult<Arc<RecordInfo>> {
        let key = TypeId::of::<R>();
        if let Some(info) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(Arc::clone(info));
        }

        tracing::trace!(
            target: "sqlweave.catalog",
            record = R::record_name(),
            "computing field table"
        );
        let info = Arc::new(RecordInfo::build::<R>()?);
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(cache.entry(key).or_insert(info)))
    }

    /// Column names of `R` in declaration order.
    pub fn column_names_of<R: Record>(&self) -> OrmResult<Vec<String>> {
        let info = self.fields_of::<R>()?;
        Ok(info.mapped_fields().map(|(_, name)| name).collect())
    }

    /// Columns of `R` with storage types resolved through `dialect`
    /// (`""` for the default).
    ///
    /// A field with neither a `type` tag nor a dialect mapping is left out,
    /// unless the catalog is strict.
    pub fn columns_of<R: Record>(&self, dialect: &str) -> OrmResult<Vec<Column>> {
        let info = self.fields_of::<R>()?;
        let resolved = self.dialects.lookup(dialect);
        if resolved.is_none() && self.config.strict {
            return Err(OrmError::DialectNotFound(dialect.to_string()));
        }

        let mut columns = Vec::new();
        for (field, name) in info.mapped_fields() {
            let sql_type = match field.tag.sql_type() {
                Some(explicit) => Some(explicit.to_string()),
                None => resolved.as_ref().and_then(|d| d.map_type(&field.ty)),
            };
            let Some(sql_type) = sql_type.filter(|t| !t.trim().is_empty()) else {
                if self.config.strict {
                    return Err(OrmError::UnresolvedType {
                        record: info.record_name().to_string(),
                        field: field.name.to_string(),
                    });
                }
                tracing::debug!(
                    target: "sqlweave.catalog",
                    record = info.record_name(),
                    field = field.name,
                    ty = field.ty.name,
                    dialect,
                    "no storage type, column skipped"
                );
                continue;
            };
            columns.push(Column {
                name,
                sql_type,
                suffix: field.tag.suffix().unwrap_or_default().to_string(),
            });
        }
        Ok(columns)
    }

    /// Index of the field bound to `column`, if any.
    pub fn find_field_by_column_name<R: Record>(&self, column: &str) -> OrmResult<Option<usize>> {
        let info = self.fields_of::<R>()?;
        Ok(info.find_field_by_column_name(column).map(|f| f.index))
    }

    /// Column/value pairs of `record` in declaration order.
    pub fn values_of<R: Record>(
        &self,
        record: &R,
        zero: ZeroValues,
    ) -> OrmResult<Vec<(String, Value)>> {
        let info = self.fields_of::<R>()?;
        let mut pairs = Vec::new();
        for (field, name) in info.mapped_fields() {
            let Some(value) = record.field_value(field.index) else {
                continue;
            };
            if zero == ZeroValues::Skip && value.is_zero() {
                continue;
            }
            pairs.push((name, value));
        }
        Ok(pairs)
    }
}

#[cfg(test)]
mod tests;
