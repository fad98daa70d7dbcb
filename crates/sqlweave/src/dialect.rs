//! Dialects and the dialect registry.
//!
//! A [`Dialect`] maps a field's declared [`TypeRef`] to a storage type
//! string. The [`DialectRegistry`] is an explicit service: construct one,
//! register dialects by name, and hand it to a [`Catalog`](crate::Catalog).
//! The empty name `""` always refers to the current default.

use crate::error::{OrmError, OrmResult};
use crate::value::{TypeKind, TypeRef};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Name under which the default dialect is stored.
pub const DEFAULT_DIALECT: &str = "";

/// Maps host types to SQL storage types.
pub trait Dialect: Send + Sync {
    fn name(&self) -> &str;

    /// Storage type for `ty`, or `None` when this dialect has no mapping.
    fn map_type(&self, ty: &TypeRef) -> Option<String>;

    /// Quote an identifier.
    fn quote(&self, ident: &str) -> String {
        format!("\"{}\"", ident.replace('"', "\"\""))
    }
}

/// SQLite storage classes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sqlite;

impl Dialect for Sqlite {
    fn name(&self) -> &str {
        "sqlite3"
    }

    fn map_type(&self, ty: &TypeRef) -> Option<String> {
        let sql = match ty.kind? {
            TypeKind::Bool
            | TypeKind::Int8
            | TypeKind::Int16
            | TypeKind::Int32
            | TypeKind::Int64 => "integer",
            TypeKind::Float32 | TypeKind::Float64 => "real",
            TypeKind::Text | TypeKind::Uuid | TypeKind::Json => "text",
            TypeKind::Bytes => "blob",
            TypeKind::Date | TypeKind::Timestamp | TypeKind::TimestampTz => "datetime",
        };
        Some(sql.to_string())
    }
}

/// PostgreSQL types.
#[derive(Debug, Clone, Copy, Default)]
pub struct Postgres;

impl Dialect for Postgres {
    fn name(&self) -> &str {
        "postgres"
    }

    fn map_type(&self, ty: &TypeRef) -> Option<String> {
        let sql = match ty.kind? {
            TypeKind::Bool => "boolean",
            TypeKind::Int8 | TypeKind::Int16 => "smallint",
            TypeKind::Int32 => "integer",
            TypeKind::Int64 => "bigint",
            TypeKind::Float32 => "real",
            TypeKind::Float64 => "double precision",
            TypeKind::Text => "text",
            TypeKind::Bytes => "bytea",
            TypeKind::Date => "date",
            TypeKind::Timestamp => "timestamp",
            TypeKind::TimestampTz => "timestamptz",
            TypeKind::Uuid => "uuid",
            TypeKind::Json => "jsonb",
        };
        Some(sql.to_string())
    }
}

/// Named dialects, one of which may be the default.
///
/// Registration is last-write-wins per name. Setting a default stores the
/// dialect under `""` as a single-entry overwrite.
#[derive(Default)]
pub struct DialectRegistry {
    dialects: RwLock<HashMap<String, Arc<dyn Dialect>>>,
}

impl DialectRegistry {
    /// An empty registry with no default.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with `sqlite3` and `postgres` registered and no default.
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        registry.register("sqlite3", Sqlite);
        registry.register("postgres", Postgres);
        registry
    }

    pub fn register(&self, name: &str, dialect: impl Dialect + 'static) {
        self.register_arc(name, Arc::new(dialect));
    }

    pub fn register_arc(&self, name: &str, dialect: Arc<dyn Dialect>) {
        self.dialects
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), dialect);
    }

    /// Register under `name` and make it the default.
    pub fn register_default(&self, name: &str, dialect: impl Dialect + 'static) {
        let dialect: Arc<dyn Dialect> = Arc::new(dialect);
        let mut map = self.dialects.write().unwrap_or_else(PoisonError::into_inner);
        map.insert(name.to_string(), Arc::clone(&dialect));
        map.insert(DEFAULT_DIALECT.to_string(), dialect);
    }

    /// Make the dialect registered as `name` the default.
    ///
    /// Returns `false` (and leaves the default alone) if `name` is unknown.
    pub fn set_default(&self, name: &str) -> bool {
        let mut map = self.dialects.write().unwrap_or_else(PoisonError::into_inner);
        match map.get(name).cloned() {
            Some(dialect) => {
                map.insert(DEFAULT_DIALECT.to_string(), dialect);
                true
            }
            None => false,
        }
    }

    /// Look up a dialect; `""` resolves the default.
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Dialect>> {
        self.dialects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Like [`lookup`](Self::lookup) but fails with [`OrmError::DialectNotFound`].
    pub fn get(&self, name: &str) -> OrmResult<Arc<dyn Dialect>> {
        self.lookup(name)
            .ok_or_else(|| OrmError::DialectNotFound(name.to_string()))
    }

    /// Registered names, sorted, excluding the default alias.
    pub fn names(&self) -> Vec<String> {
        let map = self.dialects.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = map
            .keys()
            .filter(|k| k.as_str() != DEFAULT_DIALECT)
            .cloned()
            .collect();
        names.sort();
        names
    }
}

impl std::fmt::Debug for DialectRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialectRegistry")
            .field("names", &self.names())
            .field("has_default", &self.lookup(DEFAULT_DIALECT).is_some())
            .finish()
    }
}
