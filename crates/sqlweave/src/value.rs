//! Dynamically typed parameter and column values.
//!
//! [`Value`] is what a [`Template`](crate::Template) binds and what a
//! [`Cursor`](crate::Cursor) yields. Host types move in through `From` and out
//! through [`FromValue`]. [`ColumnType`] tells dialects what a host type is
//! without any runtime reflection.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// A single bound parameter or column value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
    TimestampTz(DateTime<Utc>),
    Uuid(Uuid),
    Json(serde_json::Value),
}

impl Value {
    /// Short name of the variant, used in conversion errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::Date(_) => "date",
            Value::Timestamp(_) => "timestamp",
            Value::TimestampTz(_) => "timestamptz",
            Value::Uuid(_) => "uuid",
            Value::Json(_) => "json",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether this is the zero value of its kind.
    ///
    /// Record-driven conditions and assignments can skip zero-valued fields
    /// and treat them as "unset".
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Int(i) => *i == 0,
            Value::Float(f) => *f == 0.0,
            Value::Text(s) => s.is_empty(),
            Value::Bytes(b) => b.is_empty(),
            Value::Date(d) => *d == NaiveDate::default(),
            Value::Timestamp(ts) => *ts == NaiveDateTime::default(),
            Value::TimestampTz(ts) => *ts == DateTime::<Utc>::default(),
            Value::Uuid(u) => u.is_nil(),
            Value::Json(j) => j.is_null(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(s) => write!(f, "{s:?}"),
            Value::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Value::Date(d) => write!(f, "{d}"),
            Value::Timestamp(ts) => write!(f, "{ts}"),
            Value::TimestampTz(ts) => write!(f, "{}", ts.to_rfc3339()),
            Value::Uuid(u) => write!(f, "{u}"),
            Value::Json(j) => write!(f, "{j}"),
        }
    }
}

macro_rules! value_from {
    ($variant:ident: $($ty:ty),+ => $conv:expr) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant($conv(v))
                }
            }
        )+
    };
}

value_from!(Bool: bool => |v| v);
value_from!(Int: i8, i16, i32, i64, u8, u16, u32 => i64::from);
value_from!(Float: f32, f64 => f64::from);
value_from!(Text: String => |v| v);
value_from!(Bytes: Vec<u8> => |v| v);
value_from!(Date: NaiveDate => |v| v);
value_from!(Timestamp: NaiveDateTime => |v| v);
value_from!(TimestampTz: DateTime<Utc> => |v| v);
value_from!(Uuid: Uuid => |v| v);
value_from!(Json: serde_json::Value => |v| v);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// A [`Value`] could not be converted into the requested host type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot convert {found} value into {expected}")]
pub struct ValueError {
    pub expected: &'static str,
    pub found: &'static str,
}

impl ValueError {
    fn new<T: ?Sized>(found: &Value) -> Self {
        Self {
            expected: std::any::type_name::<T>(),
            found: found.kind_name(),
        }
    }
}

/// Conversion from a dynamically typed [`Value`] into a host type.
///
/// Conversions are lenient where drivers commonly disagree: integers
/// decode into `bool`, text decodes into dates and UUIDs (SQLite stores
/// both as text), and timestamps drop their offset into `NaiveDateTime`.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, ValueError>;
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        Ok(value)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Bool(b) => Ok(b),
            Value::Int(i) => Ok(i != 0),
            other => Err(ValueError::new::<bool>(&other)),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Int(i) => Ok(i),
            Value::Bool(b) => Ok(i64::from(b)),
            other => Err(ValueError::new::<i64>(&other)),
        }
    }
}

macro_rules! narrow_int_from_value {
    ($($ty:ty),+) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, ValueError> {
                    let found = value.kind_name();
                    i64::from_value(value).and_then(|i| {
                        <$ty>::try_from(i).map_err(|_| ValueError {
                            expected: stringify!($ty),
                            found,
                        })
                    })
                }
            }
        )+
    };
}

narrow_int_from_value!(i8, i16, i32, u8, u16, u32);

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Float(f) => Ok(f),
            Value::Int(i) => Ok(i as f64),
            other => Err(ValueError::new::<f64>(&other)),
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        f64::from_value(value).map(|f| f as f32)
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Text(s) => Ok(s),
            Value::Uuid(u) => Ok(u.to_string()),
            other => Err(ValueError::new::<String>(&other)),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Bytes(b) => Ok(b),
            Value::Text(s) => Ok(s.into_bytes()),
            other => Err(ValueError::new::<Vec<u8>>(&other)),
        }
    }
}

impl FromValue for NaiveDate {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Date(d) => Ok(d),
            Value::Timestamp(ts) => Ok(ts.date()),
            Value::Text(ref s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|_| ValueError::new::<NaiveDate>(&value)),
            other => Err(ValueError::new::<NaiveDate>(&other)),
        }
    }
}

impl FromValue for NaiveDateTime {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Timestamp(ts) => Ok(ts),
            Value::TimestampTz(ts) => Ok(ts.naive_utc()),
            Value::Text(ref s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
                .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
                .map_err(|_| ValueError::new::<NaiveDateTime>(&value)),
            other => Err(ValueError::new::<NaiveDateTime>(&other)),
        }
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::TimestampTz(ts) => Ok(ts),
            Value::Timestamp(ts) => Ok(ts.and_utc()),
            Value::Text(ref s) => DateTime::parse_from_rfc3339(s)
                .map(|ts| ts.with_timezone(&Utc))
                .map_err(|_| ValueError::new::<DateTime<Utc>>(&value)),
            other => Err(ValueError::new::<DateTime<Utc>>(&other)),
        }
    }
}

impl FromValue for Uuid {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Uuid(u) => Ok(u),
            Value::Text(ref s) => Uuid::parse_str(s).map_err(|_| ValueError::new::<Uuid>(&value)),
            Value::Bytes(ref b) => Uuid::from_slice(b).map_err(|_| ValueError::new::<Uuid>(&value)),
            other => Err(ValueError::new::<Uuid>(&other)),
        }
    }
}

impl FromValue for serde_json::Value {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Json(j) => Ok(j),
            Value::Text(ref s) => {
                serde_json::from_str(s).map_err(|_| ValueError::new::<serde_json::Value>(&value))
            }
            other => Err(ValueError::new::<serde_json::Value>(&other)),
        }
    }
}

/// Storage-relevant classification of a host type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Text,
    Bytes,
    Date,
    Timestamp,
    TimestampTz,
    Uuid,
    Json,
}

/// Declared type of a record field as seen by dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeRef {
    /// Rust type name, for diagnostics.
    pub name: &'static str,
    /// `None` for types no dialect knows how to store.
    pub kind: Option<TypeKind>,
    pub nullable: bool,
}

impl TypeRef {
    pub fn of<T: ColumnType + ?Sized>() -> Self {
        Self {
            name: std::any::type_name::<T>(),
            kind: T::KIND,
            nullable: T::NULLABLE,
        }
    }

    /// A type with no storage mapping (ignored or computed fields).
    pub fn opaque<T: ?Sized>() -> Self {
        Self {
            name: std::any::type_name::<T>(),
            kind: None,
            nullable: false,
        }
    }
}

/// Static storage classification for a field type.
///
/// Implement this for your own types with `KIND = None` to keep them out of
/// DDL unless a `type` tag is given, or with a concrete kind to let dialects
/// map them.
pub trait ColumnType {
    const KIND: Option<TypeKind>;
    const NULLABLE: bool = false;
}

macro_rules! column_type {
    ($($ty:ty => $kind:ident),+ $(,)?) => {
        $(
            impl ColumnType for $ty {
                const KIND: Option<TypeKind> = Some(TypeKind::$kind);
            }
        )+
    };
}

column_type! {
    bool => Bool,
    i8 => Int8,
    u8 => Int16,
    i16 => Int16,
    u16 => Int32,
    i32 => Int32,
    u32 => Int64,
    i64 => Int64,
    f32 => Float32,
    f64 => Float64,
    String => Text,
    str => Text,
    Vec<u8> => Bytes,
    NaiveDate => Date,
    NaiveDateTime => Timestamp,
    DateTime<Utc> => TimestampTz,
    Uuid => Uuid,
    serde_json::Value => Json,
}

impl ColumnType for Value {
    const KIND: Option<TypeKind> = None;
    const NULLABLE: bool = true;
}

impl<T: ColumnType> ColumnType for Option<T> {
    const KIND: Option<TypeKind> = T::KIND;
    const NULLABLE: bool = true;
}
