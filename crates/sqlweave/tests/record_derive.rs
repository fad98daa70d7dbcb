//! `#[derive(Record)]` through the catalog, DDL and row mapping.

use chrono::NaiveDateTime;
use sqlweave::{
    BufferedCursor, Catalog, CatalogConfig, Column, DialectRegistry, FromValue, OrmError, Record,
    Rows, SqlBuilder, TableBuilder, Value, ValueError, ZeroValues, insert, values,
};
use std::sync::Arc;

#[derive(Debug, Default, Clone, PartialEq, Record)]
struct User {
    #[orm(type = "integer", suffix = "primary key")]
    id: i64,
    #[orm(column = "user_name", suffix = "not null")]
    name: String,
    email: Option<String>,
    created_at: Option<NaiveDateTime>,
    #[orm(ignore)]
    cache: Vec<String>,
}

/// A type with no storage kind; only usable with an explicit `type`.
#[derive(Debug, Default, Clone, PartialEq)]
struct Cents(i64);

impl From<Cents> for Value {
    fn from(c: Cents) -> Self {
        Value::Int(c.0)
    }
}

impl FromValue for Cents {
    fn from_value(value: Value) -> Result<Self, ValueError> {
        i64::from_value(value).map(Cents)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Record)]
struct Invoice {
    id: i64,
    #[orm(type = "numeric(12, 0)")]
    total: Cents,
}

/// Raw identifiers and the widest unsigned integer a column can hold.
#[derive(Debug, Default, Clone, PartialEq, Record)]
struct Item {
    id: i64,
    r#type: String,
    hits: u32,
}

#[test]
fn field_table_keeps_declaration_order_and_tags() {
    let fields = User::fields();
    let names: Vec<_> = fields.iter().map(|f| f.name).collect();
    assert_eq!(names, ["id", "name", "email", "created_at", "cache"]);
    assert_eq!(fields[0].tag, "type=integer;suffix=primary key");
    assert_eq!(fields[1].tag, "column=user_name;suffix=not null");
    assert_eq!(fields[4].tag, "ignore");
    assert_eq!(User::record_name(), "User");
}

#[test]
fn ignored_fields_have_no_value() {
    let user = User {
        cache: vec!["x".into()],
        ..User::default()
    };
    assert_eq!(user.field_value(4), None);
    assert_eq!(user.field_value(2), Some(Value::Null));
}

#[test]
fn column_names_follow_tags() {
    let catalog = Catalog::default();
    assert_eq!(
        catalog.column_names_of::<User>().unwrap(),
        ["id", "user_name", "email", "created_at"]
    );
    assert_eq!(catalog.find_field_by_column_name::<User>("user_name").unwrap(), Some(1));
    assert_eq!(catalog.find_field_by_column_name::<User>("cache").unwrap(), None);
}

#[test]
fn columns_resolve_through_named_dialects() {
    let catalog = Catalog::default();
    assert_eq!(
        catalog.columns_of::<User>("postgres").unwrap(),
        vec![
            Column::new("id", "integer").suffix("primary key"),
            Column::new("user_name", "text").suffix("not null"),
            Column::new("email", "text"),
            Column::new("created_at", "timestamp"),
        ]
    );
    assert_eq!(
        catalog.columns_of::<User>("sqlite3").unwrap()[3],
        Column::new("created_at", "datetime")
    );
}

#[test]
fn without_a_default_dialect_only_explicit_types_survive() {
    let catalog = Catalog::default();
    let columns = catalog.columns_of::<User>("").unwrap();
    assert_eq!(columns, vec![Column::new("id", "integer").suffix("primary key")]);

    let strict = Catalog::with_config(
        Arc::new(DialectRegistry::with_builtins()),
        CatalogConfig::new().strict(true),
    );
    assert!(matches!(
        strict.columns_of::<User>(""),
        Err(OrmError::DialectNotFound(_))
    ));
}

#[test]
fn explicit_type_covers_custom_field_types() {
    let catalog = Catalog::default();
    assert_eq!(
        catalog.columns_of::<Invoice>("postgres").unwrap(),
        vec![
            Column::new("id", "bigint"),
            Column::new("total", "numeric(12, 0)"),
        ]
    );
}

#[test]
fn ddl_from_derived_record() {
    let catalog = Catalog::default();
    let mut table = TableBuilder::new();
    table.dialect("postgres");
    table
        .create_table_record::<User>(&catalog, "users")
        .unwrap()
        .if_not_exists()
        .indent("", "    ");
    assert_eq!(
        table.to_sql(),
        "create table if not exists users (\n\
         \x20   id integer primary key,\n\
         \x20   user_name text not null,\n\
         \x20   email text,\n\
         \x20   created_at timestamp\n\
         );\n"
    );
}

#[test]
fn insert_from_derived_record() {
    let catalog = Catalog::default();
    let user = User {
        id: 1,
        name: "ann".into(),
        ..User::default()
    };
    let mut i = insert("users");
    i.set_record(&catalog, &user, ZeroValues::Skip).unwrap();
    let t = i.build();
    assert_eq!(t.format, "insert into users(id,user_name) values(?,?)");
    assert_eq!(t.values, values![1i64, "ann"]);
}

#[test]
fn rows_map_into_derived_records() {
    let created = chrono::NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    let cursor = BufferedCursor::new(
        ["created_at", "user_name", "id", "email"],
        vec![
            values![created, "ann", 1, "a@x.io"],
            values![Value::Null, "bob", 2, Value::Null],
        ],
    );
    let rows = Rows::new(cursor, Arc::new(Catalog::default()));
    let users: Vec<User> = rows.into_records().unwrap();
    assert_eq!(users[0].name, "ann");
    assert_eq!(users[0].created_at, Some(created));
    assert_eq!(users[0].email.as_deref(), Some("a@x.io"));
    assert_eq!(users[1].id, 2);
    assert_eq!(users[1].created_at, None);
}

#[test]
fn mismatched_values_fail_with_the_column_name() {
    let cursor = BufferedCursor::new(["id"], vec![values!["nope"]]);
    let rows = Rows::new(cursor, Arc::new(Catalog::default()));
    match rows.into_record::<User>() {
        Err(OrmError::Decode { column, .. }) => assert_eq!(column, "id"),
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[test]
fn raw_identifiers_map_to_their_plain_names() {
    let catalog = Catalog::default();
    assert_eq!(Item::fields()[1].name, "type");
    assert_eq!(catalog.column_names_of::<Item>().unwrap(), ["id", "type", "hits"]);
    assert_eq!(catalog.find_field_by_column_name::<Item>("type").unwrap(), Some(1));

    let item = Item {
        id: 7,
        r#type: "tool".into(),
        hits: u32::MAX,
    };
    let mut i = insert("items");
    i.set_record(&catalog, &item, ZeroValues::Include).unwrap();
    let t = i.build();
    assert_eq!(t.format, "insert into items(id,type,hits) values(?,?,?)");
    assert_eq!(t.values, values![7i64, "tool", i64::from(u32::MAX)]);
}

#[test]
fn unsigned_fields_round_trip_through_rows() {
    let catalog = Arc::new(Catalog::default());
    assert_eq!(
        catalog.columns_of::<Item>("postgres").unwrap()[2],
        Column::new("hits", "bigint")
    );

    let cursor = BufferedCursor::new(["type", "hits", "id"], vec![values!["tool", 42, 1]]);
    let item: Item = Rows::new(cursor, Arc::clone(&catalog)).into_record().unwrap();
    assert_eq!(
        item,
        Item {
            id: 1,
            r#type: "tool".into(),
            hits: 42
        }
    );

    let cursor = BufferedCursor::new(["hits"], vec![values![-1]]);
    match Rows::new(cursor, catalog).into_record::<Item>() {
        Err(OrmError::Decode { column, .. }) => assert_eq!(column, "hits"),
        other => panic!("expected decode error, got {other:?}"),
    }
}
