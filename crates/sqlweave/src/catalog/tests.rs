use super::*;
use crate::dialect::Sqlite;
use crate::record::FieldDef;
use crate::value::{FromValue, ValueError};

#[derive(Debug, Default, Clone, PartialEq)]
struct Account {
    id: i64,
    display_name: String,
    email: Option<String>,
    score: f64,
    scratch: Vec<String>,
}

impl Record for Account {
    fn record_name() -> &'static str {
        "Account"
    }

    fn fields() -> Vec<FieldDef> {
        vec![
            FieldDef::new("id", "type=integer;suffix=primary key", TypeRef::of::<i64>()),
            FieldDef::new("display_name", "column=name", TypeRef::of::<String>()),
            FieldDef::new("email", "", TypeRef::of::<Option<String>>()),
            FieldDef::new("score", "", TypeRef::of::<f64>()),
            FieldDef::new("scratch", "ignore", TypeRef::opaque::<Vec<String>>()),
        ]
    }

    fn field_value(&self, index: usize) -> Option<Value> {
        match index {
            0 => Some(Value::from(self.id)),
            1 => Some(Value::from(self.display_name.clone())),
            2 => Some(Value::from(self.email.clone())),
            3 => Some(Value::from(self.score)),
            _ => None,
        }
    }

    fn set_field_value(&mut self, index: usize, value: Value) -> Result<(), ValueError> {
        match index {
            0 => self.id = FromValue::from_value(value)?,
            1 => self.display_name = FromValue::from_value(value)?,
            2 => self.email = FromValue::from_value(value)?,
            3 => self.score = FromValue::from_value(value)?,
            _ => {}
        }
        Ok(())
    }
}

/// A field with a type no dialect knows.
#[derive(Debug, Default)]
struct Opaque;

#[allow(dead_code)]
#[derive(Debug, Default)]
struct WithComputed {
    id: i32,
    extra: Opaque,
}

impl Record for WithComputed {
    fn record_name() -> &'static str {
        "WithComputed"
    }

    fn fields() -> Vec<FieldDef> {
        vec![
            FieldDef::new("id", "", TypeRef::of::<i32>()),
            FieldDef::new("extra", "", TypeRef::opaque::<Opaque>()),
        ]
    }

    fn field_value(&self, index: usize) -> Option<Value> {
        match index {
            0 => Some(Value::from(self.id)),
            _ => None,
        }
    }

    fn set_field_value(&mut self, index: usize, value: Value) -> Result<(), ValueError> {
        if index == 0 {
            self.id = FromValue::from_value(value)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Clashing {
    user_id: i64,
    other: i64,
}

impl Record for Clashing {
    fn record_name() -> &'static str {
        "Clashing"
    }

    fn fields() -> Vec<FieldDef> {
        vec![
            FieldDef::new("user_id", "", TypeRef::of::<i64>()),
            FieldDef::new("other", "column=user_id", TypeRef::of::<i64>()),
        ]
    }

    fn field_value(&self, index: usize) -> Option<Value> {
        match index {
            0 => Some(Value::from(self.user_id)),
            1 => Some(Value::from(self.other)),
            _ => None,
        }
    }

    fn set_field_value(&mut self, _index: usize, _value: Value) -> Result<(), ValueError> {
        Ok(())
    }
}

fn sqlite_catalog() -> Catalog {
    let registry = DialectRegistry::new();
    registry.register_default("sqlite3", Sqlite);
    Catalog::new(Arc::new(registry))
}

#[test]
fn column_names_follow_tags_then_snake_case() {
    let catalog = Catalog::default();
    assert_eq!(
        catalog.column_names_of::<Account>().unwrap(),
        vec!["id", "name", "email", "score"]
    );
}

#[test]
fn fields_are_cached() {
    let catalog = Catalog::default();
    let a = catalog.fields_of::<Account>().unwrap();
    let b = catalog.fields_of::<Account>().unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.fields().len(), 5);
    assert!(a.fields()[4].tag.is_ignored());
}

#[test]
fn separate_catalogs_do_not_share_state() {
    let a = Catalog::default();
    let b = Catalog::default();
    let ia = a.fields_of::<Account>().unwrap();
    let ib = b.fields_of::<Account>().unwrap();
    assert!(!Arc::ptr_eq(&ia, &ib));
}

#[test]
fn column_name_round_trip() {
    let catalog = Catalog::default();
    let info = catalog.fields_of::<Account>().unwrap();
    for field in info.fields() {
        match column_name_of(field) {
            Some(column) => {
                let found = info.find_field_by_column_name(&column).unwrap();
                assert_eq!(found, field);
            }
            None => assert!(field.tag.is_ignored()),
        }
    }
    assert!(info.find_field_by_column_name("display_name").is_none());
    assert!(info.find_field_by_column_name("scratch").is_none());
}

#[test]
fn columns_use_explicit_type_then_dialect() {
    let catalog = sqlite_catalog();
    let columns = catalog.columns_of::<Account>("").unwrap();
    assert_eq!(
        columns,
        vec![
            Column::new("id", "integer").suffix("primary key"),
            Column::new("name", "text"),
            Column::new("email", "text"),
            Column::new("score", "real"),
        ]
    );
}

#[test]
fn no_default_dialect_drops_untyped_fields() {
    let catalog = Catalog::default();
    let columns = catalog.columns_of::<Account>("").unwrap();
    assert_eq!(columns, vec![Column::new("id", "integer").suffix("primary key")]);
}

#[test]
fn unmappable_types_are_dropped_silently() {
    let catalog = sqlite_catalog();
    let columns = catalog.columns_of::<WithComputed>("").unwrap();
    assert_eq!(columns, vec![Column::new("id", "integer")]);
}

#[test]
fn strict_mode_reports_gaps() {
    let strict = CatalogConfig::new().strict(true);

    let catalog = Catalog::with_config(Arc::new(DialectRegistry::with_builtins()), strict.clone());
    assert!(matches!(
        catalog.columns_of::<Account>(""),
        Err(OrmError::DialectNotFound(_))
    ));

    let registry = DialectRegistry::new();
    registry.register_default("sqlite3", Sqlite);
    let catalog = Catalog::with_config(Arc::new(registry), strict);
    match catalog.columns_of::<WithComputed>("") {
        Err(OrmError::UnresolvedType { record, field }) => {
            assert_eq!(record, "WithComputed");
            assert_eq!(field, "extra");
        }
        other => panic!("expected UnresolvedType, got {other:?}"),
    }
}

#[test]
fn duplicate_columns_are_rejected() {
    let catalog = Catalog::default();
    match catalog.fields_of::<Clashing>() {
        Err(OrmError::AmbiguousColumn { record, column }) => {
            assert_eq!(record, "Clashing");
            assert_eq!(column, "user_id");
        }
        other => panic!("expected AmbiguousColumn, got {other:?}"),
    }
}

#[test]
fn values_of_honours_zero_policy() {
    let catalog = Catalog::default();
    let account = Account {
        id: 0,
        display_name: "ann".to_string(),
        email: None,
        score: 1.5,
        scratch: vec!["x".to_string()],
    };

    let all = catalog.values_of(&account, ZeroValues::Include).unwrap();
    let names: Vec<&str> = all.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["id", "name", "email", "score"]);
    assert_eq!(all[2].1, Value::Null);

    let set = catalog.values_of(&account, ZeroValues::Skip).unwrap();
    assert_eq!(
        set,
        vec![
            ("name".to_string(), Value::from("ann")),
            ("score".to_string(), Value::from(1.5)),
        ]
    );
}

#[test]
fn find_field_index_by_column() {
    let catalog = Catalog::default();
    assert_eq!(catalog.find_field_by_column_name::<Account>("name").unwrap(), Some(1));
    assert_eq!(catalog.find_field_by_column_name::<Account>("nope").unwrap(), None);
}
