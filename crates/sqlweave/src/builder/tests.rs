use super::*;
use crate::catalog::{Catalog, ZeroValues};
use crate::condition::Conditions;
use crate::dialect::{DialectRegistry, Sqlite};
use crate::error::OrmError;
use crate::expr;
use crate::record::{FieldDef, Record};
use crate::template::Template;
use crate::value::{FromValue, TypeRef, Value, ValueError};
use crate::values;
use std::sync::Arc;

#[derive(Debug, Default, Clone, PartialEq)]
struct Post {
    id: i64,
    title: String,
    views: i32,
}

impl Record for Post {
    fn record_name() -> &'static str {
        "Post"
    }

    fn fields() -> Vec<FieldDef> {
        vec![
            FieldDef::new("id", "suffix=primary key", TypeRef::of::<i64>()),
            FieldDef::new("title", "type=varchar(200);suffix=not null", TypeRef::of::<String>()),
            FieldDef::new("views", "column=view_count", TypeRef::of::<i32>()),
        ]
    }

    fn field_value(&self, index: usize) -> Option<Value> {
        match index {
            0 => Some(Value::from(self.id)),
            1 => Some(Value::from(self.title.clone())),
            2 => Some(Value::from(self.views)),
            _ => None,
        }
    }

    fn set_field_value(&mut self, index: usize, value: Value) -> Result<(), ValueError> {
        match index {
            0 => self.id = FromValue::from_value(value)?,
            1 => self.title = FromValue::from_value(value)?,
            2 => self.views = FromValue::from_value(value)?,
            _ => {}
        }
        Ok(())
    }
}

fn sqlite_catalog() -> Catalog {
    let registry = DialectRegistry::with_builtins();
    registry.register_default("sqlite3", Sqlite);
    Catalog::new(Arc::new(registry))
}

// ==================== select ====================

#[test]
fn select_with_condition() {
    let mut q = select("user", &["id", "name", "age"]);
    q.and_where("age > ?", values![20]);
    let t = q.build();
    assert_eq!(t.format, "select id,name,age from user where (age > ?)");
    assert_eq!(t.values, values![20]);
}

#[test]
fn select_without_columns_selects_star() {
    assert_eq!(select("user", &[]).to_sql(), "select * from user");
}

#[test]
fn clause_order_ignores_call_order() {
    let mut q = select("orders o", &["o.user_id", "count(*) as n"]);
    q.limit(10)
        .order_by(&["n desc"])
        .having("count(*) > ?", values![2])
        .group_by(&["o.user_id"])
        .and_where("o.status = ?", values!["paid"])
        .left_join("users u", "u.id = o.user_id")
        .offset(20)
        .distinct();
    let t = q.build();
    assert_eq!(
        t.format,
        "select distinct o.user_id,count(*) as n from orders o \
         left join users u on u.id = o.user_id \
         where (o.status = ?) group by o.user_id having (count(*) > ?) \
         order by n desc limit ? offset ?"
    );
    assert_eq!(t.values, values!["paid", 2, 10i64, 20i64]);
    t.validate().unwrap();
}

#[test]
fn empty_conditions_omit_where() {
    let mut q = select("user", &["id"]);
    q.and_where(" ", vec![]).and_where_template(Conditions::or().build());
    assert_eq!(q.to_sql(), "select id from user");
}

#[test]
fn or_groups_keep_their_precedence() {
    let mut either = Conditions::or();
    either.push(expr::eq("role", "admin")).push(expr::gt("karma", 100));
    let mut q = select("user", &["id"]);
    q.and_where("active = ?", values![true]).and_where_template(either.build());
    let t = q.build();
    assert_eq!(
        t.format,
        "select id from user where (active = ?) and ((role = ?) or (karma > ?))"
    );
    assert_eq!(t.values, values![true, "admin", 100]);
}

#[test]
fn include_and_exclude_filter_columns() {
    let mut q = select("user", &["id", "name", "password"]);
    q.exclude(&["password"]);
    assert_eq!(q.to_sql(), "select id,name from user");

    let mut q = select("user", &["id", "name", "password"]);
    q.include(&["id"]);
    assert_eq!(q.to_sql(), "select id from user");

    let mut q = select("user", &["id"]);
    q.exclude(&["id"]);
    assert_eq!(q.to_sql(), "select * from user");
}

#[test]
fn columns_may_carry_values() {
    let mut q = select("user", &["id"]);
    q.column(Template::with_values("coalesce(nick, ?) as nick", values!["anon"]));
    let t = q.build();
    assert_eq!(t.format, "select id,coalesce(nick, ?) as nick from user");
    assert_eq!(t.values, values!["anon"]);
}

#[test]
fn subqueries_nest_with_their_values() {
    let mut inner = select("orders", &["user_id"]);
    inner.and_where("total > ?", values![100]);
    let mut outer = select("user", &["id"]);
    outer
        .and_where("age > ?", values![18])
        .and_where_template(expr::in_subquery("id", inner.build()));
    let t = outer.build();
    assert_eq!(
        t.format,
        "select id from user where (age > ?) and (id in (select user_id from orders where (total > ?)))"
    );
    assert_eq!(t.values, values![18, 100]);

    let derived = inner.as_subquery("big");
    assert_eq!(
        derived.format,
        "(select user_id from orders where (total > ?)) as big"
    );
}

#[test]
fn raw_paging_wins_over_limit() {
    let mut q = select("user", &["id"]);
    q.limit(5).paging(Template::with_values("limit ?, ?", values![0, 5]));
    let t = q.build();
    assert_eq!(t.format, "select id from user limit ?, ?");
    assert_eq!(t.values, values![0, 5]);
}

#[test]
fn page_converts_to_limit_offset() {
    let mut q = select("user", &["id"]);
    q.order_by(&["id"]).page(3, 25).unwrap();
    let t = q.build();
    assert_eq!(t.format, "select id from user order by id limit ? offset ?");
    assert_eq!(t.values, values![25, 50]);
}

#[test]
fn page_rejects_zero() {
    let mut q = select("user", &["id"]);
    assert!(matches!(q.page(0, 25), Err(OrmError::Validation(_))));
}

#[test]
fn page_rejects_negative() {
    let mut q = select("user", &["id"]);
    assert!(q.page(-1, 25).is_err());
    assert_eq!(q.build().format, "select id from user");
}

#[test]
fn build_is_repeatable() {
    let mut q = select("user", &["id"]);
    q.and_where("id = ?", values![1]).limit(1);
    assert_eq!(q.build(), q.build());
}

#[test]
fn record_columns_and_where() {
    let catalog = sqlite_catalog();
    let mut q = QueryBuilder::new("post");
    q.record_columns::<Post>(&catalog).unwrap();
    let probe = Post {
        title: "hello".into(),
        ..Post::default()
    };
    q.and_where_record(&catalog, &probe, ZeroValues::Skip).unwrap();
    let t = q.build();
    assert_eq!(t.format, "select id,title,view_count from post where (title = ?)");
    assert_eq!(t.values, values!["hello"]);
}

// ==================== insert ====================

#[test]
fn insert_single_row() {
    let mut i = insert("user");
    i.set("id", 1).set("name", "a");
    let t = i.build();
    assert_eq!(t.format, "insert into user(id,name) values(?,?)");
    assert_eq!(t.values, values![1, "a"]);
}

#[test]
fn insert_from_map_is_key_ordered() {
    let mut i = insert("user");
    i.set_map([("name", Value::from("a")), ("id", Value::from(1))]);
    assert_eq!(i.to_sql(), "insert into user(id,name) values(?,?)");
}

#[test]
fn insert_from_record_honours_filters() {
    let catalog = sqlite_catalog();
    let post = Post {
        id: 9,
        title: "t".into(),
        views: 0,
    };
    let mut i = insert("post");
    i.set_record(&catalog, &post, ZeroValues::Include).unwrap().exclude(&["id"]);
    let t = i.build();
    assert_eq!(t.format, "insert into post(title,view_count) values(?,?)");
    assert_eq!(t.values, values!["t", 0]);
}

#[test]
fn insert_with_nothing_to_set_builds_nothing() {
    assert!(insert("user").build().is_empty());
}

#[test]
fn insert_with_where() {
    let mut i = insert("user");
    i.set("name", "a").and_where("not exists (select 1 from user where name = ?)", values!["a"]);
    let t = i.build();
    assert_eq!(
        t.format,
        "insert into user(name) values(?) where (not exists (select 1 from user where name = ?))"
    );
    assert_eq!(t.values, values!["a", "a"]);
}

// ==================== update / delete ====================

#[test]
fn update_with_condition() {
    let mut u = update("user");
    u.set("name", "X").and_where("id = ?", values![1]);
    let t = u.build();
    assert_eq!(t.format, "update user set name=? where (id = ?)");
    assert_eq!(t.values, values!["X", 1]);
    u.validate().unwrap();
}

#[test]
fn update_without_where_needs_all_rows() {
    let mut u = update("user");
    u.set("active", false);
    assert!(u.build().is_empty());
    assert!(matches!(u.validate(), Err(OrmError::Validation(_))));

    u.all_rows();
    assert_eq!(u.to_sql(), "update user set active=?");
    u.validate().unwrap();
}

#[test]
fn update_needs_columns() {
    let mut u = update("user");
    u.and_where("id = ?", values![1]);
    assert!(u.build().is_empty());
    assert!(u.validate().is_err());
}

#[test]
fn update_from_record_skipping_zero_values() {
    let catalog = sqlite_catalog();
    let patch = Post {
        title: "new".into(),
        ..Post::default()
    };
    let mut u = update("post");
    u.set_record(&catalog, &patch, ZeroValues::Skip)
        .unwrap()
        .and_where_map([("id", 3)]);
    let t = u.build();
    assert_eq!(t.format, "update post set title=? where (id = ?)");
    assert_eq!(t.values, values!["new", 3]);
}

#[test]
fn delete_with_and_without_where() {
    let mut d = delete("user");
    assert!(d.build().is_empty());
    assert!(d.validate().is_err());

    d.and_where("id = ?", values![4]);
    let t = d.build();
    assert_eq!(t.format, "delete from user where (id = ?)");
    assert_eq!(t.values, values![4]);

    let mut all = delete("session");
    all.all_rows();
    assert_eq!(all.to_sql(), "delete from session");
    all.validate().unwrap();
}

// ==================== batch insert ====================

#[test]
fn batch_insert_rows() {
    let mut b = batch_insert("user");
    b.row([("name", Value::from("a")), ("id", Value::from(1))])
        .row([("id", Value::from(2)), ("name", Value::from("b"))]);
    let t = b.build();
    assert_eq!(t.format, "insert into user(id,name) values(?,?),(?,?)");
    assert_eq!(t.values, values![1, "a", 2, "b"]);
    b.validate().unwrap();
}

#[test]
fn batch_insert_missing_key() {
    let mut b = batch_insert("user");
    b.row([("id", Value::from(1)), ("name", Value::from("a"))])
        .row([("id", Value::from(2)), ("nick", Value::from("x"))]);
    let t = b.build();
    assert_eq!(t.values, values![1, "a", 2, Value::Null]);
    match b.validate() {
        Err(OrmError::Validation(msg)) => assert!(msg.contains("name"), "{msg}"),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn batch_insert_from_records() {
    let catalog = sqlite_catalog();
    let posts = vec![
        Post { id: 1, title: "a".into(), views: 3 },
        Post { id: 2, title: "b".into(), views: 0 },
    ];
    let mut b = batch_insert("post");
    b.record_rows(&catalog, &posts).unwrap();
    let t = b.build();
    assert_eq!(t.format, "insert into post(id,title,view_count) values(?,?,?),(?,?,?)");
    assert_eq!(t.values, values![1i64, "a", 3, 2i64, "b", 0]);
}

#[test]
fn empty_batch_builds_nothing() {
    let b = batch_insert("user");
    assert!(b.is_empty());
    assert!(b.build().is_empty());
}

// ==================== table ====================

#[test]
fn create_table_compact() {
    let mut t = create_table(
        "user",
        vec![
            Column::new("id", "integer").suffix("primary key"),
            Column::new("name", "text"),
        ],
    );
    t.if_not_exists();
    assert_eq!(
        t.to_sql(),
        "create table if not exists user (id integer primary key,name text);"
    );
}

#[test]
fn create_table_indented() {
    let mut t = create_table(
        "user",
        vec![
            Column::new("id", "integer").suffix("primary key"),
            Column::new("name", "text"),
        ],
    );
    t.indent("", "  ").append_inner("unique (name)");
    assert_eq!(
        t.to_sql(),
        "create table user (\n  id integer primary key,\n  name text,\n  unique (name)\n);\n"
    );
}

#[test]
fn empty_inner_items_are_skipped() {
    let mut t = create_table("t", vec![Column::new("id", "integer")]);
    t.prepend_inner("").append_inner("  ");
    assert_eq!(t.to_sql(), "create table t (id integer);");
    t.indent("", "  ");
    assert_eq!(t.to_sql(), "create table t (\n  id integer\n);\n");
}

#[test]
fn drop_table_if_exists() {
    let mut t = drop_table("user");
    assert_eq!(t.to_sql(), "drop table user;");
    t.if_exists();
    assert_eq!(t.to_sql(), "drop table if exists user;");
}

#[test]
fn outer_statements_surround_the_main_one() {
    let mut t = create_table("tag", vec![Column::new("name", "text")]);
    t.prepend("pragma foreign_keys = on;")
        .append("create index tag_name on tag(name);");
    assert_eq!(
        t.to_sql(),
        "pragma foreign_keys = on; create table tag (name text); create index tag_name on tag(name);"
    );
}

#[test]
fn create_table_without_columns_builds_nothing() {
    let mut t = create_table("t", vec![Column::new("a", "text")]);
    t.exclude(&["a"]);
    assert!(t.build().is_empty());
}

#[test]
fn create_table_from_record() {
    let catalog = sqlite_catalog();
    let mut t = TableBuilder::new();
    t.create_table_record::<Post>(&catalog, "post").unwrap();
    assert_eq!(
        t.to_sql(),
        "create table post (id integer primary key,title varchar(200) not null,view_count integer);"
    );
}

#[test]
fn batch_tables() {
    let catalog = sqlite_catalog();
    let defs = vec![
        TableDef::from_record::<Post>(&catalog, "post", "").unwrap(),
        TableDef::new("tag", vec![Column::new("name", "text")]),
    ];
    assert_eq!(
        batch_create_tables(&defs, true).format,
        "create table if not exists post (id integer primary key,title varchar(200) not null,view_count integer);\n\
         create table if not exists tag (name text);"
    );
    assert_eq!(
        batch_drop_tables(&["post", "tag"], true).format,
        "drop table if exists post;\ndrop table if exists tag;"
    );
    assert!(batch_drop_tables::<&str>(&[], false).is_empty());
}
