//! Condition expressions.
//!
//! Small constructors for the predicates that show up in most WHERE clauses.
//! Each returns a [`Template`] ready for [`Conditions::push`](crate::Conditions::push)
//! or a builder's `and_where_template`.
//!
//! ```rust
//! use sqlweave::expr;
//!
//! let t = expr::in_list("id", [1, 2, 3]);
//! assert_eq!(t.format, "id in (?,?,?)");
//! ```

use crate::template::Template;
use crate::value::Value;

fn binary(column: &str, op: &str, value: Value) -> Template {
    Template::with_values(format!("{column} {op} ?"), vec![value])
}

pub fn eq(column: &str, value: impl Into<Value>) -> Template {
    binary(column, "=", value.into())
}

pub fn ne(column: &str, value: impl Into<Value>) -> Template {
    binary(column, "!=", value.into())
}

pub fn lt(column: &str, value: impl Into<Value>) -> Template {
    binary(column, "<", value.into())
}

pub fn le(column: &str, value: impl Into<Value>) -> Template {
    binary(column, "<=", value.into())
}

pub fn gt(column: &str, value: impl Into<Value>) -> Template {
    binary(column, ">", value.into())
}

pub fn ge(column: &str, value: impl Into<Value>) -> Template {
    binary(column, ">=", value.into())
}

pub fn like(column: &str, pattern: impl Into<Value>) -> Template {
    binary(column, "like", pattern.into())
}

pub fn is_null(column: &str) -> Template {
    Template::new(format!("{column} is null"))
}

pub fn is_not_null(column: &str) -> Template {
    Template::new(format!("{column} is not null"))
}

/// `column <op> (<sub>)`; empty if `sub` is empty.
pub fn compare(column: &str, op: &str, sub: Template) -> Template {
    if sub.is_empty() {
        return Template::default();
    }
    sub.wrap(&format!("{column} {op} ("), ")")
}

fn list(column: &str, op: &str, values: Vec<Value>, when_empty: &str) -> Template {
    if values.is_empty() {
        return Template::new(when_empty);
    }
    let marks = vec!["?"; values.len()].join(",");
    Template::with_values(format!("{column} {op} ({marks})"), values)
}

/// `column in (?,?,...)`. An empty list matches nothing (`1=0`).
pub fn in_list<I, V>(column: &str, values: I) -> Template
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    list(column, "in", values.into_iter().map(Into::into).collect(), "1=0")
}

/// `column not in (?,?,...)`. An empty list matches everything (`1=1`).
pub fn not_in<I, V>(column: &str, values: I) -> Template
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    list(column, "not in", values.into_iter().map(Into::into).collect(), "1=1")
}

/// `column in (<sub>)`
pub fn in_subquery(column: &str, sub: Template) -> Template {
    compare(column, "in", sub)
}

/// `column not in (<sub>)`
pub fn not_in_subquery(column: &str, sub: Template) -> Template {
    compare(column, "not in", sub)
}

pub fn between(column: &str, low: impl Into<Value>, high: impl Into<Value>) -> Template {
    Template::with_values(
        format!("{column} between ? and ?"),
        vec![low.into(), high.into()],
    )
}

pub fn not_between(column: &str, low: impl Into<Value>, high: impl Into<Value>) -> Template {
    Template::with_values(
        format!("{column} not between ? and ?"),
        vec![low.into(), high.into()],
    )
}

/// `exists (<sub>)`; empty if `sub` is empty.
pub fn exists(sub: Template) -> Template {
    if sub.is_empty() {
        return Template::default();
    }
    sub.wrap("exists (", ")")
}

pub fn not_exists(sub: Template) -> Template {
    if sub.is_empty() {
        return Template::default();
    }
    sub.wrap("not exists (", ")")
}

/// `not (<cond>)`; empty if `cond` is empty.
pub fn not(cond: Template) -> Template {
    if cond.is_empty() {
        return Template::default();
    }
    cond.wrap("not (", ")")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values;

    #[test]
    fn comparisons() {
        let t = eq("id", 1);
        assert_eq!(t.format, "id = ?");
        assert_eq!(t.values, values![1]);
        assert_eq!(ne("a", 1).format, "a != ?");
        assert_eq!(le("a", 1).format, "a <= ?");
        assert_eq!(like("name", "a%").format, "name like ?");
    }

    #[test]
    fn lists() {
        let t = not_in("id", vec![4_i64, 5]);
        assert_eq!(t.format, "id not in (?,?)");
        assert_eq!(t.values, values![4, 5]);
        assert_eq!(in_list("id", Vec::<i64>::new()).format, "1=0");
        assert_eq!(not_in("id", Vec::<i64>::new()).format, "1=1");
    }

    #[test]
    fn subqueries() {
        let sub = Template::with_values("select user_id from orders where total > ?", values![100]);
        let t = in_subquery("id", sub.clone());
        assert_eq!(t.format, "id in (select user_id from orders where total > ?)");
        assert_eq!(t.values, values![100]);
        assert_eq!(exists(sub).format, "exists (select user_id from orders where total > ?)");
        assert!(in_subquery("id", Template::default()).is_empty());
    }

    #[test]
    fn ranges_and_negation() {
        let t = between("age", 18, 30);
        assert_eq!(t.format, "age between ? and ?");
        assert_eq!(t.values, values![18, 30]);
        assert_eq!(not(is_null("x")).format, "not (x is null)");
        assert!(not(Template::new(" ")).is_empty());
    }
}
