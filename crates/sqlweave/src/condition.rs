//! Condition sets for WHERE and HAVING clauses.

use crate::catalog::{Catalog, ZeroValues};
use crate::error::OrmResult;
use crate::record::Record;
use crate::template::Template;
use crate::value::Value;
use std::collections::BTreeMap;

/// How the members of a [`Conditions`] set are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Junction {
    #[default]
    And,
    Or,
}

impl Junction {
    fn separator(self) -> &'static str {
        match self {
            Junction::And => " and ",
            Junction::Or => " or ",
        }
    }
}

/// An ordered set of condition templates.
///
/// Blank templates are dropped on insert. [`build`](Conditions::build) wraps
/// each member in parentheses and joins them with `and`/`or`; an empty set
/// builds an empty template, which builders read as "no clause".
///
/// ```rust
/// use sqlweave::{Conditions, Template, values};
///
/// let mut c = Conditions::and();
/// c.push_format("age > ?", values![20]).push(Template::new(" "));
/// c.push_format("name like ?", values!["a%"]);
/// let t = c.build();
/// assert_eq!(t.format, "(age > ?) and (name like ?)");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conditions {
    junction: Junction,
    items: Vec<Template>,
    bracketed: bool,
}

impl Conditions {
    pub fn new(junction: Junction) -> Self {
        Self {
            junction,
            items: Vec::new(),
            bracketed: false,
        }
    }

    /// Conjunctive set.
    pub fn and() -> Self {
        Self::new(Junction::And)
    }

    /// Disjunctive set.
    pub fn or() -> Self {
        Self::new(Junction::Or)
    }

    /// Wrap the whole built group in parentheses, so it keeps its precedence
    /// when spliced next to other conditions by hand.
    pub fn bracketed(mut self, bracketed: bool) -> Self {
        self.bracketed = bracketed;
        self
    }

    pub fn junction(&self) -> Junction {
        self.junction
    }

    pub fn push(&mut self, condition: impl Into<Template>) -> &mut Self {
        let condition = condition.into();
        if !condition.is_empty() {
            self.items.push(condition);
        }
        self
    }

    pub fn push_format(&mut self, format: &str, values: Vec<Value>) -> &mut Self {
        self.push(Template::with_values(format, values))
    }

    /// One `key = ?` condition per entry, in key order.
    pub fn push_map<K, V, I>(&mut self, pairs: I) -> &mut Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let sorted: BTreeMap<String, Value> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        for (key, value) in sorted {
            self.push(Template::with_values(format!("{key} = ?"), vec![value]));
        }
        self
    }

    /// One `column = ?` condition per mapped field of `record`, in key order.
    pub fn push_record<R: Record>(
        &mut self,
        catalog: &Catalog,
        record: &R,
        zero: ZeroValues,
    ) -> OrmResult<&mut Self> {
        let pairs = catalog.values_of(record, zero)?;
        Ok(self.push_map(pairs))
    }

    pub fn extend<I, T>(&mut self, conditions: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Template>,
    {
        for c in conditions {
            self.push(c);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn build(&self) -> Template {
        let joined = Template::join_all(
            self.items.iter().cloned().map(Template::bracket),
            self.junction.separator(),
            "",
            "",
        );
        if self.bracketed {
            // join_all leaves an empty result unwrapped, so this stays empty too.
            return Template::join_all([joined], "", "(", ")");
        }
        joined
    }
}
