//! SQL fragments with positionally bound values.
//!
//! A [`Template`] pairs format text using `?` placeholders with the values
//! those placeholders bind, in order. Every composition method consumes the
//! template and returns a new one; the N-th `?` always binds the N-th value.
//!
//! ```rust
//! use sqlweave::{Template, values};
//!
//! let cond = Template::with_values("age > ?", values![20]);
//! let t = Template::new("select * from user")
//!     .join(" where ", cond.bracket());
//! assert_eq!(t.format, "select * from user where (age > ?)");
//! assert_eq!(t.values.len(), 1);
//! ```

use crate::error::{OrmError, OrmResult};
use crate::value::Value;
use std::fmt;

/// An immutable SQL fragment and its ordered parameter values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Template {
    pub format: String,
    pub values: Vec<Value>,
}

impl Template {
    /// A template with no bound values.
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            values: Vec::new(),
        }
    }

    pub fn with_values(format: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            format: format.into(),
            values,
        }
    }

    /// Bind one more value without touching the format.
    #[must_use]
    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.values.push(value.into());
        self
    }

    /// Append format text and its values after the existing ones.
    #[must_use]
    pub fn append(mut self, format: &str, values: Vec<Value>) -> Self {
        self.format.push_str(format);
        self.values.extend(values);
        self
    }

    /// Append another template verbatim (no separator, no short-circuit).
    #[must_use]
    pub fn append_template(self, other: Template) -> Self {
        self.append(&other.format, other.values)
    }

    /// Put format text and its values before the existing ones.
    #[must_use]
    pub fn prepend(self, format: &str, mut values: Vec<Value>) -> Self {
        values.extend(self.values);
        Self {
            format: format!("{format}{}", self.format),
            values,
        }
    }

    #[must_use]
    pub fn wrap(self, left: &str, right: &str) -> Self {
        Self {
            format: format!("{left}{}{right}", self.format),
            values: self.values,
        }
    }

    /// Wrap in parentheses.
    #[must_use]
    pub fn bracket(self) -> Self {
        self.wrap("(", ")")
    }

    /// Join two templates with `separator`.
    ///
    /// An empty operand contributes nothing: joining with an empty template
    /// yields the other side unchanged, with no separator.
    #[must_use]
    pub fn join(self, separator: &str, other: Template) -> Self {
        if other.is_empty() {
            return self;
        }
        if self.is_empty() {
            return other;
        }
        let mut values = self.values;
        values.extend(other.values);
        Self {
            format: format!("{}{separator}{}", self.format, other.format),
            values,
        }
    }

    /// Join many templates with `separator`, then wrap the result in
    /// `left`/`right`. Empty items are skipped; if nothing remains the
    /// result is empty and unwrapped.
    pub fn join_all<I>(items: I, separator: &str, left: &str, right: &str) -> Self
    where
        I: IntoIterator<Item = Template>,
    {
        let joined = items
            .into_iter()
            .fold(Template::default(), |acc, t| acc.join(separator, t));
        if joined.is_empty() {
            return joined;
        }
        joined.wrap(left, right)
    }

    /// True if the format is blank after trimming whitespace.
    pub fn is_empty(&self) -> bool {
        self.format.trim().is_empty()
    }

    /// Number of `?` placeholders outside quoted literals and identifiers.
    pub fn placeholder_count(&self) -> usize {
        placeholder_offsets(&self.format).count()
    }

    /// Check that placeholders and values line up one to one.
    pub fn validate(&self) -> OrmResult<()> {
        let placeholders = self.placeholder_count();
        if placeholders != self.values.len() {
            return Err(OrmError::validation(format!(
                "Template: placeholders({}) != values({})",
                placeholders,
                self.values.len()
            )));
        }
        Ok(())
    }
}

impl From<&str> for Template {
    fn from(format: &str) -> Self {
        Template::new(format)
    }
}

impl From<String> for Template {
    fn from(format: String) -> Self {
        Template::new(format)
    }
}

/// Canonical rendering used for logging: `"<format>" <= {v1, v2}`.
impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} <= {{", self.format)?;
        for (i, v) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{v}")?;
        }
        f.write_str("}")
    }
}

/// Byte offsets of `?` placeholders in `format`.
///
/// Question marks inside `'...'` string literals and `"..."` quoted
/// identifiers are not placeholders. Doubled quotes inside a literal toggle
/// twice and so stay inside it.
pub(crate) fn placeholder_offsets(format: &str) -> impl Iterator<Item = usize> + '_ {
    let mut quote: Option<u8> = None;
    format.bytes().enumerate().filter_map(move |(i, b)| {
        match (quote, b) {
            (None, b'\'' | b'"') => quote = Some(b),
            (Some(q), _) if q == b => quote = None,
            (None, b'?') => return Some(i),
            _ => {}
        }
        None
    })
}

/// Build a `Vec<Value>` from heterogeneous expressions.
///
/// ```rust
/// use sqlweave::{Value, values};
///
/// let v = values![1, "a", None::<i32>];
/// assert_eq!(v, vec![Value::Int(1), Value::from("a"), Value::Null]);
/// ```
#[macro_export]
macro_rules! values {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::Value::from($value)),+]
    };
}
