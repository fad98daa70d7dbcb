//! Field tag micro-grammar.
//!
//! ```text
//! tag   := item (';' item)*
//! item  := key | key '=' value
//! ```
//!
//! Keys and values are trimmed; empty items and empty keys are dropped. The
//! value is everything after the first `=`, so DDL suffixes such as
//! `check (x = 1)` survive intact. Later duplicates overwrite earlier ones.
//! Unknown keys are kept and can be read with [`Tag::get`].

use std::collections::BTreeMap;

pub const ITEM_SEPARATOR: char = ';';
pub const KV_SEPARATOR: char = '=';

pub const KEY_COLUMN: &str = "column";
pub const KEY_NAME: &str = "name";
pub const KEY_TYPE: &str = "type";
pub const KEY_SUFFIX: &str = "suffix";
pub const KEY_IGNORE: &str = "ignore";
pub const KEY_IGNORE_SHORT: &str = "-";

/// Parsed field tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tag {
    entries: BTreeMap<String, String>,
}

impl Tag {
    pub fn parse(raw: &str) -> Self {
        let mut entries = BTreeMap::new();
        for item in raw.split(ITEM_SEPARATOR) {
            let (key, value) = match item.split_once(KV_SEPARATOR) {
                Some((k, v)) => (k.trim(), v.trim()),
                None => (item.trim(), ""),
            };
            if !key.is_empty() {
                entries.insert(key.to_string(), value.to_string());
            }
        }
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Explicit column name (`column=` or its alias `name=`), if non-empty.
    pub fn column(&self) -> Option<&str> {
        self.get(KEY_COLUMN)
            .or_else(|| self.get(KEY_NAME))
            .filter(|s| !s.is_empty())
    }

    /// Explicit storage type, bypassing the dialect.
    pub fn sql_type(&self) -> Option<&str> {
        self.get(KEY_TYPE).filter(|s| !s.is_empty())
    }

    pub fn suffix(&self) -> Option<&str> {
        self.get(KEY_SUFFIX).filter(|s| !s.is_empty())
    }

    pub fn is_ignored(&self) -> bool {
        self.contains(KEY_IGNORE) || self.contains(KEY_IGNORE_SHORT)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
