//! Column filtering and `column = value` assignments shared by builders.

use crate::catalog::{Catalog, ZeroValues};
use crate::error::OrmResult;
use crate::record::Record;
use crate::value::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Include/exclude filter over column names.
///
/// A non-empty include set keeps only the named columns; the exclude set is
/// applied after it.
#[derive(Debug, Clone, Default)]
pub struct ColumnFilter {
    include: BTreeSet<String>,
    exclude: BTreeSet<String>,
}

impl ColumnFilter {
    pub fn include<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include.extend(names.into_iter().map(Into::into));
    }

    pub fn exclude<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(names.into_iter().map(Into::into));
    }

    pub fn allows(&self, name: &str) -> bool {
        (self.include.is_empty() || self.include.contains(name)) && !self.exclude.contains(name)
    }
}

/// Ordered `column = value` pairs for INSERT and UPDATE.
///
/// Setting a column twice replaces the earlier value in place.
#[derive(Debug, Clone, Default)]
pub(crate) struct Assignments {
    pairs: Vec<(String, Value)>,
    pub(crate) filter: ColumnFilter,
}

impl Assignments {
    pub(crate) fn set(&mut self, column: String, value: Value) {
        match self.pairs.iter_mut().find(|(c, _)| *c == column) {
            Some((_, existing)) => *existing = value,
            None => self.pairs.push((column, value)),
        }
    }

    /// Set each pair, in key order.
    pub(crate) fn set_map<K, V, I>(&mut self, pairs: I)
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let sorted: BTreeMap<String, Value> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        for (column, value) in sorted {
            self.set(column, value);
        }
    }

    /// Set each mapped field of `record`, in declaration order.
    pub(crate) fn set_record<R: Record>(
        &mut self,
        catalog: &Catalog,
        record: &R,
        zero: ZeroValues,
    ) -> OrmResult<()> {
        for (column, value) in catalog.values_of(record, zero)? {
            self.set(column, value);
        }
        Ok(())
    }

    /// Pairs that pass the filter.
    pub(crate) fn visible(&self) -> impl Iterator<Item = &(String, Value)> {
        self.pairs.iter().filter(|(c, _)| self.filter.allows(c))
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.visible().next().is_none()
    }
}
