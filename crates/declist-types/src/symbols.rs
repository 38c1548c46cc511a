//! Symbol table shared read-only by every evaluation of a program.

use crate::error::{EvalError, EvalResult};
use crate::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name → value bindings with unique keys.
///
/// Ordered so that iteration (and anything seeded from it) is
/// deterministic. The table is passed explicitly to every `evaluate` and
/// `encode` call; there is no process-wide instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolTable {
    bindings: BTreeMap<String, Value>,
}

impl SymbolTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a new name. Redeclaring an existing name is an error.
    pub fn declare(&mut self, name: impl Into<String>, value: Value) -> EvalResult<()> {
        let name = name.into();
        if self.bindings.contains_key(&name) {
            return Err(EvalError::Precondition(format!(
                "variable '{name}' is already declared"
            )));
        }
        self.bindings.insert(name, value);
        Ok(())
    }

    /// The value bound to `name`, if any.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Like [`SymbolTable::get`], failing with `UndeclaredVariable`.
    pub fn lookup(&self, name: &str) -> EvalResult<&Value> {
        self.bindings
            .get(name)
            .ok_or_else(|| EvalError::UndeclaredVariable(name.to_string()))
    }

    /// Whether `name` is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Bound names in ascending order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    /// Bindings in ascending name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Collect bindings into a table. A repeated name keeps its first value,
/// the same binding [`SymbolTable::declare`] would have kept.
impl FromIterator<(String, Value)> for SymbolTable {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut bindings = BTreeMap::new();
        for (name, value) in iter {
            bindings.entry(name).or_insert(value);
        }
        Self { bindings }
    }
}
