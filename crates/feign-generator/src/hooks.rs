//! Caller-supplied overrides consulted before synthesis.
//!
//! Every non-root slot has a path: `.Field` for struct fields, extended by
//! one segment per nested struct (`.Address.City`). Pointers, array and
//! slice elements, and map keys and values share the path of the slot that
//! contains them.

use feign_core::Value;
use std::collections::HashMap;

/// A hook asked for a value before the engine synthesizes one.
///
/// `None` means "no opinion". `Some(Value::Null)` forces the slot to its
/// zero value.
pub trait Override {
    fn lookup(&self, path: &str) -> Option<Value>;
}

impl<F> Override for F
where
    F: Fn(&str) -> Option<Value>,
{
    fn lookup(&self, path: &str) -> Option<Value> {
        self(path)
    }
}

/// Fixed table of path overrides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    values: HashMap<String, Value>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Overrides::insert`].
    pub fn set(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(path, value);
        self
    }

    /// Override `path` with `value`, replacing any previous entry.
    pub fn insert(&mut self, path: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(path.into(), value.into());
    }

    /// Force `path` to its zero value.
    pub fn null(self, path: impl Into<String>) -> Self {
        self.set(path, Value::Null)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Override for Overrides {
    fn lookup(&self, path: &str) -> Option<Value> {
        self.values.get(path).cloned()
    }
}
