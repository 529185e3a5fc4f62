//! Shared, mutable key-value records.
//!
//! A [`Record`] is the "plain object" a binding writes into. It is a handle:
//! cloning it clones the `Rc`, so the host, the registry and every binding
//! observe the same properties.
//!
//! # Invariants
//!
//! 1. A property that was never set (or was removed) reads as `None`; there
//!    is no separate "undefined" value.
//! 2. [`Record::version`] increments exactly once per mutation that changes
//!    the stored value. Writing an identical value is a no-op; numbers are
//!    identical when their bits match, so `NaN` over `NaN` is a no-op and
//!    `-0` over `0` is a change.
//! 3. Records are single-threaded (`Rc<RefCell<..>>`); no borrow is held
//!    across a public method boundary.

use core::fmt;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use ahash::AHashMap;

use crate::value::Value;

fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.to_bits() == y.to_bits(),
        _ => a == b,
    }
}

#[derive(Default)]
struct RecordInner {
    props: RefCell<AHashMap<String, Value>>,
    version: Cell<u64>,
}

/// A named-property record shared between the host and the binding engine.
#[derive(Clone, Default)]
pub struct Record {
    inner: Rc<RecordInner>,
}

impl Record {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style property insert.
    #[must_use]
    pub fn with(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Current value of `key`, or `None` if absent.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.props.borrow().get(key).cloned()
    }

    /// Whether `key` is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.inner.props.borrow().contains_key(key)
    }

    /// Write `value` under `key`, returning the previous value.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let value = value.into();
        let mut props = self.inner.props.borrow_mut();
        let key = key.into();
        if props.get(&key).is_some_and(|old| same_value(old, &value)) {
            return Some(value);
        }
        let previous = props.insert(key, value);
        self.bump();
        previous
    }

    /// Remove `key`, returning its value.
    pub fn remove(&self, key: &str) -> Option<Value> {
        let removed = self.inner.props.borrow_mut().remove(key);
        if removed.is_some() {
            self.bump();
        }
        removed
    }

    /// Number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.props.borrow().len()
    }

    /// Whether the record has no properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.props.borrow().is_empty()
    }

    /// Mutation counter (see invariant 2).
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    /// Whether two handles point at the same record.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Ordered copy of every property.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        self.inner
            .props
            .borrow()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn bump(&self) {
        self.inner.version.set(self.inner.version.get() + 1);
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let record = Self::new();
        for (k, v) in iter {
            record.set(k, v);
        }
        record
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("props", &self.snapshot())
            .field("version", &self.version())
            .finish()
    }
}
