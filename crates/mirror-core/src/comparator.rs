//! Named comparison predicates used by constraints.
//!
//! A [`ComparatorTable`] maps predicate names to pure two-argument boolean
//! functions. Tables are owned values: each engine carries its own, so
//! registrations in one engine never leak into another.
//!
//! # Built-ins
//!
//! | Name | Holds when |
//! |------|------------|
//! | `less` | `a < b` |
//! | `lessOrEqual` | `a <= b` |
//! | `equal` | `a == b` |
//! | `greater` | `a > b` |
//! | `greaterOrEqual` | `a >= b` |
//!
//! Ordering and equality follow [`Value::compare`] and
//! [`Value::loosely_equals`]: two strings compare as text, any other pair
//! compares numerically, and NaN satisfies no built-in.
//!
//! # Invariants
//!
//! 1. A name, once registered, is never replaced or removed.
//! 2. Names are non-empty.

use core::fmt;
use std::cmp::Ordering;
use std::rc::Rc;

use ahash::AHashMap;

use crate::error::{MirrorError, Result};
use crate::value::Value;

/// A shared predicate `(candidate, reference) -> bool`.
pub type Comparator = Rc<dyn Fn(&Value, &Value) -> bool>;

/// Name of the built-in `a < b` predicate.
pub const LESS: &str = "less";
/// Name of the built-in `a <= b` predicate.
pub const LESS_OR_EQUAL: &str = "lessOrEqual";
/// Name of the built-in `a == b` predicate.
pub const EQUAL: &str = "equal";
/// Name of the built-in `a > b` predicate.
pub const GREATER: &str = "greater";
/// Name of the built-in `a >= b` predicate.
pub const GREATER_OR_EQUAL: &str = "greaterOrEqual";

/// Names of every built-in predicate.
pub const BUILTINS: [&str; 5] = [LESS, LESS_OR_EQUAL, EQUAL, GREATER, GREATER_OR_EQUAL];

fn ordered(a: &Value, b: &Value, accept: impl Fn(Ordering) -> bool) -> bool {
    a.compare(b).is_some_and(accept)
}

/// Registry of named predicates.
#[derive(Clone)]
pub struct ComparatorTable {
    entries: AHashMap<String, Comparator>,
}

impl ComparatorTable {
    /// A table holding only the built-in predicates.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut entries: AHashMap<String, Comparator> = AHashMap::with_capacity(BUILTINS.len());
        entries.insert(
            LESS.to_owned(),
            Rc::new(|a: &Value, b: &Value| ordered(a, b, Ordering::is_lt)),
        );
        entries.insert(
            LESS_OR_EQUAL.to_owned(),
            Rc::new(|a: &Value, b: &Value| ordered(a, b, Ordering::is_le)),
        );
        entries.insert(EQUAL.to_owned(), Rc::new(Value::loosely_equals));
        entries.insert(
            GREATER.to_owned(),
            Rc::new(|a: &Value, b: &Value| ordered(a, b, Ordering::is_gt)),
        );
        entries.insert(
            GREATER_OR_EQUAL.to_owned(),
            Rc::new(|a: &Value, b: &Value| ordered(a, b, Ordering::is_ge)),
        );
        Self { entries }
    }

    /// A table with no predicates at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: AHashMap::new(),
        }
    }

    /// Register a new predicate under a unique name.
    ///
    /// # Errors
    ///
    /// [`MirrorError::InvalidArgument`] for an empty name and
    /// [`MirrorError::DuplicateName`] if the name is already taken.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        predicate: impl Fn(&Value, &Value) -> bool + 'static,
    ) -> Result<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(MirrorError::invalid("comparator name must not be empty"));
        }
        if self.entries.contains_key(&name) {
            return Err(MirrorError::DuplicateName(name));
        }
        self.entries.insert(name, Rc::new(predicate));
        Ok(())
    }

    /// Look up a predicate by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Comparator> {
        self.entries.get(name).map(Rc::clone)
    }

    /// Whether `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Evaluate `name(a, b)`; `None` if the predicate is unknown.
    #[must_use]
    pub fn evaluate(&self, name: &str, a: &Value, b: &Value) -> Option<bool> {
        self.entries.get(name).map(|f| f(a, b))
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered predicates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no predicates are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ComparatorTable {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for ComparatorTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComparatorTable")
            .field("names", &self.names())
            .finish()
    }
}
