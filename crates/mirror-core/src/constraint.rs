//! Constraint descriptors attached to a binding.
//!
//! A [`Constraint`] gates a commit: the incoming value is compared against
//! another property of the *same* record using a named predicate. When the
//! comparison fails the optional [`Fallback`] is committed instead.
//!
//! `property` is a plain property name. Dotted paths such as
//! `"other.count"` are not resolved against other records; they are looked
//! up literally on the bound record, so they fail validation unless that
//! record happens to have a key with the dot in it.

use core::fmt;
use std::rc::Rc;

use crate::value::Value;

/// Replacement committed when a constraint's comparison fails.
#[derive(Clone)]
pub enum Fallback {
    /// A literal value.
    Value(Value),
    /// A zero-argument producer, invoked once per failed comparison.
    Producer(Rc<dyn Fn() -> Value>),
}

impl Fallback {
    /// Wrap a producer closure.
    pub fn producer(f: impl Fn() -> Value + 'static) -> Self {
        Self::Producer(Rc::new(f))
    }

    /// The value to commit: the literal, or the producer's result.
    #[must_use]
    pub fn resolve(&self) -> Value {
        match self {
            Self::Value(v) => v.clone(),
            Self::Producer(f) => f(),
        }
    }
}

impl From<Value> for Fallback {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl fmt::Debug for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Producer(_) => f.write_str("Producer(..)"),
        }
    }
}

/// `{ predicate, property, fallback }` descriptor.
#[derive(Debug, Clone)]
pub struct Constraint {
    /// Comparator name, resolved against the engine's table.
    pub predicate: String,
    /// Property of the bound record used as the comparison reference.
    pub property: String,
    /// Value committed when the comparison fails.
    pub fallback: Option<Fallback>,
}

impl Constraint {
    /// A constraint without fallback.
    #[must_use]
    pub fn new(predicate: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            predicate: predicate.into(),
            property: property.into(),
            fallback: None,
        }
    }

    /// Set a literal fallback value.
    #[must_use]
    pub fn with_fallback(mut self, fallback: impl Into<Value>) -> Self {
        self.fallback = Some(Fallback::Value(fallback.into()));
        self
    }

    /// Set a producer fallback.
    #[must_use]
    pub fn with_fallback_fn(mut self, f: impl Fn() -> Value + 'static) -> Self {
        self.fallback = Some(Fallback::producer(f));
        self
    }
}
