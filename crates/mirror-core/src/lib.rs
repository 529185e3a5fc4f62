#![forbid(unsafe_code)]

//! Core types for Mirror input bindings.
//!
//! - [`Value`] / [`ValueKind`]: the closed set of property values.
//! - [`Record`]: a shared, open key-value map that bindings write into.
//! - [`coerce`]: conversion of raw input into a property's fixed kind.
//! - [`ComparatorTable`]: named predicates used by constraints.
//! - [`Constraint`] / [`Fallback`]: per-binding commit gates.
//!
//! Nothing here knows about input elements; see `mirror-runtime`.

pub mod coerce;
pub mod comparator;
pub mod constraint;
pub mod error;
pub mod record;
pub mod value;

pub use coerce::{coerce, coerce_named};
pub use comparator::{Comparator, ComparatorTable};
pub use constraint::{Constraint, Fallback};
pub use error::{MirrorError, Result};
pub use record::Record;
pub use value::{Value, ValueKind, format_number, parse_number};
