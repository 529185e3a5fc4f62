//! Coercion of raw input values into a property's fixed kind.

use crate::error::Result;
use crate::value::{Value, ValueKind, format_number};

/// Convert `raw` into `kind`.
///
/// Never fails: unparseable text becomes NaN for [`ValueKind::Number`]
/// and is committed as such.
#[must_use]
pub fn coerce(kind: ValueKind, raw: &Value) -> Value {
    match kind {
        ValueKind::String => Value::Str(match raw {
            Value::Str(s) => s.clone(),
            Value::Number(n) => format_number(*n),
            Value::Bool(b) => b.to_string(),
        }),
        ValueKind::Number => Value::Number(raw.to_number()),
        ValueKind::Boolean => Value::Bool(raw.is_truthy()),
    }
}

/// [`coerce`] with the target kind given by name.
///
/// # Errors
///
/// [`MirrorError::UnsupportedType`](crate::MirrorError::UnsupportedType)
/// when `kind` is not `string`, `number` or `boolean`.
pub fn coerce_named(kind: &str, raw: &Value) -> Result<Value> {
    ValueKind::parse(kind).map(|kind| coerce(kind, raw))
}
