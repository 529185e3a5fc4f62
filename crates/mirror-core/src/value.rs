//! The closed set of values a bound property can hold.
//!
//! Records are open maps, but every property value is one of three kinds:
//! text, number or boolean. A property's kind is fixed when a binding is
//! created and every later commit is coerced back into it.
//!
//! # Conversion rules
//!
//! | From \ To | string | number | boolean |
//! |-----------|--------|--------|---------|
//! | string | identity | [`parse_number`] | non-empty |
//! | number | [`format_number`] | identity | non-zero, not NaN |
//! | boolean | `"true"` / `"false"` | `1` / `0` | identity |

use core::fmt;
use std::cmp::Ordering;

use crate::error::{MirrorError, Result};

/// Kind of a bound property, inferred once at bind time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ValueKind {
    /// Textual value.
    String,
    /// IEEE-754 double, NaN included.
    Number,
    /// `true` / `false`.
    Boolean,
}

impl ValueKind {
    /// Every supported kind, in declaration order.
    pub const ALL: [Self; 3] = [Self::String, Self::Number, Self::Boolean];

    /// Lowercase name as used in type descriptors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }

    /// Parse a type name.
    ///
    /// # Errors
    ///
    /// [`MirrorError::UnsupportedType`] for anything other than
    /// `string`, `number` or `boolean`.
    pub fn parse(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| MirrorError::UnsupportedType(name.to_owned()))
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A property value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(f64),
    /// Text value.
    Str(String),
}

impl Value {
    /// The kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Str(_) => ValueKind::String,
            Self::Number(_) => ValueKind::Number,
            Self::Bool(_) => ValueKind::Boolean,
        }
    }

    /// Numeric view of the value. Unparseable text yields NaN.
    #[must_use]
    pub fn to_number(&self) -> f64 {
        match self {
            Self::Str(s) => parse_number(s),
            Self::Number(n) => *n,
            Self::Bool(b) => f64::from(u8::from(*b)),
        }
    }

    /// Truthiness: empty text, zero, NaN and `false` are falsy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Str(s) => !s.is_empty(),
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Bool(b) => *b,
        }
    }

    /// Borrow the text if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The number if this is a numeric value.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The boolean if this is a boolean value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Abstract relational comparison.
    ///
    /// Two strings compare by UTF-16 code unit; any other pairing compares
    /// numerically. Returns `None` when either numeric operand is NaN.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Str(a), Self::Str(b)) => Some(a.encode_utf16().cmp(b.encode_utf16())),
            _ => self.to_number().partial_cmp(&other.to_number()),
        }
    }

    /// Equality under the same pairing rules as [`Value::compare`].
    #[must_use]
    pub fn loosely_equals(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            _ => self.to_number() == other.to_number(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Parse text into a number the way form fields expect.
///
/// Surrounding whitespace is ignored and empty text is `0`. Accepts decimal
/// and exponent notation, `Infinity` with an optional sign, and unsigned
/// `0x` / `0o` / `0b` integer literals. Everything else is NaN, including
/// the `inf` / `nan` spellings that [`str::parse`] would otherwise accept.
#[must_use]
pub fn parse_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let Some(n) = parse_radix_literal(trimmed) {
        return n;
    }
    let decimal_only = trimmed
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if !decimal_only {
        return f64::NAN;
    }
    trimmed.parse().unwrap_or(f64::NAN)
}

fn parse_radix_literal(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'0' {
        return None;
    }
    let radix = match bytes[1] {
        b'x' | b'X' => 16,
        b'o' | b'O' => 8,
        b'b' | b'B' => 2,
        _ => return None,
    };
    let digits = &text[2..];
    if digits.is_empty() {
        return Some(f64::NAN);
    }
    let parsed = digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix)
            .map(|d| acc.mul_add(f64::from(radix), f64::from(d)))
    });
    Some(parsed.unwrap_or(f64::NAN))
}

/// Render a number as text.
///
/// Integral values print without a fraction, `-0` prints as `0`, and
/// magnitudes at or above `1e21` or below `1e-6` switch to exponent form
/// with an explicit sign (`1e+21`, `1.5e-7`).
#[must_use]
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_owned();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    if n == 0.0 {
        return "0".to_owned();
    }
    let magnitude = n.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        let exp = format!("{n:e}");
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
            _ => exp,
        };
    }
    format!("{n}")
}
