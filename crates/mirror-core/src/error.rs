//! Error type shared by every Mirror crate.
//!
//! Only programming errors surface here. Expected runtime conditions
//! (failed constraints, unknown predicates at validation time, removing an
//! absent record) are reported as warnings and plain return values instead.

/// Errors raised at a call or bind site.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MirrorError {
    /// A call-site argument had the wrong shape (empty name, element that
    /// is not an input, missing data attribute, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A named record or property does not exist.
    #[error("{kind} '{name}' not found")]
    NotFound {
        /// What was looked up (`"record"` or `"property"`).
        kind: &'static str,
        /// The name that failed to resolve.
        name: String,
    },
    /// A comparator with this name is already registered.
    #[error("comparator '{0}' is already registered")]
    DuplicateName(String),
    /// A type name outside `string | number | boolean`.
    #[error("unsupported value type '{0}'")]
    UnsupportedType(String),
    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl MirrorError {
    /// A registry lookup miss.
    #[must_use]
    pub fn record_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "record",
            name: name.into(),
        }
    }

    /// A property lookup miss on an existing record.
    #[must_use]
    pub fn property_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: "property",
            name: name.into(),
        }
    }

    /// Shorthand for [`MirrorError::InvalidArgument`].
    #[must_use]
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

/// Result alias used across Mirror.
pub type Result<T> = std::result::Result<T, MirrorError>;
