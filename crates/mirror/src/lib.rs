#![forbid(unsafe_code)]

//! Mirror public facade.
//!
//! Re-exports the value model from `mirror-core` and the binding engine
//! from `mirror-runtime`. Most hosts only need the [`prelude`].

pub use mirror_core::{
    Comparator, ComparatorTable, Constraint, Fallback, MirrorError, Record, Result, Value,
    ValueKind, coerce, coerce_named,
};
pub use mirror_runtime::{
    BindingHandle, ChangeHandler, CommitOutcome, InputElement, Mirror, MirrorConfig,
};

/// Common imports for hosts.
pub mod prelude {
    pub use crate::{
        CommitOutcome, Constraint, InputElement, Mirror, MirrorConfig, MirrorError, Record, Value,
    };
}

#[cfg(feature = "subscriber")]
pub use mirror_runtime::telemetry;
