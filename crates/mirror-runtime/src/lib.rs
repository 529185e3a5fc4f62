#![forbid(unsafe_code)]

//! Binding engine for Mirror.
//!
//! [`Mirror`] keeps named [`Record`](mirror_core::Record)s in sync with
//! host input elements. Hosts implement [`InputElement`]; [`Mirror::bind`]
//! validates the element eagerly and subscribes to its change
//! notifications, and [`Mirror::handle_change`] runs the commit protocol.
//!
//! # Feature Flags
//!
//! - `config`: load [`MirrorConfig`] from TOML/JSON.
//! - `subscriber`: `telemetry::init` installs a fmt subscriber.

pub mod config;
pub mod element;
pub mod engine;
#[cfg(feature = "subscriber")]
pub mod telemetry;

pub use config::MirrorConfig;
pub use element::{ChangeHandler, DATA_OBJ, DATA_PROPERTY, InputElement};
pub use engine::{BindingHandle, CommitOutcome, Mirror, TRACE_TARGET};
