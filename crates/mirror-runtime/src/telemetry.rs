//! Optional subscriber setup for hosts without their own tracing stack.
//!
//! Engine diagnostics are emitted under the `mirror` target. Hosts that
//! already install a subscriber don't need this module.

use mirror_core::{MirrorError, Result};
use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_directive` (for example
/// `"mirror=warn"` or `"mirror=info"` alongside a debug engine) applies.
///
/// # Errors
///
/// [`MirrorError::Config`] if the directive does not parse or a global
/// subscriber is already installed.
pub fn init(default_directive: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directive)
            .map_err(|e| MirrorError::Config(format!("bad filter directive: {e}")))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| MirrorError::Config(e.to_string()))
}
