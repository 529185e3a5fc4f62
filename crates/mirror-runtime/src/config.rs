//! Engine configuration.
//!
//! With the `config` feature, [`MirrorConfig`] can be loaded from TOML or
//! JSON. Missing keys take their defaults:
//!
//! ```toml
//! debug = true
//! warn_on_missing_fallback = false
//! ```

#[cfg(feature = "config")]
use mirror_core::{MirrorError, Result};

/// Construction-time settings for [`Mirror`](crate::Mirror).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct MirrorConfig {
    /// Emit an info trace for every successful commit.
    pub debug: bool,
    /// Warn when a constraint fails and no fallback is present.
    pub warn_on_missing_fallback: bool,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            debug: false,
            warn_on_missing_fallback: true,
        }
    }
}

impl MirrorConfig {
    /// Default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set debug tracing.
    #[must_use]
    pub const fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set the missing-fallback warning.
    #[must_use]
    pub const fn warn_on_missing_fallback(mut self, warn: bool) -> Self {
        self.warn_on_missing_fallback = warn;
        self
    }

    /// Parse a TOML document.
    ///
    /// # Errors
    ///
    /// [`MirrorError::Config`] if the document is malformed.
    #[cfg(feature = "config")]
    pub fn from_toml_str(src: &str) -> Result<Self> {
        toml::from_str(src).map_err(|e| MirrorError::Config(e.to_string()))
    }

    /// Parse a JSON document.
    ///
    /// # Errors
    ///
    /// [`MirrorError::Config`] if the document is malformed.
    #[cfg(feature = "config")]
    pub fn from_json_str(src: &str) -> Result<Self> {
        serde_json::from_str(src).map_err(|e| MirrorError::Config(e.to_string()))
    }
}
