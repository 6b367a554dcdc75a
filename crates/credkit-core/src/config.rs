//! Run configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default template path
pub const DEFAULT_TEMPLATE: &str = ".env.example";

/// Default target path
pub const DEFAULT_TARGET: &str = ".env";

/// Settings for one wizard run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    /// Reference file listing every legal key
    pub template_path: PathBuf,
    /// File written with the collected values
    pub target_path: PathBuf,
    /// Per-probe time budget in milliseconds
    pub probe_timeout_ms: u64,
    /// Ask the prompter not to echo credentials
    pub mask_input: bool,
    /// Explicit locale; detected from the environment when unset
    pub locale: Option<String>,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            template_path: PathBuf::from(DEFAULT_TEMPLATE),
            target_path: PathBuf::from(DEFAULT_TARGET),
            probe_timeout_ms: 5000,
            mask_input: true,
            locale: None,
        }
    }
}

impl WizardConfig {
    /// Create config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With template path
    #[must_use]
    pub fn with_template(mut self, path: impl Into<PathBuf>) -> Self {
        self.template_path = path.into();
        self
    }

    /// With target path
    #[must_use]
    pub fn with_target(mut self, path: impl Into<PathBuf>) -> Self {
        self.target_path = path.into();
        self
    }

    /// With probe timeout
    #[must_use]
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Hide key input while typing
    #[must_use]
    pub fn with_mask_input(mut self, mask: bool) -> Self {
        self.mask_input = mask;
        self
    }

    /// Force a message locale
    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Connectivity test budget
    #[inline]
    #[must_use]
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// Template path
    #[inline]
    #[must_use]
    pub fn template_path(&self) -> &Path {
        &self.template_path
    }

    /// Environment file path
    #[inline]
    #[must_use]
    pub fn target_path(&self) -> &Path {
        &self.target_path
    }
}
