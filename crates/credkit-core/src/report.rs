//! Per-key and per-run results

use crate::post_step::{PostStep, PostStepOutcome};
use crate::state::KeyState;
use credkit_probe::ProbeResult;
use std::path::PathBuf;

/// How one descriptor was resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyOutcome {
    /// Descriptor name
    pub name: String,
    /// Human label
    pub label: String,
    /// Terminal state: `Skipped`, `Kept` or `Accepted`
    pub state: KeyState,
    /// Number of rejected inputs before resolution
    pub retries: u32,
    /// Set when a probe ran for an accepted value
    pub probe: Option<ProbeResult>,
}

impl KeyOutcome {
    /// Whether the target file ends up with a value from this run
    #[inline]
    #[must_use]
    pub fn is_configured(&self) -> bool {
        matches!(self.state, KeyState::Accepted | KeyState::Kept)
    }
}

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Profile name
    pub profile: String,
    /// One entry per descriptor, in registry order
    pub outcomes: Vec<KeyOutcome>,
    /// File that was written
    pub target: PathBuf,
    /// Each post-step with its outcome
    pub post_steps: Vec<(PostStep, PostStepOutcome)>,
}

impl RunReport {
    /// Outcome for descriptor `name`
    #[must_use]
    pub fn outcome(&self, name: &str) -> Option<&KeyOutcome> {
        self.outcomes.iter().find(|o| o.name == name)
    }

    /// Keys that have a value in the target
    pub fn configured(&self) -> impl Iterator<Item = &KeyOutcome> {
        self.outcomes.iter().filter(|o| o.is_configured())
    }

    /// Total rejected inputs across all keys
    #[must_use]
    pub fn total_retries(&self) -> u32 {
        self.outcomes.iter().map(|o| o.retries).sum()
    }
}
