//! Per-key collection state machine
//!
//! ```text
//! Prompting ──▶ Skipped | Kept | Accepted   (terminal)
//!     │ ▲
//!     ▼ │
//!   Retrying
//! ```
//!
//! Every transition the wizard performs goes through [`validate_transition`].

use crate::error::StateError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// State of one descriptor during collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyState {
    /// Waiting for operator input
    Prompting,
    /// Input was rejected; about to prompt again
    Retrying,
    /// Optional key left unset
    Skipped,
    /// Previous value reused
    Kept,
    /// New value validated and stored
    Accepted,
}

impl KeyState {
    /// All states, for exhaustive tests
    pub const ALL: [Self; 5] = [
        Self::Prompting,
        Self::Retrying,
        Self::Skipped,
        Self::Kept,
        Self::Accepted,
    ];

    /// Whether no transition leaves this state
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Skipped | Self::Kept | Self::Accepted)
    }
}

impl fmt::Display for KeyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Prompting => "prompting",
            Self::Retrying => "retrying",
            Self::Skipped => "skipped",
            Self::Kept => "kept",
            Self::Accepted => "accepted",
        };
        f.write_str(name)
    }
}

/// States reachable from `from` in one step
#[must_use]
pub fn allowed_transitions(from: KeyState) -> Vec<KeyState> {
    use KeyState::{Accepted, Kept, Prompting, Retrying, Skipped};
    match from {
        Prompting => vec![Skipped, Kept, Accepted, Retrying],
        Retrying => vec![Prompting],
        Skipped | Kept | Accepted => vec![],
    }
}

/// Check a single transition against [`allowed_transitions`]
///
/// # Errors
/// `StateError` if `to` is not reachable from `from`.
pub fn validate_transition(from: KeyState, to: KeyState) -> Result<(), StateError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(StateError { from, to })
    }
}

/// Tracks one descriptor from first prompt to a terminal state
#[derive(Debug, Clone)]
pub struct KeyMachine {
    key: String,
    state: KeyState,
    retries: u32,
}

impl KeyMachine {
    /// Machine for `key`, already prompting
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            state: KeyState::Prompting,
            retries: 0,
        }
    }

    /// Move to `to`, counting entries into `Retrying`
    ///
    /// # Errors
    /// `StateError` for a transition the table does not allow; the machine
    /// is left unchanged.
    pub fn advance(&mut self, to: KeyState) -> Result<(), StateError> {
        validate_transition(self.state, to)?;
        tracing::debug!(key = %self.key, from = %self.state, %to, "key transition");
        if to == KeyState::Retrying {
            self.retries += 1;
        }
        self.state = to;
        Ok(())
    }

    /// Reject the current input and return to `Prompting`
    ///
    /// # Errors
    /// See [`KeyMachine::advance`].
    pub fn retry(&mut self) -> Result<(), StateError> {
        self.advance(KeyState::Retrying)?;
        self.advance(KeyState::Prompting)
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> KeyState {
        self.state
    }

    /// Number of times the key went through `Retrying`
    #[inline]
    #[must_use]
    pub fn retries(&self) -> u32 {
        self.retries
    }
}
