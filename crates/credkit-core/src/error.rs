//! Error types for the wizard

use crate::state::KeyState;
use credkit_envstore::EnvStoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Operator input errors
#[derive(Error, Debug)]
pub enum PromptError {
    /// Input reached end of file
    #[error("input closed")]
    Closed,

    /// Operator pressed Ctrl-C while the read was blocked
    #[error("interrupted")]
    Interrupted,

    /// Reading or writing the terminal failed
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Illegal per-key state transition
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("illegal key state transition: {from:?} -> {to:?}")]
pub struct StateError {
    /// State before
    pub from: KeyState,
    /// Rejected next state
    pub to: KeyState,
}

/// Errors that end a wizard run
#[derive(Error, Debug)]
pub enum WizardError {
    /// No template at the given path
    #[error("template not found: {}", .0.display())]
    TemplateMissing(PathBuf),

    /// Template exists but cannot be read
    #[error("failed to read template: {0}")]
    Template(#[source] EnvStoreError),

    /// Environment file could not be written
    #[error("failed to save configuration: {0}")]
    Write(#[source] EnvStoreError),

    /// Input ended before setup finished
    #[error("input closed before setup finished")]
    InputClosed,

    /// Operator I/O failed
    #[error("prompt failed: {0}")]
    Prompt(#[source] PromptError),

    /// Operator pressed Ctrl-C
    #[error("setup interrupted")]
    Interrupted,

    /// Internal transition bug
    #[error(transparent)]
    State(#[from] StateError),
}

impl WizardError {
    /// Whether this is a failure rather than an operator interrupt
    #[inline]
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Interrupted)
    }

    /// Process exit code for this error
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Interrupted => 130,
            _ => 1,
        }
    }
}

impl From<PromptError> for WizardError {
    fn from(e: PromptError) -> Self {
        match e {
            PromptError::Closed => Self::InputClosed,
            PromptError::Interrupted => Self::Interrupted,
            other => Self::Prompt(other),
        }
    }
}
