//! Credential provisioning wizard
//!
//! Walks an operator through a profile's credential slots, validates each
//! value, probes the service where it can, and writes the result into the
//! environment file without disturbing the template's layout.
//!
//! - [`Wizard`]: the orchestrator
//! - [`state`]: per-key transition table
//! - [`Prompter`]: operator I/O seam
//! - [`Catalog`]: localized messages
//! - [`WizardProfile`]: registry, probe toggle and post-steps

pub mod config;
pub mod error;
pub mod i18n;
pub mod post_step;
pub mod profile;
pub mod prompt;
pub mod report;
pub mod state;
pub mod wizard;

pub use config::WizardConfig;
pub use error::{PromptError, StateError, WizardError};
pub use i18n::{translate, Catalog, Locale};
pub use post_step::{PostStep, PostStepOutcome, PostStepWarning};
pub use profile::{ProfileKind, WizardProfile, WizardProfileBuilder};
pub use prompt::{confirm, InterruptGate, Notice, NoticeLevel, Prompter, TerminalPrompter};
pub use report::{KeyOutcome, RunReport};
pub use state::{allowed_transitions, validate_transition, KeyMachine, KeyState};
pub use wizard::{mask_hint, Wizard};

/// Common imports
pub mod prelude {
    pub use crate::{
        KeyOutcome, KeyState, Notice, Prompter, RunReport, Wizard, WizardConfig, WizardError,
        WizardProfile,
    };
    pub use credkit_envstore::SessionConfig;
    pub use credkit_probe::{ProbeResult, Prober};
    pub use credkit_registry::{KeyDescriptor, Registry};
}
