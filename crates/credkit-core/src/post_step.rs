//! Advisory steps run after the environment file is written
//!
//! A post-step never fails the run. Whatever happens is reported as a
//! [`PostStepOutcome`] and shown to the operator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Default location of the permissions settings template
pub const DEFAULT_SETTINGS_TEMPLATE: &str = "templates/security/settings.local.template.json";

/// Default location of the generated permissions settings
pub const DEFAULT_SETTINGS_PATH: &str = ".claude/settings.local.json";

/// Default ignore file checked by [`PostStep::GitignoreCheck`]
pub const DEFAULT_GITIGNORE: &str = ".gitignore";

/// Something to do once the target file is saved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PostStep {
    /// Copy a JSON settings template to `target` unless it already exists
    PermissionsFile { template: PathBuf, target: PathBuf },
    /// Check that the ignore file protects `.env` but not `.env.example`
    GitignoreCheck { path: PathBuf },
}

/// Why a post-step could not complete
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostStepWarning {
    /// Settings file could not be produced
    Failed(String),
    /// Ignore file exists but its entries look wrong
    NeedsReview,
    /// Ignore file does not exist
    Missing,
}

impl fmt::Display for PostStepWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(reason) => f.write_str(reason),
            Self::NeedsReview => f.write_str("ignore entries need review"),
            Self::Missing => f.write_str("file not found"),
        }
    }
}

/// Result of one post-step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostStepOutcome {
    /// Step made its change
    Done,
    /// Nothing to do
    AlreadyPresent,
    /// Step could not complete; the run still succeeds
    Warning(PostStepWarning),
}

impl PostStepOutcome {
    /// Whether the step ended with a warning
    #[inline]
    #[must_use]
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::Warning(_))
    }
}

impl PostStep {
    /// Permissions file from the default template to the default location
    #[must_use]
    pub fn default_permissions_file() -> Self {
        Self::PermissionsFile {
            template: PathBuf::from(DEFAULT_SETTINGS_TEMPLATE),
            target: PathBuf::from(DEFAULT_SETTINGS_PATH),
        }
    }

    /// `.gitignore` check in the working directory
    #[must_use]
    pub fn default_gitignore_check() -> Self {
        Self::GitignoreCheck {
            path: PathBuf::from(DEFAULT_GITIGNORE),
        }
    }

    /// File the step reads or writes, for messages
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::PermissionsFile { target, .. } => target,
            Self::GitignoreCheck { path } => path,
        }
    }

    /// Run the step
    pub async fn run(&self) -> PostStepOutcome {
        let outcome = match self {
            Self::PermissionsFile { template, target } => create_settings(template, target).await,
            Self::GitignoreCheck { path } => check_gitignore(path).await,
        };
        match &outcome {
            PostStepOutcome::Warning(warning) => {
                tracing::warn!(path = %self.path().display(), %warning, "post-step incomplete");
            }
            other => tracing::info!(path = %self.path().display(), outcome = ?other, "post-step finished"),
        }
        outcome
    }
}

async fn create_settings(template: &Path, target: &Path) -> PostStepOutcome {
    if tokio::fs::try_exists(target).await.unwrap_or(false) {
        return PostStepOutcome::AlreadyPresent;
    }

    let contents = match tokio::fs::read_to_string(template).await {
        Ok(contents) => contents,
        Err(e) => return failed(format!("cannot read {}: {e}", template.display())),
    };
    if let Err(e) = serde_json::from_str::<serde_json::Value>(&contents) {
        return failed(format!("{} is not valid JSON: {e}", template.display()));
    }

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = tokio::fs::create_dir_all(parent).await {
            return failed(format!("cannot create {}: {e}", parent.display()));
        }
    }
    match tokio::fs::write(target, contents).await {
        Ok(()) => PostStepOutcome::Done,
        Err(e) => failed(format!("cannot write {}: {e}", target.display())),
    }
}

fn failed(reason: String) -> PostStepOutcome {
    PostStepOutcome::Warning(PostStepWarning::Failed(reason))
}

async fn check_gitignore(path: &Path) -> PostStepOutcome {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) if gitignore_protects_env(&contents) => PostStepOutcome::Done,
        Ok(_) => PostStepOutcome::Warning(PostStepWarning::NeedsReview),
        Err(_) => PostStepOutcome::Warning(PostStepWarning::Missing),
    }
}

/// `.env` is ignored and `.env.example` is not
#[must_use]
pub fn gitignore_protects_env(contents: &str) -> bool {
    let entries: Vec<&str> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect();
    let has = |candidates: &[&str]| entries.iter().any(|entry| candidates.contains(entry));

    let ignores_env = has(&[".env", "/.env", ".env*", "/.env*", ".env.*", "/.env.*"]);
    let wildcard = has(&[".env*", "/.env*", ".env.*", "/.env.*"]);
    let ignores_example = has(&[".env.example", "/.env.example"]);
    let keeps_example = has(&["!.env.example", "!/.env.example"]);

    ignores_env && !ignores_example && (!wildcard || keeps_example)
}
