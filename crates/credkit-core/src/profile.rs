//! Wizard profiles
//!
//! A profile is the registry to walk, whether to probe, and the post-steps to
//! run afterwards. The plain and security wizards are the two built-in
//! profiles of one orchestrator.

use crate::post_step::PostStep;
use credkit_registry::Registry;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Built-in profile names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfileKind {
    /// Required and optional AI service keys
    #[default]
    Standard,
    /// Security scanner keys plus permissions and `.gitignore` checks
    Security,
}

impl ProfileKind {
    /// Name used on the command line
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Security => "security",
        }
    }
}

impl FromStr for ProfileKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "security" => Ok(Self::Security),
            other => Err(format!("unknown profile '{other}' (expected standard or security)")),
        }
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What one wizard run collects and does afterwards
#[derive(Debug, Clone)]
pub struct WizardProfile {
    name: String,
    registry: Registry,
    probe: bool,
    post_steps: Vec<PostStep>,
}

impl WizardProfile {
    /// Start building a profile over `registry`
    #[must_use]
    pub fn builder(name: impl Into<String>, registry: Registry) -> WizardProfileBuilder {
        WizardProfileBuilder {
            name: name.into(),
            registry,
            probe: true,
            post_steps: Vec::new(),
        }
    }

    /// Anthropic + Exa required, OpenAI optional; no post-steps
    #[must_use]
    pub fn standard() -> Self {
        Self::builder(ProfileKind::Standard.as_str(), Registry::standard()).build()
    }

    /// Security registry plus the default permissions file and ignore check
    #[must_use]
    pub fn security() -> Self {
        Self::security_with(
            crate::post_step::DEFAULT_SETTINGS_TEMPLATE,
            crate::post_step::DEFAULT_SETTINGS_PATH,
        )
    }

    /// Security profile with custom settings template and output paths
    #[must_use]
    pub fn security_with(settings_template: impl Into<PathBuf>, settings_path: impl Into<PathBuf>) -> Self {
        Self::builder(ProfileKind::Security.as_str(), Registry::security())
            .post_step(PostStep::PermissionsFile {
                template: settings_template.into(),
                target: settings_path.into(),
            })
            .post_step(PostStep::default_gitignore_check())
            .build()
    }

    /// Built-in profile for `kind`
    #[must_use]
    pub fn for_kind(kind: ProfileKind) -> Self {
        match kind {
            ProfileKind::Standard => Self::standard(),
            ProfileKind::Security => Self::security(),
        }
    }

    /// Turn probing on or off
    #[must_use]
    pub fn with_probe(mut self, probe: bool) -> Self {
        self.probe = probe;
        self
    }

    /// Profile name shown in the banner
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Keys asked for, in order
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Whether accepted keys get a connectivity test
    #[inline]
    #[must_use]
    pub fn probe_enabled(&self) -> bool {
        self.probe
    }

    /// Steps run after the file is written
    #[inline]
    #[must_use]
    pub fn post_steps(&self) -> &[PostStep] {
        &self.post_steps
    }
}

/// Builder for [`WizardProfile`]
#[derive(Debug, Clone)]
pub struct WizardProfileBuilder {
    name: String,
    registry: Registry,
    probe: bool,
    post_steps: Vec<PostStep>,
}

impl WizardProfileBuilder {
    /// Enable or disable connectivity tests
    #[must_use]
    pub fn probe(mut self, probe: bool) -> Self {
        self.probe = probe;
        self
    }

    /// Append a post-step; steps run in the order added
    #[must_use]
    pub fn post_step(mut self, step: PostStep) -> Self {
        self.post_steps.push(step);
        self
    }

    /// Finish the profile
    #[must_use]
    pub fn build(self) -> WizardProfile {
        WizardProfile {
            name: self.name,
            registry: self.registry,
            probe: self.probe,
            post_steps: self.post_steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_profiles() {
        let standard = WizardProfile::standard();
        assert_eq!(standard.name(), "standard");
        assert!(standard.probe_enabled());
        assert!(standard.post_steps().is_empty());
        assert_eq!(standard.registry().names(), vec!["ANTHROPIC_API_KEY", "EXA_API_KEY", "OPENAI_API_KEY"]);

        let security = WizardProfile::security();
        assert_eq!(security.post_steps().len(), 2);
        assert!(matches!(security.post_steps()[0], PostStep::PermissionsFile { .. }));
        assert!(security.registry().contains("VOYAGE_API_KEY"));
    }

    #[test]
    fn profile_kind_parses() {
        assert_eq!("Security".parse::<ProfileKind>(), Ok(ProfileKind::Security));
        assert!("paranoid".parse::<ProfileKind>().is_err());
        assert_eq!(ProfileKind::default().to_string(), "standard");
    }
}
