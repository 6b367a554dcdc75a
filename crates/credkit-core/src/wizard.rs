//! The provisioning wizard
//!
//! [`Wizard::run`] drives one session:
//! 1. load the template (missing template is fatal before any prompt)
//! 2. if the target exists, offer to overwrite it; declining carries its
//!    values forward
//! 3. walk the profile's registry, one [`KeyMachine`] per descriptor
//! 4. merge and save once
//! 5. run post-steps and print the summary
//!
//! Nothing is written until every descriptor has reached a terminal state,
//! so an abort at any prompt leaves the target untouched.

use crate::config::WizardConfig;
use crate::error::WizardError;
use crate::i18n::{Catalog, Locale};
use crate::post_step::{PostStep, PostStepOutcome, PostStepWarning};
use crate::profile::WizardProfile;
use crate::prompt::{confirm, Notice, Prompter};
use crate::report::{KeyOutcome, RunReport};
use crate::state::{KeyMachine, KeyState};
use credkit_envstore::{EnvStore, SessionConfig};
use credkit_probe::{ProbeResult, Prober};
use credkit_registry::{validate, KeyDescriptor};
use std::sync::Arc;
use std::time::Duration;

/// Characters of a previous value shown in the hint
pub const HINT_CHARS: usize = 8;

/// Slack on top of the probe timeout before the wizard gives up on a prober
const PROBE_GRACE: Duration = Duration::from_millis(250);

/// Masked hint for a previous value: its first characters then `...`
///
/// At most half of the value is ever shown, so short values are not
/// revealed in full.
#[must_use]
pub fn mask_hint(value: &str) -> String {
    let shown = HINT_CHARS.min(value.chars().count() / 2);
    let prefix: String = value.chars().take(shown).collect();
    format!("{prefix}...")
}

/// One orchestrator for every profile
pub struct Wizard {
    profile: WizardProfile,
    config: WizardConfig,
    store: EnvStore,
    catalog: Catalog,
    prober: Option<Arc<dyn Prober>>,
}

impl std::fmt::Debug for Wizard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wizard")
            .field("profile", &self.profile.name())
            .field("config", &self.config)
            .field("locale", self.catalog.locale())
            .field("prober", &self.prober.is_some())
            .finish()
    }
}

impl Wizard {
    /// Create a wizard without a prober; the locale comes from the config or
    /// the environment
    #[must_use]
    pub fn new(profile: WizardProfile, config: WizardConfig) -> Self {
        let locale = Locale::detect(config.locale.as_deref());
        Self {
            store: EnvStore::new(&config.template_path, &config.target_path),
            catalog: Catalog::resolve(&locale),
            profile,
            config,
            prober: None,
        }
    }

    /// With prober; only used when the profile enables probing
    #[must_use]
    pub fn with_prober(mut self, prober: Arc<dyn Prober>) -> Self {
        self.prober = Some(prober);
        self
    }

    /// With an already resolved catalog
    #[must_use]
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Profile being run
    #[inline]
    #[must_use]
    pub fn profile(&self) -> &WizardProfile {
        &self.profile
    }

    /// Run configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    fn text(&self, key: &str, params: &[(&str, &str)]) -> String {
        self.catalog.get(key, params)
    }

    /// Run one full session against `prompter`
    ///
    /// # Errors
    /// - `WizardError::TemplateMissing` before any prompt
    /// - `WizardError::InputClosed` / `Prompt` if input fails; nothing is written
    /// - `WizardError::Write` if the target cannot be saved
    pub async fn run(&self, prompter: &mut dyn Prompter) -> Result<RunReport, WizardError> {
        tracing::info!(profile = self.profile.name(), keys = self.profile.registry().len(), "starting wizard");

        prompter.notify(Notice::info(self.text("wizard.title", &[])));
        prompter.notify(Notice::info(self.text("wizard.rule", &[])));
        prompter.notify(Notice::info(self.text("wizard.welcome", &[])));
        prompter.notify(Notice::info(self.text("wizard.profile", &[("profile", self.profile.name())])));

        prompter.notify(Notice::info(self.text("env.step", &[])));
        let template = match self.store.load_template().await {
            Ok(doc) => doc,
            Err(e) if e.is_not_found() => {
                let path = self.store.template_path().display().to_string();
                prompter.notify(Notice::error(self.text("env.template_missing", &[("path", path.as_str())])));
                return Err(WizardError::TemplateMissing(self.store.template_path().to_path_buf()));
            }
            Err(e) => return Err(WizardError::Template(e)),
        };

        let carried = self.carried_values(prompter).await?;

        prompter.notify(Notice::info(self.text("keys.step", &[])));
        prompter.notify(Notice::info(self.text("keys.intro", &[])));
        let mut session = SessionConfig::new();
        let mut outcomes = Vec::with_capacity(self.profile.registry().len());
        for descriptor in self.profile.registry() {
            let previous = carried
                .get(descriptor.name())
                .filter(|v| !v.trim().is_empty() && !descriptor.is_placeholder(v));
            outcomes.push(self.collect_key(prompter, descriptor, previous, &mut session).await?);
        }

        let values = carried.overlaid_with(&session);
        self.store.commit(template, &values).await.map_err(WizardError::Write)?;
        let target = self.store.target_path().display().to_string();
        prompter.notify(Notice::success(self.text("save.done", &[("path", target.as_str())])));

        let post_steps = self.run_post_steps(prompter).await;

        let report = RunReport {
            profile: self.profile.name().to_string(),
            outcomes,
            target: self.store.target_path().to_path_buf(),
            post_steps,
        };
        self.summarize(prompter, &report);
        tracing::info!(
            configured = report.configured().count(),
            retries = report.total_retries(),
            "wizard finished"
        );
        Ok(report)
    }

    /// Values from an existing target the operator chose to keep
    async fn carried_values(&self, prompter: &mut dyn Prompter) -> Result<SessionConfig, WizardError> {
        let target = self.store.target_path().display().to_string();
        if !self.store.target_exists().await {
            let template = self.store.template_path().display().to_string();
            prompter.notify(Notice::info(self.text("env.fresh", &[("path", template.as_str())])));
            return Ok(SessionConfig::new());
        }

        if confirm(prompter, &self.text("env.exists", &[("path", target.as_str())])).await? {
            tracing::info!(path = %target, "overwriting existing target");
            return Ok(SessionConfig::new());
        }

        match self.store.load_target().await {
            Ok(existing) => {
                prompter.notify(Notice::info(self.text("env.using_existing", &[("path", target.as_str())])));
                let values = existing.values();
                tracing::info!(path = %target, carried = values.len(), "keeping existing values");
                Ok(values)
            }
            Err(e) => {
                let reason = e.to_string();
                prompter.notify(Notice::warning(
                    self.text("env.unreadable", &[("path", target.as_str()), ("reason", reason.as_str())]),
                ));
                tracing::warn!(path = %target, error = %e, "existing target unreadable");
                Ok(SessionConfig::new())
            }
        }
    }

    async fn collect_key(
        &self,
        prompter: &mut dyn Prompter,
        descriptor: &KeyDescriptor,
        previous: Option<&str>,
        session: &mut SessionConfig,
    ) -> Result<KeyOutcome, WizardError> {
        let mut machine = KeyMachine::new(descriptor.name());
        let mut probe = None;
        let message = self.prompt_message(descriptor, previous);

        loop {
            let input = prompter.read_line(&message, self.config.mask_input).await?;
            let trimmed = input.trim();

            if trimmed.is_empty() && descriptor.is_optional() {
                machine.advance(KeyState::Skipped)?;
                prompter.notify(Notice::info(self.text("keys.skipped", &[])));
                break;
            }

            if trimmed.is_empty() {
                if let Some(previous) = previous {
                    machine.advance(KeyState::Kept)?;
                    session.insert(descriptor.name(), previous);
                    prompter.notify(Notice::success(self.text("keys.kept", &[])));
                    break;
                }
            }

            if validate(trimmed, descriptor.format_rule()) {
                machine.advance(KeyState::Accepted)?;
                session.insert(descriptor.name(), trimmed);
                prompter.notify(Notice::success(self.text("keys.valid", &[])));
                probe = self.probe(prompter, descriptor, trimmed).await;
                break;
            }

            let pattern = descriptor.format_rule().pattern();
            prompter.notify(Notice::error(self.text("keys.invalid", &[("pattern", pattern)])));
            if !descriptor.help_url().is_empty() {
                prompter.notify(Notice::info(self.text("keys.help", &[("url", descriptor.help_url())])));
            }

            if descriptor.is_optional() && confirm(prompter, &self.text("keys.confirm_skip", &[])).await? {
                machine.advance(KeyState::Skipped)?;
                prompter.notify(Notice::info(self.text("keys.skipped", &[])));
                break;
            }
            machine.retry()?;
        }

        Ok(KeyOutcome {
            name: descriptor.name().to_string(),
            label: descriptor.label().to_string(),
            state: machine.state(),
            retries: machine.retries(),
            probe,
        })
    }

    fn prompt_message(&self, descriptor: &KeyDescriptor, previous: Option<&str>) -> String {
        let current = previous
            .map(|value| self.text("keys.current", &[("hint", mask_hint(value).as_str())]))
            .unwrap_or_default();
        let key = if descriptor.is_optional() {
            "keys.prompt_optional"
        } else {
            "keys.prompt_required"
        };
        self.text(key, &[("label", descriptor.label()), ("current", current.as_str())])
    }

    /// Probe an accepted value; the result is advisory and never changes
    /// the key's state
    async fn probe(
        &self,
        prompter: &mut dyn Prompter,
        descriptor: &KeyDescriptor,
        credential: &str,
    ) -> Option<ProbeResult> {
        if !self.profile.probe_enabled() {
            return None;
        }
        let (Some(prober), Some(target)) = (self.prober.as_ref(), descriptor.probe_target()) else {
            return None;
        };

        let label = descriptor.label();
        prompter.notify(Notice::info(self.text("probe.testing", &[("label", label)])));

        let timeout = self.config.probe_timeout();
        let result = tokio::time::timeout(timeout + PROBE_GRACE, prober.probe(target, credential, timeout))
            .await
            .unwrap_or_else(|_| ProbeResult::timeout());

        let notice = match &result {
            ProbeResult::Reachable => Notice::success(self.text("probe.reachable", &[("label", label)])),
            ProbeResult::Unreachable(reason) => {
                Notice::warning(self.text("probe.unreachable", &[("label", label), ("reason", reason.as_str())]))
            }
            ProbeResult::Inconclusive(reason) => {
                Notice::warning(self.text("probe.inconclusive", &[("label", label), ("reason", reason.as_str())]))
            }
        };
        if !result.is_reachable() {
            tracing::warn!(key = descriptor.name(), probe = %target, %result, "probe did not confirm reachability");
        }
        prompter.notify(notice);
        Some(result)
    }

    async fn run_post_steps(&self, prompter: &mut dyn Prompter) -> Vec<(PostStep, PostStepOutcome)> {
        let steps = self.profile.post_steps();
        if steps.is_empty() {
            return Vec::new();
        }

        prompter.notify(Notice::info(self.text("post.step", &[])));
        let mut results = Vec::with_capacity(steps.len());
        for step in steps {
            let outcome = step.run().await;
            prompter.notify(self.post_step_notice(step, &outcome));
            results.push((step.clone(), outcome));
        }
        results
    }

    fn post_step_notice(&self, step: &PostStep, outcome: &PostStepOutcome) -> Notice {
        let path = step.path().display().to_string();
        let params = [("path", path.as_str())];
        match (step, outcome) {
            (PostStep::PermissionsFile { .. }, PostStepOutcome::Done) => {
                Notice::success(self.text("post.settings_created", &params))
            }
            (PostStep::PermissionsFile { .. }, PostStepOutcome::AlreadyPresent) => {
                Notice::info(self.text("post.settings_present", &params))
            }
            (PostStep::PermissionsFile { .. }, PostStepOutcome::Warning(warning)) => {
                let reason = warning.to_string();
                Notice::warning(self.text("post.settings_failed", &[("reason", reason.as_str())]))
            }
            (PostStep::GitignoreCheck { .. }, PostStepOutcome::Warning(PostStepWarning::Missing)) => {
                Notice::warning(self.text("post.gitignore_missing", &[]))
            }
            (PostStep::GitignoreCheck { .. }, PostStepOutcome::Warning(_)) => {
                Notice::warning(self.text("post.gitignore_review", &[]))
            }
            (PostStep::GitignoreCheck { .. }, _) => Notice::success(self.text("post.gitignore_ok", &[])),
        }
    }

    fn summarize(&self, prompter: &mut dyn Prompter, report: &RunReport) {
        prompter.notify(Notice::success(self.text("summary.title", &[])));
        for outcome in &report.outcomes {
            let params = [("label", outcome.label.as_str())];
            let notice = if outcome.is_configured() {
                Notice::success(self.text("summary.configured", &params))
            } else {
                Notice::info(self.text("summary.skipped", &params))
            };
            prompter.notify(notice);
        }
        let target = report.target.display().to_string();
        prompter.notify(Notice::info(self.text("summary.next", &[("path", target.as_str())])));
    }
}
