//! Command-line definition
//!
//! Every option except `--list-keys` can also come from a `CREDKIT_*`
//! environment variable.

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use credkit_core::config::{DEFAULT_TARGET, DEFAULT_TEMPLATE};
use credkit_core::post_step::{DEFAULT_SETTINGS_PATH, DEFAULT_SETTINGS_TEMPLATE};
use credkit_core::{ProfileKind, WizardConfig, WizardProfile};
use std::path::PathBuf;

pub(crate) fn command() -> Command {
    Command::new("credkit")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Interactive API key setup: validates keys and writes them into .env")
        .arg(
            Arg::new("template")
                .long("template")
                .env("CREDKIT_TEMPLATE")
                .default_value(DEFAULT_TEMPLATE)
                .value_parser(value_parser!(PathBuf))
                .help("Template listing every key the project uses"),
        )
        .arg(
            Arg::new("target")
                .long("target")
                .env("CREDKIT_TARGET")
                .default_value(DEFAULT_TARGET)
                .value_parser(value_parser!(PathBuf))
                .help("Environment file to write"),
        )
        .arg(
            Arg::new("profile")
                .long("profile")
                .env("CREDKIT_PROFILE")
                .default_value("standard")
                .value_parser(["standard", "security"])
                .help("Which set of keys and post-setup checks to use"),
        )
        .arg(
            Arg::new("no-probe")
                .long("no-probe")
                .env("CREDKIT_NO_PROBE")
                .action(ArgAction::SetTrue)
                .help("Skip connectivity tests"),
        )
        .arg(
            Arg::new("probe-timeout-ms")
                .long("probe-timeout-ms")
                .env("CREDKIT_PROBE_TIMEOUT_MS")
                .default_value("5000")
                .value_parser(value_parser!(u64).range(1..))
                .help("Time budget for each connectivity test"),
        )
        .arg(
            Arg::new("locale")
                .long("locale")
                .env("CREDKIT_LOCALE")
                .help("Message language, e.g. fr or fr_FR.UTF-8 (default: LC_ALL, LANG, LANGUAGE)"),
        )
        .arg(
            Arg::new("settings-template")
                .long("settings-template")
                .env("CREDKIT_SETTINGS_TEMPLATE")
                .default_value(DEFAULT_SETTINGS_TEMPLATE)
                .value_parser(value_parser!(PathBuf))
                .help("Permissions settings template (security profile)"),
        )
        .arg(
            Arg::new("settings-path")
                .long("settings-path")
                .env("CREDKIT_SETTINGS_PATH")
                .default_value(DEFAULT_SETTINGS_PATH)
                .value_parser(value_parser!(PathBuf))
                .help("Where to create the permissions settings (security profile)"),
        )
        .arg(
            Arg::new("show-input")
                .long("show-input")
                .env("CREDKIT_SHOW_INPUT")
                .action(ArgAction::SetTrue)
                .help("Echo keys while typing"),
        )
        .arg(
            Arg::new("list-keys")
                .long("list-keys")
                .action(ArgAction::SetTrue)
                .help("Print the profile's key descriptors as JSON and exit"),
        )
}

/// Resolved command-line options
#[derive(Debug, Clone)]
pub(crate) struct Options {
    pub(crate) template: PathBuf,
    pub(crate) target: PathBuf,
    pub(crate) profile: ProfileKind,
    pub(crate) probe: bool,
    pub(crate) probe_timeout_ms: u64,
    pub(crate) locale: Option<String>,
    pub(crate) settings_template: PathBuf,
    pub(crate) settings_path: PathBuf,
    pub(crate) show_input: bool,
    pub(crate) list_keys: bool,
}

impl Options {
    pub(crate) fn from_matches(matches: &ArgMatches) -> anyhow::Result<Self> {
        let path = |id: &str| {
            matches
                .get_one::<PathBuf>(id)
                .cloned()
                .with_context(|| format!("missing --{id}"))
        };
        let profile = matches
            .get_one::<String>("profile")
            .context("missing --profile")?
            .parse::<ProfileKind>()
            .map_err(anyhow::Error::msg)?;

        Ok(Self {
            template: path("template")?,
            target: path("target")?,
            profile,
            probe: !matches.get_flag("no-probe"),
            probe_timeout_ms: *matches
                .get_one::<u64>("probe-timeout-ms")
                .context("missing --probe-timeout-ms")?,
            locale: matches.get_one::<String>("locale").cloned(),
            settings_template: path("settings-template")?,
            settings_path: path("settings-path")?,
            show_input: matches.get_flag("show-input"),
            list_keys: matches.get_flag("list-keys"),
        })
    }

    pub(crate) fn config(&self) -> WizardConfig {
        let config = WizardConfig {
            probe_timeout_ms: self.probe_timeout_ms,
            ..WizardConfig::new()
        }
        .with_template(&self.template)
        .with_target(&self.target)
        .with_mask_input(!self.show_input);
        match &self.locale {
            Some(locale) => config.with_locale(locale),
            None => config,
        }
    }

    pub(crate) fn profile(&self) -> WizardProfile {
        let profile = match self.profile {
            ProfileKind::Standard => WizardProfile::standard(),
            ProfileKind::Security => {
                WizardProfile::security_with(&self.settings_template, &self.settings_path)
            }
        };
        profile.with_probe(self.probe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credkit_core::PostStep;
    use std::path::Path;
    use std::time::Duration;

    fn parse(args: &[&str]) -> Options {
        let matches = command()
            .try_get_matches_from(std::iter::once("credkit").chain(args.iter().copied()))
            .unwrap();
        Options::from_matches(&matches).unwrap()
    }

    #[test]
    fn command_is_well_formed() {
        command().debug_assert();
    }

    #[test]
    fn flags_populate_config() {
        let options = parse(&[
            "--template",
            "tpl.env",
            "--target",
            "out.env",
            "--probe-timeout-ms",
            "750",
            "--locale",
            "fr",
            "--show-input",
        ]);
        let config = options.config();
        assert_eq!(config.template_path(), Path::new("tpl.env"));
        assert_eq!(config.target_path(), Path::new("out.env"));
        assert_eq!(config.probe_timeout(), Duration::from_millis(750));
        assert_eq!(config.locale.as_deref(), Some("fr"));
        assert!(!config.mask_input);
    }

    #[test]
    fn security_profile_uses_settings_paths() {
        let options = parse(&["--profile", "security", "--settings-path", "out/settings.json", "--no-probe"]);
        let profile = options.profile();
        assert_eq!(profile.name(), "security");
        assert!(!profile.probe_enabled());
        assert!(matches!(
            &profile.post_steps()[0],
            PostStep::PermissionsFile { target, .. } if target == Path::new("out/settings.json")
        ));
    }

    #[test]
    fn options_read_credkit_env_vars() {
        let command = command();
        let env = |id: &str| {
            command
                .get_arguments()
                .find(|arg| arg.get_id() == id)
                .and_then(|arg| arg.get_env())
                .map(|name| name.to_string_lossy().into_owned())
        };

        for (id, var) in [
            ("template", "CREDKIT_TEMPLATE"),
            ("target", "CREDKIT_TARGET"),
            ("profile", "CREDKIT_PROFILE"),
            ("no-probe", "CREDKIT_NO_PROBE"),
            ("probe-timeout-ms", "CREDKIT_PROBE_TIMEOUT_MS"),
            ("locale", "CREDKIT_LOCALE"),
            ("settings-template", "CREDKIT_SETTINGS_TEMPLATE"),
            ("settings-path", "CREDKIT_SETTINGS_PATH"),
            ("show-input", "CREDKIT_SHOW_INPUT"),
        ] {
            assert_eq!(env(id).as_deref(), Some(var), "--{id}");
        }
        assert_eq!(env("list-keys"), None);
    }

    #[test]
    fn rejects_unknown_profile_and_zero_timeout() {
        assert!(command().try_get_matches_from(["credkit", "--profile", "paranoid"]).is_err());
        assert!(command().try_get_matches_from(["credkit", "--probe-timeout-ms", "0"]).is_err());
    }
}
