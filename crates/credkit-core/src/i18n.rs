//! Message catalog
//!
//! Operator-facing text comes from embedded JSON tables, one per language.
//! A [`Catalog`] is resolved once for a [`Locale`] and never changes; lookups
//! are pure. Resolution order for a key: exact locale (`fr-CA`), then base
//! language (`fr`), then [`DEFAULT_LANGUAGE`].

use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Language every other table falls back to
pub const DEFAULT_LANGUAGE: &str = "en";

/// Environment variables consulted by [`Locale::detect`], in order
pub const LOCALE_ENV_VARS: [&str; 4] = ["CREDKIT_LOCALE", "LC_ALL", "LANG", "LANGUAGE"];

fn bundled(tag: &str) -> Option<&'static str> {
    match tag {
        "en" => Some(include_str!("../locales/en.json")),
        "fr" => Some(include_str!("../locales/fr.json")),
        _ => None,
    }
}

/// Normalized locale tag such as `fr-FR`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    language: String,
    region: Option<String>,
}

impl Locale {
    /// Parse `fr`, `fr-FR`, `fr_FR.UTF-8` or `fr_FR@euro`
    ///
    /// Returns `None` for empty input and the `C`/`POSIX` locales.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        // LANGUAGE may hold a colon-separated list
        let raw = raw.split(':').next().unwrap_or_default();
        let raw = raw.split(['.', '@']).next().unwrap_or_default().trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("C") || raw.eq_ignore_ascii_case("POSIX") {
            return None;
        }

        let mut parts = raw.split(['-', '_']);
        let language = parts.next()?.to_ascii_lowercase();
        if language.is_empty() || !language.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        let region = parts
            .next()
            .filter(|r| !r.is_empty())
            .map(str::to_ascii_uppercase);
        Some(Self { language, region })
    }

    /// First usable locale from `explicit` then [`LOCALE_ENV_VARS`]
    #[must_use]
    pub fn detect(explicit: Option<&str>) -> Self {
        Self::detect_with(explicit, |var| std::env::var(var).ok())
    }

    /// [`Locale::detect`] with a custom environment lookup
    #[must_use]
    pub fn detect_with(explicit: Option<&str>, lookup: impl Fn(&str) -> Option<String>) -> Self {
        explicit
            .and_then(Self::parse)
            .or_else(|| {
                LOCALE_ENV_VARS
                    .iter()
                    .find_map(|var| lookup(var).as_deref().and_then(Self::parse))
            })
            .unwrap_or_default()
    }

    /// Lowercase language code, e.g. `fr`
    #[inline]
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Uppercase region, e.g. `FR`
    #[inline]
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Tags to try, most specific first, ending with the default language
    #[must_use]
    pub fn fallback_chain(&self) -> Vec<String> {
        let mut chain = Vec::with_capacity(3);
        if self.region.is_some() {
            chain.push(self.to_string());
        }
        chain.push(self.language.clone());
        if self.language != DEFAULT_LANGUAGE {
            chain.push(DEFAULT_LANGUAGE.to_string());
        }
        chain
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            region: None,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{}-{region}", self.language),
            None => f.write_str(&self.language),
        }
    }
}

/// Resolved, immutable message table for one locale
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    locale: Locale,
    messages: HashMap<String, String>,
}

impl Catalog {
    /// Resolve the bundled tables along `locale`'s fallback chain
    #[must_use]
    pub fn resolve(locale: &Locale) -> Self {
        let chain = locale.fallback_chain();
        let tables = chain
            .iter()
            .filter_map(|tag| bundled(tag).map(|json| (tag.as_str(), json)));
        Self::from_tables(locale.clone(), tables)
    }

    /// Build from `(tag, json)` tables ordered most specific first
    ///
    /// A table that is not valid JSON is skipped with a warning.
    pub fn from_tables<'a>(locale: Locale, tables: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut messages = HashMap::new();
        for (tag, json) in tables {
            match serde_json::from_str::<Value>(json) {
                Ok(value) => {
                    let mut flat = HashMap::new();
                    flatten("", &value, &mut flat);
                    for (key, text) in flat {
                        messages.entry(key).or_insert(text);
                    }
                }
                Err(e) => tracing::warn!(%tag, error = %e, "skipping unreadable message table"),
            }
        }
        tracing::debug!(%locale, messages = messages.len(), "resolved message catalog");
        Self { locale, messages }
    }

    /// Locale the catalog was resolved for
    #[inline]
    #[must_use]
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Look up `key` and substitute `{name}` placeholders
    ///
    /// Unknown keys render as `[missing: key]`.
    #[must_use]
    pub fn get(&self, key: &str, params: &[(&str, &str)]) -> String {
        match self.messages.get(key) {
            Some(template) => interpolate(template, params),
            None => format!("[missing: {key}]"),
        }
    }

    /// Whether any table along the chain defines `key`
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.messages.contains_key(key)
    }
}

/// One-shot lookup; resolves a catalog for `locale` on every call
#[must_use]
pub fn translate(key: &str, locale: &Locale, params: &[(&str, &str)]) -> String {
    Catalog::resolve(locale).get(key, params)
}

fn flatten(prefix: &str, value: &Value, out: &mut HashMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&path, child, out);
            }
        }
        Value::String(text) => {
            out.insert(prefix.to_string(), text.clone());
        }
        _ => {}
    }
}

fn interpolate(template: &str, params: &[(&str, &str)]) -> String {
    params.iter().fold(template.to_string(), |text, (name, value)| {
        text.replace(&format!("{{{name}}}"), value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_posix_style_tags() {
        let locale = Locale::parse("fr_FR.UTF-8").unwrap();
        assert_eq!(locale.to_string(), "fr-FR");
        assert_eq!(Locale::parse("de@euro").unwrap().to_string(), "de");
        assert_eq!(Locale::parse("pt-br").unwrap().to_string(), "pt-BR");
        assert_eq!(Locale::parse("fr_CA:en").unwrap().to_string(), "fr-CA");
        assert!(Locale::parse("C").is_none());
        assert!(Locale::parse("POSIX.UTF-8").is_none());
        assert!(Locale::parse("").is_none());
    }

    #[test]
    fn detection_order() {
        let env = |var: &str| match var {
            "LC_ALL" => Some("C".to_string()),
            "LANG" => Some("fr_FR.UTF-8".to_string()),
            "LANGUAGE" => Some("de".to_string()),
            _ => None,
        };
        assert_eq!(Locale::detect_with(None, env).to_string(), "fr-FR");
        assert_eq!(Locale::detect_with(Some("en_GB"), env).to_string(), "en-GB");
        assert_eq!(Locale::detect_with(None, |_| None), Locale::default());
    }

    #[test]
    fn fallback_chain_ends_with_default() {
        let chain = Locale::parse("fr-CA").unwrap().fallback_chain();
        assert_eq!(chain, vec!["fr-CA", "fr", "en"]);
        assert_eq!(Locale::default().fallback_chain(), vec!["en"]);
    }

    #[test]
    fn most_specific_table_wins() {
        let catalog = Catalog::from_tables(
            Locale::parse("fr-CA").unwrap(),
            [
                ("fr-CA", r#"{"greet": "Allô {name}"}"#),
                ("fr", r#"{"greet": "Bonjour {name}", "bye": "Au revoir"}"#),
                ("en", r#"{"greet": "Hello", "bye": "Bye", "only": {"en": "English"}}"#),
            ],
        );
        assert_eq!(catalog.get("greet", &[("name", "Sam")]), "Allô Sam");
        assert_eq!(catalog.get("bye", &[]), "Au revoir");
        assert_eq!(catalog.get("only.en", &[]), "English");
        assert_eq!(catalog.get("nope", &[]), "[missing: nope]");
    }

    #[test]
    fn bad_table_is_skipped() {
        let catalog = Catalog::from_tables(Locale::default(), [("xx", "{not json"), ("en", r#"{"a": "b"}"#)]);
        assert_eq!(catalog.get("a", &[]), "b");
    }

    #[test]
    fn bundled_french_falls_back_to_english() {
        let catalog = Catalog::resolve(&Locale::parse("fr_CA").unwrap());
        assert_eq!(catalog.get("keys.valid", &[]), "Format valide");
        // Only the English table has the rule line
        assert!(catalog.get("wizard.rule", &[]).starts_with("===="));
    }

    #[test]
    fn bundled_tables_share_keys() {
        let en = Catalog::from_tables(Locale::default(), [("en", bundled("en").unwrap())]);
        let fr = Catalog::from_tables(Locale::default(), [("fr", bundled("fr").unwrap())]);
        for key in fr.messages.keys() {
            assert!(en.contains(key), "{key} missing from en");
        }
    }

    #[test]
    fn translate_substitutes_every_occurrence() {
        let text = translate("keys.prompt_required", &Locale::default(), &[("label", "Exa"), ("current", "")]);
        assert_eq!(text, "Exa: ");
    }
}
