//! Ordered registry of credential descriptors
//!
//! Provides [`Registry`] plus the two built-in registries the wizard ships
//! with. Order is prompt order.

use crate::descriptor::{KeyDescriptor, ProbeTarget};
use crate::error::RegistryError;
use std::collections::HashSet;

const ANTHROPIC_PATTERN: &str = r"^sk-ant-api03-[A-Za-z0-9_-]{95}$";
const EXA_PATTERN: &str = r"^[a-f0-9]{8}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{12}$";
const OPENAI_PATTERN: &str = r"^sk-[A-Za-z0-9]{48}$";
const OPENAI_PROJECT_PATTERN: &str = r"^sk-[A-Za-z0-9_-]{48,}$";
const VOYAGE_PATTERN: &str = r"^pa-[A-Za-z0-9_-]+$";

/// Immutable, ordered list of descriptors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    descriptors: Vec<KeyDescriptor>,
}

impl Registry {
    /// Build a registry, rejecting bad names, duplicate names and patterns
    /// that do not compile
    ///
    /// # Errors
    /// - `RegistryError::InvalidName` if a name is not uppercase snake-case
    /// - `RegistryError::DuplicateName` if a name repeats
    /// - `RegistryError::InvalidPattern` if a format rule does not compile
    pub fn new(descriptors: Vec<KeyDescriptor>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        for descriptor in &descriptors {
            let name = descriptor.name();
            if name.is_empty() || !name.chars().all(|c| c.is_ascii_uppercase() || c == '_') {
                return Err(RegistryError::InvalidName(name.to_string()));
            }
            if !seen.insert(name) {
                return Err(RegistryError::DuplicateName(name.to_string()));
            }
            if let Err(source) = regex::Regex::new(descriptor.format_rule().pattern()) {
                return Err(RegistryError::InvalidPattern {
                    name: name.to_string(),
                    source,
                });
            }
        }
        Ok(Self { descriptors })
    }

    /// Registry used by the plain setup wizard
    #[must_use]
    pub fn standard() -> Self {
        Self {
            descriptors: vec![
                anthropic(),
                KeyDescriptor::required("EXA_API_KEY", "Exa Search API", EXA_PATTERN)
                    .with_probe(ProbeTarget::root("api.exa.ai"))
                    .with_help_url("https://dashboard.exa.ai/api-keys"),
                KeyDescriptor::optional("OPENAI_API_KEY", "OpenAI API", OPENAI_PATTERN)
                    .with_probe(ProbeTarget::root("api.openai.com"))
                    .with_help_url("https://platform.openai.com/api-keys"),
            ],
        }
    }

    /// Registry used by the security-flavoured wizard
    ///
    /// Only the Anthropic key is required; OpenAI accepts project-scoped keys.
    #[must_use]
    pub fn security() -> Self {
        Self {
            descriptors: vec![
                anthropic(),
                KeyDescriptor::optional("OPENAI_API_KEY", "OpenAI API", OPENAI_PROJECT_PATTERN)
                    .with_probe(ProbeTarget::root("api.openai.com"))
                    .with_help_url("https://platform.openai.com/api-keys"),
                KeyDescriptor::optional("EXA_API_KEY", "Exa Search API", EXA_PATTERN)
                    .with_probe(ProbeTarget::root("api.exa.ai"))
                    .with_help_url("https://dashboard.exa.ai/"),
                KeyDescriptor::optional("VOYAGE_API_KEY", "Voyage AI API", VOYAGE_PATTERN)
                    .with_probe(ProbeTarget::root("api.voyageai.com"))
                    .with_help_url("https://dash.voyageai.com/"),
            ],
        }
    }

    /// Look up a descriptor by key name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&KeyDescriptor> {
        self.descriptors.iter().find(|d| d.name() == name)
    }

    /// Check if a key is registered
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate in prompt order
    pub fn iter(&self) -> impl Iterator<Item = &KeyDescriptor> {
        self.descriptors.iter()
    }

    /// Key names in prompt order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.descriptors.iter().map(KeyDescriptor::name).collect()
    }

    /// Number of descriptors
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether the registry has no descriptors
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a KeyDescriptor;
    type IntoIter = std::slice::Iter<'a, KeyDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.descriptors.iter()
    }
}

fn anthropic() -> KeyDescriptor {
    KeyDescriptor::required("ANTHROPIC_API_KEY", "Anthropic Claude API", ANTHROPIC_PATTERN)
        .with_probe(ProbeTarget::root("api.anthropic.com"))
        .with_help_url("https://console.anthropic.com/account/keys")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::validate;

    #[test]
    fn builtin_registries_pass_construction_checks() {
        for registry in [Registry::standard(), Registry::security()] {
            let descriptors: Vec<_> = registry.iter().cloned().collect();
            assert!(Registry::new(descriptors).is_ok());
            assert!(registry.iter().all(|d| d.format_rule().is_valid()));
        }
    }

    #[test]
    fn standard_order_and_flags() {
        let registry = Registry::standard();
        assert_eq!(
            registry.names(),
            vec!["ANTHROPIC_API_KEY", "EXA_API_KEY", "OPENAI_API_KEY"]
        );
        assert!(registry.get("ANTHROPIC_API_KEY").unwrap().is_required());
        assert!(registry.get("OPENAI_API_KEY").unwrap().is_optional());
    }

    #[test]
    fn security_registry_has_voyage() {
        let registry = Registry::security();
        assert_eq!(registry.len(), 4);
        let voyage = registry.get("VOYAGE_API_KEY").unwrap();
        assert!(validate("pa-abc_DEF-123", voyage.format_rule()));
        assert!(!validate("pb-abc", voyage.format_rule()));
    }

    #[test]
    fn anthropic_key_shape() {
        let registry = Registry::standard();
        let rule = registry.get("ANTHROPIC_API_KEY").unwrap().format_rule();
        let key = format!("sk-ant-api03-{}", "a".repeat(95));
        assert!(validate(&key, rule));
        assert!(!validate(&format!("sk-ant-api03-{}", "a".repeat(94)), rule));
    }

    #[test]
    fn openai_patterns_differ_between_profiles() {
        let project_key = format!("sk-proj_{}", "b".repeat(48));
        let standard = Registry::standard();
        let security = Registry::security();
        assert!(!validate(&project_key, standard.get("OPENAI_API_KEY").unwrap().format_rule()));
        assert!(validate(&project_key, security.get("OPENAI_API_KEY").unwrap().format_rule()));
    }

    #[test]
    fn rejects_duplicate_names() {
        let result = Registry::new(vec![
            KeyDescriptor::required("A_KEY", "a", "^a$"),
            KeyDescriptor::optional("A_KEY", "a again", "^a$"),
        ]);
        assert!(matches!(result, Err(RegistryError::DuplicateName(n)) if n == "A_KEY"));
    }

    #[test]
    fn rejects_lowercase_names() {
        let result = Registry::new(vec![KeyDescriptor::required("api_key", "a", "^a$")]);
        assert!(matches!(result, Err(RegistryError::InvalidName(_))));
    }

    #[test]
    fn rejects_bad_patterns() {
        let result = Registry::new(vec![KeyDescriptor::required("A_KEY", "a", "(")]);
        assert!(matches!(result, Err(RegistryError::InvalidPattern { .. })));
    }
}
