//! Credential slot definitions
//!
//! A [`KeyDescriptor`] is immutable once built. Construction goes through
//! [`KeyDescriptor::required`] / [`KeyDescriptor::optional`] followed by the
//! `with_*` methods.

use serde::{Serialize, Serializer};
use std::fmt;

/// Anchored regular expression describing the accepted shape of a credential
///
/// A pattern that fails to compile is kept (so it can still be shown in
/// hints) but never matches anything.
#[derive(Clone)]
pub struct FormatRule {
    source: String,
    compiled: Option<regex::Regex>,
}

impl FormatRule {
    /// Build a rule from its pattern text
    #[must_use]
    pub fn new(pattern: impl Into<String>) -> Self {
        let source = pattern.into();
        let compiled = regex::Regex::new(&source).ok();
        Self { source, compiled }
    }

    /// Build a rule, reporting a pattern that does not compile
    ///
    /// # Errors
    /// Returns the compiler error for an invalid pattern.
    pub fn try_new(pattern: impl Into<String>) -> Result<Self, regex::Error> {
        let source = pattern.into();
        let compiled = regex::Regex::new(&source)?;
        Ok(Self {
            source,
            compiled: Some(compiled),
        })
    }

    /// Pattern text as written
    #[inline]
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.source
    }

    /// Whether the pattern compiled
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.compiled.is_some()
    }

    /// Match an already-trimmed candidate
    #[inline]
    pub(crate) fn matches(&self, candidate: &str) -> bool {
        self.compiled
            .as_ref()
            .is_some_and(|re| re.is_match(candidate))
    }
}

impl fmt::Debug for FormatRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatRule")
            .field("pattern", &self.source)
            .field("valid", &self.is_valid())
            .finish()
    }
}

impl fmt::Display for FormatRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.source)
    }
}

impl PartialEq for FormatRule {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for FormatRule {}

impl Serialize for FormatRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

/// Remote endpoint used for a reachability probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeTarget {
    /// Host name, optionally with `:port`
    pub hostname: String,
    /// Request path, starting with `/`
    pub path: String,
}

impl ProbeTarget {
    /// Create a probe target
    #[inline]
    #[must_use]
    pub fn new(hostname: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            path: path.into(),
        }
    }

    /// Probe target at the root path of `hostname`
    #[inline]
    #[must_use]
    pub fn root(hostname: impl Into<String>) -> Self {
        Self::new(hostname, "/")
    }
}

impl fmt::Display for ProbeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.hostname, self.path)
    }
}

/// One credential slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyDescriptor {
    name: String,
    label: String,
    format_rule: FormatRule,
    required: bool,
    probe_target: Option<ProbeTarget>,
    help_url: String,
}

impl KeyDescriptor {
    /// Descriptor the operator can never skip
    #[must_use]
    pub fn required(name: impl Into<String>, label: impl Into<String>, pattern: &str) -> Self {
        Self::new(name, label, pattern, true)
    }

    /// Descriptor the operator may leave blank
    #[must_use]
    pub fn optional(name: impl Into<String>, label: impl Into<String>, pattern: &str) -> Self {
        Self::new(name, label, pattern, false)
    }

    fn new(name: impl Into<String>, label: impl Into<String>, pattern: &str, required: bool) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            format_rule: FormatRule::new(pattern),
            required,
            probe_target: None,
            help_url: String::new(),
        }
    }

    /// With probe target
    #[inline]
    #[must_use]
    pub fn with_probe(mut self, target: ProbeTarget) -> Self {
        self.probe_target = Some(target);
        self
    }

    /// With help link
    #[inline]
    #[must_use]
    pub fn with_help_url(mut self, url: impl Into<String>) -> Self {
        self.help_url = url.into();
        self
    }

    /// Environment key name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human label
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Accepted shape
    #[inline]
    #[must_use]
    pub fn format_rule(&self) -> &FormatRule {
        &self.format_rule
    }

    /// Whether a blank answer must be retried
    #[inline]
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Whether the operator may skip this key
    #[inline]
    #[must_use]
    pub fn is_optional(&self) -> bool {
        !self.required
    }

    /// Endpoint for the connectivity test, if any
    #[inline]
    #[must_use]
    pub fn probe_target(&self) -> Option<&ProbeTarget> {
        self.probe_target.as_ref()
    }

    /// Where to obtain the key
    #[inline]
    #[must_use]
    pub fn help_url(&self) -> &str {
        &self.help_url
    }

    /// Placeholder value the template ships for this key
    ///
    /// `ANTHROPIC_API_KEY` → `your_anthropic_api_key_here`
    #[must_use]
    pub fn placeholder(&self) -> String {
        format!("your_{}_here", self.name.to_lowercase())
    }

    /// Whether `value` is the template placeholder rather than a real secret
    #[must_use]
    pub fn is_placeholder(&self, value: &str) -> bool {
        value.trim() == self.placeholder()
    }
}
