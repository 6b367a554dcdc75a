//! Values collected during one wizard run

use indexmap::IndexMap;

/// Ordered map of key name → value
///
/// Insertion order is preserved so summaries list keys in prompt order.
/// Skipped keys are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionConfig {
    values: IndexMap<String, String>,
}

impl SessionConfig {
    /// Create empty session
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, returning the one it replaced
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.insert(key.into(), value.into())
    }

    /// Value for `key`
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Whether `key` has a value
    #[inline]
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Remove a value, keeping the order of the rest
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.shift_remove(key)
    }

    /// Layer `other` on top of `self`; keys in `other` win
    #[must_use]
    pub fn overlaid_with(mut self, other: &SessionConfig) -> Self {
        for (key, value) in other.iter() {
            self.insert(key, value);
        }
        self
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of keys
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no key has a value
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SessionConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut session = Self::new();
        for (k, v) in iter {
            session.insert(k, v);
        }
        session
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_prefers_newer_values() {
        let carried: SessionConfig = [("A", "old"), ("B", "keep")].into_iter().collect();
        let fresh: SessionConfig = [("A", "new")].into_iter().collect();

        let merged = carried.overlaid_with(&fresh);
        assert_eq!(merged.get("A"), Some("new"));
        assert_eq!(merged.get("B"), Some("keep"));
        assert_eq!(merged.keys().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn remove_keeps_order() {
        let mut s: SessionConfig = [("A", "1"), ("B", "2"), ("C", "3")].into_iter().collect();
        assert_eq!(s.remove("B").as_deref(), Some("2"));
        assert_eq!(s.keys().collect::<Vec<_>>(), vec!["A", "C"]);
    }
}
