//! Format validation of raw operator input
//!
//! Both functions are pure and total: no I/O, no panics, the same answer for
//! the same input. The validator does not know which descriptor it serves.

use crate::descriptor::FormatRule;

/// Check `raw` against `rule`
///
/// The input is trimmed first; an empty trimmed string never validates.
#[must_use]
pub fn validate(raw: &str, rule: &FormatRule) -> bool {
    let candidate = raw.trim();
    !candidate.is_empty() && rule.matches(candidate)
}

/// Check `raw` against an uncompiled pattern
///
/// A pattern that does not compile validates nothing.
#[must_use]
pub fn validate_pattern(raw: &str, pattern: &str) -> bool {
    validate(raw, &FormatRule::new(pattern))
}
