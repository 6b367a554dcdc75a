//! Property tests for the format validator

use credkit_registry::{validate, validate_pattern, FormatRule, Registry};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_validate_is_total(raw in any::<String>(), pattern in any::<String>()) {
        // Must return for any input, including patterns that do not compile
        let _ = validate_pattern(&raw, &pattern);
    }

    #[test]
    fn prop_whitespace_only_never_validates(ws in "[ \t\r\n]{0,16}") {
        for descriptor in &Registry::security() {
            prop_assert!(!validate(&ws, descriptor.format_rule()));
        }
        prop_assert!(!validate(&ws, &FormatRule::new(".*")));
    }

    #[test]
    fn prop_surrounding_whitespace_is_ignored(
        body in "[a-f0-9]{8}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{12}",
        left in "[ \t]{0,4}",
        right in "[ \t\n]{0,4}",
    ) {
        let registry = Registry::standard();
        let rule = registry.get("EXA_API_KEY").unwrap().format_rule();
        prop_assert!(validate(&body, rule));
        let padded = format!("{left}{body}{right}");
        prop_assert!(validate(&padded, rule));
    }

    #[test]
    fn prop_deterministic(raw in ".{0,64}") {
        let rule = FormatRule::new(r"^sk-[A-Za-z0-9]{48}$");
        prop_assert_eq!(validate(&raw, &rule), validate(&raw, &rule));
    }
}
