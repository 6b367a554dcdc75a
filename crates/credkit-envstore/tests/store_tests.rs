//! EnvStore load / merge / save tests

use credkit_envstore::{load, save, EnvDocument, EnvLine, EnvStore, EnvStoreError, SessionConfig};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const TEMPLATE: &str = "\
# Claude starter kit
# Copy to .env and fill in

ANTHROPIC_API_KEY=your_anthropic_api_key_here
OTHER_KEY=unchanged
lowercase_key=left alone

# Optional
EXA_API_KEY=your_exa_api_key_here
";

fn session(pairs: &[(&str, &str)]) -> SessionConfig {
    pairs.iter().copied().collect()
}

#[tokio::test]
async fn load_missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = load(dir.path().join(".env.example")).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(err, EnvStoreError::NotFound(_)));
}

#[tokio::test]
async fn load_then_save_reproduces_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join(".env.example");
    let dst = dir.path().join(".env");
    std::fs::write(&src, TEMPLATE).unwrap();

    let doc = load(&src).await.unwrap();
    save(&dst, &doc.merge(&SessionConfig::new())).await.unwrap();

    assert_eq!(std::fs::read_to_string(&dst).unwrap(), TEMPLATE);
}

#[tokio::test]
async fn save_replaces_existing_file_without_leftovers() {
    let dir = tempfile::tempdir().unwrap();
    let dst = dir.path().join(".env");
    std::fs::write(&dst, "OLD_KEY=old\n").unwrap();

    save(&dst, &EnvDocument::parse("NEW_KEY=new\n")).await.unwrap();

    assert_eq!(std::fs::read_to_string(&dst).unwrap(), "NEW_KEY=new\n");
    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1, "temporary file left behind");
}

#[cfg(unix)]
#[tokio::test]
async fn saved_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let dst = dir.path().join(".env");
    save(&dst, &EnvDocument::parse("A_KEY=1\n")).await.unwrap();

    let mode = std::fs::metadata(&dst).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[tokio::test]
async fn save_into_missing_directory_fails_with_write_error() {
    let dir = tempfile::tempdir().unwrap();
    let dst = dir.path().join("missing").join(".env");

    let err = save(&dst, &EnvDocument::parse("A_KEY=1\n")).await.unwrap_err();
    assert!(matches!(err, EnvStoreError::Write { .. }));
    assert!(!dst.exists());
}

#[tokio::test]
async fn template_superset_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let store = EnvStore::new(dir.path().join(".env.example"), dir.path().join(".env"));
    std::fs::write(
        store.template_path(),
        "ANTHROPIC_API_KEY=your_anthropic_api_key_here\nOTHER_KEY=unchanged\n",
    )
    .unwrap();

    let supplied = format!("sk-ant-api03-{}", "x".repeat(95));
    let values = session(&[("ANTHROPIC_API_KEY", supplied.as_str())]);
    let template = store.load_template().await.unwrap();
    store.commit(template, &values).await.unwrap();

    let written = std::fs::read_to_string(store.target_path()).unwrap();
    assert_eq!(written, format!("ANTHROPIC_API_KEY={supplied}\nOTHER_KEY=unchanged\n"));
    assert!(!written.contains("OPENAI_API_KEY"));
}

#[tokio::test]
async fn target_exists_tracks_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = EnvStore::new(dir.path().join(".env.example"), dir.path().join(".env"));
    assert!(!store.target_exists().await);
    std::fs::write(store.target_path(), "A_KEY=1\n").unwrap();
    assert!(store.target_exists().await);
    assert_eq!(store.load_target().await.unwrap().get("A_KEY"), Some("1"));
}

fn env_line() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "#[ -~]{0,30}",
        "[A-Z_]{1,12}=[ -~]{0,30}",
        "[a-z0-9 ]{1,20}",
    ]
}

/// Lines, each with its own terminator (`true` for `\r\n`), and whether the
/// last line is terminated
type Layout = (Vec<(String, bool)>, bool);

fn document_layout() -> impl Strategy<Value = Layout> {
    (prop::collection::vec((env_line(), any::<bool>()), 0..20), any::<bool>())
}

/// Assemble file text, rewriting assignment values through `value_for`
fn assemble(layout: &Layout, value_for: impl Fn(&str, &str) -> String) -> String {
    let (lines, trailing) = layout;
    let mut text = String::new();
    for (i, (line, crlf)) in lines.iter().enumerate() {
        match line.split_once('=') {
            Some((key, value)) if line.starts_with(|c: char| c.is_ascii_uppercase() || c == '_') => {
                text.push_str(key);
                text.push('=');
                text.push_str(&value_for(key, value));
            }
            _ => text.push_str(line),
        }
        if i + 1 < lines.len() || *trailing {
            text.push_str(if *crlf { "\r\n" } else { "\n" });
        }
    }
    text
}

fn document_text() -> impl Strategy<Value = String> {
    document_layout().prop_map(|layout| assemble(&layout, |_, value| value.to_string()))
}

proptest! {
    #[test]
    fn prop_round_trip(text in document_text()) {
        prop_assert_eq!(EnvDocument::parse(&text).render(), text);
    }

    #[test]
    fn prop_merge_correctness(
        layout in document_layout(),
        values in prop::collection::vec(("[A-Z_]{1,6}", "[ -~]{0,20}"), 0..8),
    ) {
        let text = assemble(&layout, |_, value| value.to_string());
        let template = EnvDocument::parse(&text);
        let session: SessionConfig = values.into_iter().collect();
        let merged = template.clone().merge(&session);

        prop_assert_eq!(merged.line_count(), template.line_count());
        prop_assert_eq!(merged.line_endings(), template.line_endings());
        prop_assert_eq!(merged.keys().collect::<Vec<_>>(), template.keys().collect::<Vec<_>>());

        for (before, after) in template.lines().iter().zip(merged.lines()) {
            match (before, after) {
                (EnvLine::Assignment { key, value }, EnvLine::Assignment { value: merged_value, .. }) => {
                    let expected = session.get(key).unwrap_or(value.as_str());
                    prop_assert_eq!(merged_value.as_str(), expected);
                }
                (b, a) => prop_assert_eq!(b, a),
            }
        }

        let expected = assemble(&layout, |key, value| {
            session.get(key).unwrap_or(value).to_string()
        });
        prop_assert_eq!(merged.render(), expected);
    }

    #[test]
    fn prop_merge_idempotent(
        text in document_text(),
        values in prop::collection::vec(("[A-Z_]{1,6}", "[ -~]{0,20}"), 0..8),
    ) {
        let session: SessionConfig = values.into_iter().collect();
        let once = EnvDocument::parse(&text).merge(&session);
        let twice = once.clone().merge(&session);
        prop_assert_eq!(once.render(), twice.render());
    }
}

#[test]
fn merge_keeps_mixed_line_endings() {
    let template = EnvDocument::parse("# header\r\nA_KEY=old\nB_KEY=2\r\n\r\nC_KEY=3");
    let merged = template.merge(&session(&[("A_KEY", "new"), ("C_KEY", "4")]));
    assert_eq!(merged.render(), "# header\r\nA_KEY=new\nB_KEY=2\r\n\r\nC_KEY=4");
}
