//! Testing utilities for the credkit workspace
//!
//! Scripted operator input, canned probers, valid credential fixtures and a
//! throwaway project directory.

#![allow(missing_docs)]

use async_trait::async_trait;
use credkit_core::{Notice, NoticeLevel, PromptError, Prompter, WizardConfig};
use credkit_probe::{ProbeResult, Prober};
use credkit_registry::ProbeTarget;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub const STANDARD_TEMPLATE: &str = "\
# API keys for the starter kit
# Copy to .env and fill in

ANTHROPIC_API_KEY=your_anthropic_api_key_here
EXA_API_KEY=your_exa_api_key_here

# Optional
OPENAI_API_KEY=your_openai_api_key_here
";

pub fn valid_anthropic_key() -> String {
    format!("sk-ant-api03-{}", "A1b2_-".repeat(16).chars().take(95).collect::<String>())
}

pub fn valid_exa_key() -> String {
    "0123abcd-0123-4567-89ab-0123456789ab".to_string()
}

pub fn valid_openai_key() -> String {
    format!("sk-{}", "Ab3".repeat(16))
}

pub fn valid_voyage_key() -> String {
    "pa-test_key-123".to_string()
}

/// Prompter fed from a fixed list of answers
///
/// Running out of answers behaves like end of input.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    inputs: VecDeque<String>,
    /// Every prompt shown, with its mask flag
    pub prompts: Vec<(String, bool)>,
    pub notices: Vec<Notice>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn remaining(&self) -> usize {
        self.inputs.len()
    }

    /// Prompts whose text contains `needle`
    pub fn prompts_containing(&self, needle: &str) -> usize {
        self.prompts.iter().filter(|(text, _)| text.contains(needle)).count()
    }

    pub fn notices_at(&self, level: NoticeLevel) -> Vec<&str> {
        self.notices
            .iter()
            .filter(|n| n.level == level)
            .map(|n| n.text.as_str())
            .collect()
    }

    /// Everything shown, in order, one line per prompt or notice
    pub fn transcript(&self) -> String {
        let mut out = String::new();
        for (prompt, _) in &self.prompts {
            out.push_str(prompt);
            out.push('\n');
        }
        for notice in &self.notices {
            out.push_str(&notice.to_string());
            out.push('\n');
        }
        out
    }
}

#[async_trait]
impl Prompter for ScriptedPrompter {
    async fn read_line(&mut self, message: &str, mask: bool) -> Result<String, PromptError> {
        self.prompts.push((message.to_string(), mask));
        self.inputs.pop_front().ok_or(PromptError::Closed)
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

/// Prober returning a fixed result and counting calls
#[derive(Debug)]
pub struct StubProber {
    result: ProbeResult,
    calls: AtomicUsize,
}

impl StubProber {
    pub fn new(result: ProbeResult) -> Self {
        Self {
            result,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn reachable() -> Self {
        Self::new(ProbeResult::Reachable)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Prober for StubProber {
    async fn probe(&self, _target: &ProbeTarget, _credential: &str, _timeout: Duration) -> ProbeResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

/// Prober that never answers and ignores its timeout
#[derive(Debug, Default)]
pub struct HangingProber;

#[async_trait]
impl Prober for HangingProber {
    async fn probe(&self, _target: &ProbeTarget, _credential: &str, _timeout: Duration) -> ProbeResult {
        std::future::pending::<ProbeResult>().await
    }
}

/// Temporary project directory with a template and target path
#[derive(Debug)]
pub struct TestProject {
    dir: tempfile::TempDir,
}

impl TestProject {
    /// Empty project without a template
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn with_template(template: &str) -> Self {
        let project = Self::empty();
        std::fs::write(project.template_path(), template).unwrap();
        project
    }

    pub fn standard() -> Self {
        Self::with_template(STANDARD_TEMPLATE)
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn template_path(&self) -> PathBuf {
        self.root().join(".env.example")
    }

    pub fn target_path(&self) -> PathBuf {
        self.root().join(".env")
    }

    pub fn write_target(&self, contents: &str) {
        std::fs::write(self.target_path(), contents).unwrap();
    }

    pub fn read_target(&self) -> String {
        std::fs::read_to_string(self.target_path()).unwrap()
    }

    pub fn target_exists(&self) -> bool {
        self.target_path().exists()
    }

    /// Config over this project's paths, English, short probe timeout
    pub fn config(&self) -> WizardConfig {
        WizardConfig::new()
            .with_template(self.template_path())
            .with_target(self.target_path())
            .with_probe_timeout(Duration::from_millis(100))
            .with_locale("en")
    }
}
