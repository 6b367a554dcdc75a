//! Operator interaction
//!
//! The wizard talks to the operator only through [`Prompter`]: one line of
//! input per call, plus status notices. [`TerminalPrompter`] is the
//! interactive implementation; tests script their own.

use crate::error::PromptError;
use async_trait::async_trait;
use std::fmt;
use std::io::{BufRead, IsTerminal, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Severity of a status notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeLevel {
    /// Plain progress text
    Info,
    /// A step completed
    Success,
    /// Advisory; never means the input was rejected
    Warning,
    /// Input rejected or step failed
    Error,
}

impl NoticeLevel {
    /// Line prefix; warnings and errors are never confused
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Info => "",
            Self::Success => "[ok] ",
            Self::Warning => "[warning] ",
            Self::Error => "[error] ",
        }
    }
}

/// One status line for the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Severity
    pub level: NoticeLevel,
    /// Message without prefix
    pub text: String,
}

impl Notice {
    /// Notice at `level`
    #[must_use]
    pub fn new(level: NoticeLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }

    /// Plain notice
    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, text)
    }

    /// Success notice
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, text)
    }

    /// Advisory notice
    #[must_use]
    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, text)
    }

    /// Rejection notice
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, text)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.level.prefix(), self.text)
    }
}

/// Source of operator input
#[async_trait]
pub trait Prompter: Send {
    /// Show `message` and read one line without its terminator
    ///
    /// With `mask` set the input should not be echoed where the terminal
    /// allows it.
    ///
    /// # Errors
    /// `PromptError::Closed` at end of input.
    async fn read_line(&mut self, message: &str, mask: bool) -> Result<String, PromptError>;

    /// Show a status notice
    fn notify(&mut self, notice: Notice);
}

/// Ask a `(y/N)` question; only `y` or `yes` (any case) counts as yes
///
/// # Errors
/// Propagates the prompter's error.
pub async fn confirm(prompter: &mut dyn Prompter, message: &str) -> Result<bool, PromptError> {
    let answer = prompter.read_line(message, false).await?;
    Ok(is_yes(&answer))
}

pub(crate) fn is_yes(answer: &str) -> bool {
    let answer = answer.trim();
    ["y", "yes", "o", "oui"]
        .iter()
        .any(|yes| answer.eq_ignore_ascii_case(yes))
}

/// Coordinates Ctrl-C with masked terminal reads
///
/// A masked read turns terminal echo off and only the blocked reading thread
/// turns it back on. An interrupt that arrives during such a read is
/// deferred: the read runs to completion and then fails with
/// [`PromptError::Interrupted`].
#[derive(Debug, Clone, Default)]
pub struct InterruptGate {
    state: Arc<Mutex<GateState>>,
}

#[derive(Debug, Default)]
struct GateState {
    masked_read: bool,
    pending: bool,
}

impl InterruptGate {
    /// Gate with no read open
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an operator interrupt
    ///
    /// Returns `true` when a masked read is in progress and the interrupt
    /// will surface once it returns; `false` when the caller may stop now.
    #[must_use]
    pub fn interrupt(&self) -> bool {
        let mut state = self.lock();
        state.pending = state.masked_read;
        state.masked_read
    }

    /// Whether a masked read is blocked right now
    #[must_use]
    pub fn masked_read_active(&self) -> bool {
        self.lock().masked_read
    }

    fn begin_masked_read(&self) -> MaskedRead<'_> {
        self.lock().masked_read = true;
        MaskedRead { gate: self }
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Open masked read; settles any deferred interrupt when finished
struct MaskedRead<'a> {
    gate: &'a InterruptGate,
}

impl MaskedRead<'_> {
    fn finish(self, result: Result<String, PromptError>) -> Result<String, PromptError> {
        let pending = std::mem::take(&mut self.gate.lock().pending);
        if pending {
            Err(PromptError::Interrupted)
        } else {
            result
        }
    }
}

impl Drop for MaskedRead<'_> {
    fn drop(&mut self) {
        self.gate.lock().masked_read = false;
    }
}

/// Prompter on the process's stdin/stdout
///
/// Masked reads go through `rpassword` when stdin is a terminal. Piped input
/// and unmasked prompts use a plain line read.
#[derive(Debug, Clone, Default)]
pub struct TerminalPrompter {
    gate: InterruptGate,
}

impl TerminalPrompter {
    /// Prompter on stdin/stdout
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for the signal listener
    #[must_use]
    pub fn interrupt_gate(&self) -> InterruptGate {
        self.gate.clone()
    }
}

#[async_trait]
impl Prompter for TerminalPrompter {
    async fn read_line(&mut self, message: &str, mask: bool) -> Result<String, PromptError> {
        let message = message.to_string();
        let masked = mask && std::io::stdin().is_terminal();
        if !masked {
            return tokio::task::spawn_blocking(move || read_blocking(&message, false))
                .await
                .map_err(|e| PromptError::Io(std::io::Error::other(e)))?;
        }

        let read = self.gate.begin_masked_read();
        let result = tokio::task::spawn_blocking(move || read_blocking(&message, true))
            .await
            .map_err(|e| PromptError::Io(std::io::Error::other(e)))
            .and_then(|r| r);
        read.finish(result)
    }

    fn notify(&mut self, notice: Notice) {
        println!("{notice}");
    }
}

fn read_blocking(message: &str, masked: bool) -> Result<String, PromptError> {
    if masked {
        return match rpassword::prompt_password(message) {
            Ok(line) => Ok(line),
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Err(PromptError::Closed),
            Err(e) => Err(PromptError::Io(e)),
        };
    }

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(message.as_bytes())?;
    stdout.flush()?;
    drop(stdout);

    let mut line = String::new();
    if std::io::stdin().lock().read_line(&mut line)? == 0 {
        return Err(PromptError::Closed);
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
