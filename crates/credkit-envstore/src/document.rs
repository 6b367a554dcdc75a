//! Line-oriented model of an environment file
//!
//! Only `KEY=VALUE` lines whose key is uppercase letters and underscores are
//! understood; every other line is carried verbatim. Rendering an unmodified
//! [`EnvDocument`] gives back the bytes it was parsed from.

use crate::session::SessionConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static ASSIGNMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z_]+)=(.*)$").expect("assignment pattern is valid"));

/// One line of an environment file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvLine {
    /// Any non-assignment, non-empty line, kept as written
    Comment(String),
    /// Empty line
    Blank,
    /// `KEY=VALUE`
    Assignment {
        /// Uppercase key
        key: String,
        /// Everything after the first `=`, unquoted and untrimmed
        value: String,
    },
}

impl EnvLine {
    /// Classify a single line (without its terminator)
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::Blank;
        }
        match ASSIGNMENT.captures(raw) {
            Some(caps) => Self::Assignment {
                key: caps[1].to_string(),
                value: caps[2].to_string(),
            },
            None => Self::Comment(raw.to_string()),
        }
    }

    /// Key if this is an assignment
    #[inline]
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Assignment { key, .. } => Some(key),
            _ => None,
        }
    }
}

impl fmt::Display for EnvLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comment(raw) => f.write_str(raw),
            Self::Blank => Ok(()),
            Self::Assignment { key, value } => write!(f, "{key}={value}"),
        }
    }
}

/// Line terminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    CrLf,
}

impl LineEnding {
    /// Terminator bytes
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

/// Parsed environment file
///
/// Each line keeps its own terminator, so files mixing `\n` and `\r\n`
/// render back unchanged. A final line without a terminator stays without
/// one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnvDocument {
    lines: Vec<EnvLine>,
    /// Terminator after each line; same length as `lines`
    endings: Vec<LineEnding>,
    trailing_newline: bool,
}

impl EnvDocument {
    /// Parse file contents
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut lines = Vec::new();
        let mut endings = Vec::new();

        for raw in text.split_inclusive('\n') {
            let (body, ending) = if let Some(body) = raw.strip_suffix("\r\n") {
                (body, LineEnding::CrLf)
            } else if let Some(body) = raw.strip_suffix('\n') {
                (body, LineEnding::Lf)
            } else {
                // Unterminated last line, kept byte for byte
                (raw, endings.last().copied().unwrap_or_default())
            };
            lines.push(EnvLine::parse(body));
            endings.push(ending);
        }

        Self {
            lines,
            endings,
            trailing_newline: text.ends_with('\n'),
        }
    }

    /// Serialize back to file contents
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let last = self.lines.len().saturating_sub(1);
        for (i, (line, ending)) in self.lines.iter().zip(&self.endings).enumerate() {
            out.push_str(&line.to_string());
            if i < last || self.trailing_newline {
                out.push_str(ending.as_str());
            }
        }
        out
    }

    /// Replace values of template assignments present in `values`
    ///
    /// Keys in `values` that the template does not declare are ignored, so
    /// the result always has the template's line count and key set. Applying
    /// the same `values` twice gives the same document.
    #[must_use]
    pub fn merge(mut self, values: &SessionConfig) -> Self {
        let mut replaced = 0usize;
        for line in &mut self.lines {
            if let EnvLine::Assignment { key, value } = line {
                if let Some(new_value) = values.get(key) {
                    new_value.clone_into(value);
                    replaced += 1;
                }
            }
        }
        tracing::debug!(replaced, offered = values.len(), "merged values into template");
        self
    }

    /// Assignments as a session, last occurrence of a key winning
    #[must_use]
    pub fn values(&self) -> SessionConfig {
        self.assignments().collect()
    }

    /// Iterate over `(key, value)` pairs in file order
    pub fn assignments(&self) -> impl Iterator<Item = (&str, &str)> {
        self.lines.iter().filter_map(|line| match line {
            EnvLine::Assignment { key, value } => Some((key.as_str(), value.as_str())),
            _ => None,
        })
    }

    /// Value of the first assignment to `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.assignments().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Declared keys in file order (duplicates included)
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().filter_map(EnvLine::key)
    }

    /// Lines in file order
    #[inline]
    #[must_use]
    pub fn lines(&self) -> &[EnvLine] {
        &self.lines
    }

    /// Number of lines
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Terminator of the first line (`Lf` for an empty document)
    #[inline]
    #[must_use]
    pub fn line_ending(&self) -> LineEnding {
        self.endings.first().copied().unwrap_or_default()
    }

    /// Terminator after each line, in file order
    #[inline]
    #[must_use]
    pub fn line_endings(&self) -> &[LineEnding] {
        &self.endings
    }
}

impl fmt::Display for EnvDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
