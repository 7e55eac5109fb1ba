//! Structured error types shared across the ntuple crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Code, message and location of a failure.
///
/// Location entries are keyed by what they point at (`event`, `collection`,
/// `line`, `path`, ...) and kept sorted so rendered errors are stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Where the failure happened.
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Suggested fix, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a payload with no location.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Records an arbitrary location entry.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Names the event collection involved.
    pub fn in_collection(self, name: &str) -> Self {
        self.with_context("collection", name)
    }

    /// Records the event number or index.
    pub fn at_event(self, event: impl Display) -> Self {
        self.with_context("event", event)
    }

    /// Records the one-based input line.
    pub fn at_line(self, line: usize) -> Self {
        self.with_context("line", line)
    }

    /// Records the file involved.
    pub fn at_path(self, path: impl Display) -> Self {
        self.with_context("path", path)
    }

    /// Records an expected and an observed value, such as two lengths.
    pub fn expected_found(self, expected: impl Display, found: impl Display) -> Self {
        self.with_context("expected", expected).with_context("found", found)
    }

    /// Sets a suggested fix.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the ntuple pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum NtupError {
    /// Malformed or incomplete event input.
    #[error("input error: {0}")]
    Input(ErrorInfo),
    /// Cell identifier encoding and decoding errors.
    #[error("decode error: {0}")]
    Decode(ErrorInfo),
    /// Invalid analysis configuration.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
    /// Filesystem errors while reading input or writing outputs.
    #[error("io error: {0}")]
    Io(ErrorInfo),
    /// Accumulator misuse or broken output invariants.
    #[error("state error: {0}")]
    State(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        let mut entries = self.context.iter();
        if let Some((key, value)) = entries.next() {
            write!(f, " at {key}={value}")?;
            for (key, value) in entries {
                write!(f, " {key}={value}")?;
            }
        }
        if let Some(hint) = &self.hint {
            write!(f, "; hint: {hint}")?;
        }
        Ok(())
    }
}

impl NtupError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            NtupError::Input(info)
            | NtupError::Decode(info)
            | NtupError::Config(info)
            | NtupError::Serde(info)
            | NtupError::Io(info)
            | NtupError::State(info) => info,
        }
    }

    /// Wraps an I/O failure, recording the offending path.
    pub fn io(code: &str, path: impl Display, err: impl ToString) -> Self {
        NtupError::Io(ErrorInfo::new(code, err.to_string()).at_path(path))
    }
}
