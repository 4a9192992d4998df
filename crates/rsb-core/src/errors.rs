//! Structured error types shared across restruc-bench crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`RsbError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (line numbers, ids, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the benchmark harness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum RsbError {
    /// Struct layout and fingerprint errors.
    #[error("layout error: {0}")]
    Layout(ErrorInfo),
    /// Malformed recovery output.
    #[error("parse error: {0}")]
    Parse(ErrorInfo),
    /// Invalid generator options or generation failures.
    #[error("generate error: {0}")]
    Generate(ErrorInfo),
    /// Scoring errors.
    #[error("eval error: {0}")]
    Eval(ErrorInfo),
    /// Filesystem and subprocess errors.
    #[error("io error: {0}")]
    Io(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl RsbError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            RsbError::Layout(info)
            | RsbError::Parse(info)
            | RsbError::Generate(info)
            | RsbError::Eval(info)
            | RsbError::Io(info)
            | RsbError::Serde(info) => info,
        }
    }

    /// Wraps an I/O failure, recording the path it concerned.
    pub fn io(path: impl AsRef<std::path::Path>, err: std::io::Error) -> Self {
        RsbError::Io(
            ErrorInfo::new("io", err.to_string())
                .with_context("path", path.as_ref().display().to_string()),
        )
    }
}

impl From<serde_json::Error> for RsbError {
    fn from(err: serde_json::Error) -> Self {
        RsbError::Serde(ErrorInfo::new("json", err.to_string()))
    }
}
