//! Structured error types shared across ORC crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`OrcError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (identifiers, sizes, etc.).
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
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the curvature and surgery pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum OrcError {
    /// Unknown node or hyperedge referenced, or malformed structural input.
    #[error("structural error: {0}")]
    Structural(ErrorInfo),
    /// Two distributions handed to a transport call carry different total mass.
    #[error("mass mismatch: {0}")]
    MassMismatch(ErrorInfo),
    /// The transportation program was infeasible or the backend gave up.
    #[error("solver failure: {0}")]
    Solver(ErrorInfo),
    /// Invalid or unreadable configuration.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Filesystem or tabular artifact failures.
    #[error("artifact error: {0}")]
    Artifact(ErrorInfo),
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

impl OrcError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            OrcError::Structural(info)
            | OrcError::MassMismatch(info)
            | OrcError::Solver(info)
            | OrcError::Config(info)
            | OrcError::Artifact(info)
            | OrcError::Serde(info) => info,
        }
    }

    /// Returns the stable error code.
    pub fn code(&self) -> &str {
        &self.info().code
    }

    /// Whether a curvature aggregation may skip the failing pair and continue.
    pub fn skips_pair(&self) -> bool {
        matches!(self, OrcError::MassMismatch(_) | OrcError::Solver(_))
    }

    /// Adds a context entry to the payload regardless of family.
    pub fn with_context(self, key: impl Into<String>, value: impl ToString) -> Self {
        match self {
            OrcError::Structural(info) => OrcError::Structural(info.with_context(key, value)),
            OrcError::MassMismatch(info) => OrcError::MassMismatch(info.with_context(key, value)),
            OrcError::Solver(info) => OrcError::Solver(info.with_context(key, value)),
            OrcError::Config(info) => OrcError::Config(info.with_context(key, value)),
            OrcError::Artifact(info) => OrcError::Artifact(info.with_context(key, value)),
            OrcError::Serde(info) => OrcError::Serde(info.with_context(key, value)),
        }
    }
}
