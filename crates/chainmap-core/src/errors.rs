//! Structured error types shared across the chainmap crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`ChainError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (identifiers, counts, endpoints).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }
}

/// Canonical error type for the chainmap workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum ChainError {
    /// Graph construction errors (malformed source records).
    #[error("build error: {0}")]
    Build(ErrorInfo),
    /// Configuration loading and validation errors.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Collaborator transport errors (source or target service).
    #[error("transport error: {0}")]
    Transport(ErrorInfo),
    /// Serialization and wire format errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

/// Renders as `code: message` followed by the context entries as
/// space-separated `key=value` fields, the same shape the tracing output
/// uses, so log lines stay grep-able by code or by field.
impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        for (key, value) in &self.context {
            write!(f, " {key}={value}")?;
        }
        Ok(())
    }
}

impl ChainError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            ChainError::Build(info)
            | ChainError::Config(info)
            | ChainError::Transport(info)
            | ChainError::Serde(info) => info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_renders_code_message_and_context_fields() {
        let err = ChainError::Build(
            ErrorInfo::new("invalid-system-id", "system ID too short")
                .with_context("system_id", "123")
                .with_context("link", "wh1"),
        );
        assert_eq!(
            err.to_string(),
            "build error: invalid-system-id: system ID too short link=wh1 system_id=123"
        );
    }

    #[test]
    fn display_without_context_has_no_trailing_fields() {
        let err = ChainError::Config(ErrorInfo::new("missing", "required setting is not set"));
        assert_eq!(
            err.to_string(),
            "config error: missing: required setting is not set"
        );
    }
}
