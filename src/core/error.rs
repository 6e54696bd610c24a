//! Error types for the admission engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building the engine from configuration.
///
/// All of these are fatal at startup: an engine that fails to build must not
/// accept submission traffic.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A rule with this name is already registered.
    #[error("duplicate rule name: {0}")]
    DuplicateRule(String),
    /// Configuration names a rule with no bound handler.
    #[error("unknown rule handler: {0}")]
    UnknownRule(String),
    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Category of a policy rejection, carried alongside the human-readable
/// message so the daemon can map rejections onto its own status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCode {
    /// The requested partition does not exist or may not be used.
    InvalidPartition,
    /// A requested resource limit exceeds what policy allows.
    LimitExceeded,
    /// The submitting identity may not perform this submission.
    AccessDenied,
    /// Catch-all policy refusal.
    Denied,
}

impl std::fmt::Display for ViolationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPartition => write!(f, "invalid_partition"),
            Self::LimitExceeded => write!(f, "limit_exceeded"),
            Self::AccessDenied => write!(f, "access_denied"),
            Self::Denied => write!(f, "denied"),
        }
    }
}

/// A rule's explicit refusal of a submission.
///
/// Raised by a handler to halt the chain; the executor attaches the offending
/// rule's name when surfacing it to the daemon. Mutations made by earlier
/// rules in the same chain are not rolled back.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct RuleViolation {
    /// Rejection category.
    pub code: ViolationCode,
    /// Actionable, user-facing explanation of the refusal.
    pub message: String,
}

impl RuleViolation {
    /// Create a violation with the given category and message.
    pub fn new(code: ViolationCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
