//! Domain error taxonomy.
//!
//! Every rule-engine, directory, and report operation fails with a
//! [`CampusError`]. Its [`ErrorKind`] is what the transport layer maps to
//! a response code; the core itself knows nothing about transports.

use campus_store::StoreError;
use serde::Serialize;

/// Coarse classification of a [`CampusError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed, missing, or out-of-range input.
    Validation,
    /// A referenced record does not exist.
    NotFound,
    /// A uniqueness rule would be violated.
    Conflict,
    /// The causal order register -> attend -> feedback was not respected.
    Precondition,
    /// Unexpected store failure.
    Internal,
}

impl ErrorKind {
    /// Stable snake-case name of the kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Precondition => "precondition",
            Self::Internal => "internal",
        }
    }
}

/// Errors returned by campus operations. All are terminal for the request.
#[derive(Debug, thiserror::Error)]
pub enum CampusError {
    /// Input failed validation before any store access.
    #[error("validation error: {0}")]
    Validation(String),

    /// A referenced record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Duplicate email or duplicate registration.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Attendance without registration, or feedback without present
    /// attendance.
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// The store failed unexpectedly.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CampusError {
    /// Classification used by the transport layer.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Precondition(_) => ErrorKind::Precondition,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// The message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(m)
            | Self::NotFound(m)
            | Self::Conflict(m)
            | Self::Precondition(m)
            | Self::Internal(m) => m,
        }
    }
}

impl From<StoreError> for CampusError {
    fn from(err: StoreError) -> Self {
        match err {
            // A concurrent writer beat our own uniqueness check.
            StoreError::Conflict(message) => Self::Conflict(message),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for CampusError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .to_string()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("; ");
        Self::Validation(message)
    }
}
