//! Error types for claim-tree parsing and label resolution.

use thiserror::Error;

/// Error codes for document parsing failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// E001: Required field missing
    MissingField,
    /// E002: Field has the wrong JSON type
    UnexpectedType,
    /// E003: Field present but its content is invalid
    InvalidValue,
    /// E004: Response carries no entities
    NoEntities,
    /// E005: Input is not JSON at all
    InvalidJson,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::MissingField => "E001",
            ErrorCode::UnexpectedType => "E002",
            ErrorCode::InvalidValue => "E003",
            ErrorCode::NoEntities => "E004",
            ErrorCode::InvalidJson => "E005",
        }
    }
}

/// A malformed entity document.
///
/// `path` is the dotted JSON path of the object being read when the
/// failure occurred, e.g. `entities.Q42.claims.P31[0].mainsnak`.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("[E001] missing required field `{field}` at {path}")]
    MissingField { path: String, field: &'static str },

    #[error("[E002] expected {expected} at {path}")]
    UnexpectedType { path: String, expected: &'static str },

    #[error("[E003] invalid value at {path}: {reason}")]
    InvalidValue { path: String, reason: String },

    #[error("[E004] document contains no entities")]
    NoEntities,

    #[error("[E005] invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ParseError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ParseError::MissingField { .. } => ErrorCode::MissingField,
            ParseError::UnexpectedType { .. } => ErrorCode::UnexpectedType,
            ParseError::InvalidValue { .. } => ErrorCode::InvalidValue,
            ParseError::NoEntities => ErrorCode::NoEntities,
            ParseError::Json(_) => ErrorCode::InvalidJson,
        }
    }
}

/// Failure of a label lookup behind an entity reference.
///
/// These are never swallowed by the claim tree: they surface from
/// `render` and from every query that renders values.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("lookup transport failed: {0}")]
    Transport(String),

    #[error("lookup returned a malformed document: {0}")]
    Document(#[from] ParseError),

    #[error("entity {id} not found")]
    NotFound { id: String },

    #[error("invalid lookup endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}
