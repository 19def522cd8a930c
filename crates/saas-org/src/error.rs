//! Error types for organization services
//!
//! A policy denial surfaces here as [`OrgError::Forbidden`]; the policy
//! engine itself only returns verdicts.

use saas_auth::PolicyError;
use thiserror::Error;

/// Organization service error types.
#[derive(Debug, Error)]
pub enum OrgError {
    /// Caller is not a member of the organization
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Caller's role does not permit the action
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Request is well-formed but conflicts with current state
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Organization, project or member does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Policy engine configuration or view validation failure
    #[error(transparent)]
    Policy(#[from] PolicyError),
}

/// Result type for organization service operations.
pub type OrgResult<T> = Result<T, OrgError>;

impl OrgError {
    /// Check if this error should be logged at error level.
    pub fn is_server_error(&self) -> bool {
        match self {
            OrgError::Policy(e) => e.is_server_error(),
            _ => false,
        }
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            OrgError::Unauthorized(_) => 401,
            OrgError::Forbidden(_) => 403,
            OrgError::BadRequest(_) => 400,
            OrgError::NotFound(_) => 404,
            OrgError::Policy(e) => e.status_code(),
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            OrgError::Unauthorized(_) => "UNAUTHORIZED",
            OrgError::Forbidden(_) => "FORBIDDEN",
            OrgError::BadRequest(_) => "BAD_REQUEST",
            OrgError::NotFound(_) => "NOT_FOUND",
            OrgError::Policy(e) => e.error_code(),
        }
    }
}
