//! Error types for the policy engine
//!
//! The engine never errors for "access denied"; a denial is a `false`
//! verdict. Errors here are either a broken rule table
//! ([`ConfigurationError`]) or an entity that could not be shaped into an
//! authorization view ([`ValidationError`]).

use thiserror::Error;

use crate::resources::ResourceType;
use crate::role::Role;

/// Rule table and role resolution failures.
///
/// These are programmer or deployment errors. They are expected to surface
/// at process start when the catalog is validated, never per request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// Role name does not belong to the role enumeration
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// Catalog has no rule list for a role
    #[error("Catalog has no grants for role {0}")]
    MissingRole(Role),

    /// Rule lists no actions and can never match
    #[error("Rule {index} for role {role} has no actions")]
    EmptyActions {
        /// Role owning the rule
        role: Role,
        /// Position of the rule in the role's list
        index: usize,
    },

    /// Same rule declared twice for one role
    #[error("Rule {second} for role {role} duplicates rule {first}")]
    DuplicateRule {
        /// Role owning the rules
        role: Role,
        /// Position of the first declaration
        first: usize,
        /// Position of the repeated declaration
        second: usize,
    },

    /// Allow and deny rules with identical scope; the earlier one is dead
    #[error("Rule {second} for role {role} contradicts rule {first}")]
    ContradictoryRule {
        /// Role owning the rules
        role: Role,
        /// Position of the first declaration
        first: usize,
        /// Position of the contradicting declaration
        second: usize,
    },

    /// Serialized catalog could not be read
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),
}

/// Authorization view construction failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Raw entity is not a JSON object
    #[error("{resource} entity must be an object")]
    NotAnObject {
        /// Resource type being shaped
        resource: ResourceType,
    },

    /// Required authorization field is absent or null
    #[error("{resource} entity is missing required field `{field}`")]
    MissingField {
        /// Resource type being shaped
        resource: ResourceType,
        /// Field name as expected on the entity
        field: &'static str,
    },

    /// Field is present but has the wrong shape
    #[error("{resource} field `{field}` is malformed: {reason}")]
    MalformedField {
        /// Resource type being shaped
        resource: ResourceType,
        /// Field name as expected on the entity
        field: &'static str,
        /// What was wrong with it
        reason: String,
    },

    /// Entity carries a type tag for a different resource
    #[error("Expected a {expected} entity, found {found}")]
    TypeMismatch {
        /// Resource type being shaped
        expected: ResourceType,
        /// Type tag found on the entity
        found: String,
    },
}

/// Policy engine error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// Broken rule table or unknown role
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Malformed resource entity
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Result type for policy engine operations.
pub type PolicyResult<T> = Result<T, PolicyError>;

impl PolicyError {
    /// Check if this error should be logged at error level.
    ///
    /// Validation errors come from request data and are expected.
    pub fn is_server_error(&self) -> bool {
        matches!(self, PolicyError::Configuration(_))
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            PolicyError::Configuration(_) => 500,
            PolicyError::Validation(_) => 400,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            PolicyError::Configuration(_) => "CONFIGURATION_ERROR",
            PolicyError::Validation(_) => "VALIDATION_ERROR",
        }
    }
}
