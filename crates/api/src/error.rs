// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::csv_import::CsvImportError;
use sitesafe::CoreError;
use sitesafe_domain::DomainError;
use sitesafe_persistence::PersistenceError;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The input collides with existing data.
    Conflict {
        /// The type of resource the input collides with.
        resource_type: String,
        /// A human-readable description of the collision.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Conflict {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} conflict: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<CsvImportError> for ApiError {
    fn from(err: CsvImportError) -> Self {
        Self::InvalidInput {
            field: String::from("csv_text"),
            message: err.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidStatusTransition {
            entity,
            from,
            to,
            reason,
        } => ApiError::DomainRuleViolation {
            rule: String::from("status_lifecycle"),
            message: format!("Invalid {entity} status transition from '{from}' to '{to}': {reason}"),
        },
        DomainError::UnknownStatus { entity, value } => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("Unknown {entity} status: '{value}'"),
        },
        DomainError::UnknownKind { kind, value } => {
            let field: &str = match kind.as_str() {
                "priority" => "priority",
                "severity" => "severity",
                _ => "kind",
            };
            ApiError::InvalidInput {
                field: String::from(field),
                message: format!("Unknown {kind}: '{value}'"),
            }
        }
        DomainError::InvalidField { field, message } => ApiError::InvalidInput { field, message },
        DomainError::InvalidScore { score } => ApiError::InvalidInput {
            field: String::from("score"),
            message: format!("Invalid audit score: {score}. Must be between 0 and 100"),
        },
        DomainError::InvalidDateRange { start, end } => ApiError::DomainRuleViolation {
            rule: String::from("validity_window"),
            message: format!("Validity window start ({start}) must be before end ({end})"),
        },
        DomainError::DateParseError { date_string, error } => ApiError::InvalidInput {
            field: String::from("date"),
            message: format!("Failed to parse date '{date_string}': {error}"),
        },
        DomainError::EmptyActor => ApiError::InvalidInput {
            field: String::from("actor"),
            message: String::from("Acting user must not be empty"),
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::StatusDataMismatch { field, message } => {
            ApiError::InvalidInput { field, message }
        }
    }
}

/// Translates a persistence error into an API error.
///
/// Uniqueness and referential-integrity failures surface with their own
/// statuses; everything else is internal. Callers that can name the
/// colliding resource should pre-check and produce a contextual
/// `Conflict` instead of relying on this fallback.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: String::from("Resource"),
            message,
        },
        PersistenceError::UniqueViolation(message) => ApiError::Conflict {
            resource_type: String::from("Resource"),
            message,
        },
        PersistenceError::ForeignKeyViolation(message) => ApiError::DomainRuleViolation {
            rule: String::from("referential_integrity"),
            message,
        },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}
