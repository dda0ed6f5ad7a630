// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A status transition not permitted by the entity's lifecycle table.
    InvalidStatusTransition {
        /// The entity family the status belongs to (e.g. "observation").
        entity: String,
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
        /// Why the transition is not allowed.
        reason: String,
    },
    /// A status string that is not a member of the entity's status set.
    UnknownStatus {
        /// The entity family the status belongs to.
        entity: String,
        /// The unrecognized value.
        value: String,
    },
    /// A kind/category string that is not a member of the enumeration.
    UnknownKind {
        /// The enumeration name (e.g. "observation kind", "severity").
        kind: String,
        /// The unrecognized value.
        value: String,
    },
    /// A required field is empty or structurally invalid.
    InvalidField {
        /// The field name.
        field: String,
        /// Description of the violation.
        message: String,
    },
    /// An audit score outside the 0-100 range.
    InvalidScore {
        /// The rejected score.
        score: i32,
    },
    /// A validity window whose start is not strictly before its end.
    InvalidDateRange {
        /// The window start.
        start: String,
        /// The window end.
        end: String,
    },
    /// Failed to parse a date or timestamp from a string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// A mutating operation arrived without an acting user.
    EmptyActor,
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidStatusTransition {
                entity,
                from,
                to,
                reason,
            } => {
                write!(
                    f,
                    "Invalid {entity} status transition from '{from}' to '{to}': {reason}"
                )
            }
            Self::UnknownStatus { entity, value } => {
                write!(f, "Unknown {entity} status: '{value}'")
            }
            Self::UnknownKind { kind, value } => {
                write!(f, "Unknown {kind}: '{value}'")
            }
            Self::InvalidField { field, message } => {
                write!(f, "Invalid {field}: {message}")
            }
            Self::InvalidScore { score } => {
                write!(f, "Invalid audit score: {score}. Must be between 0 and 100")
            }
            Self::InvalidDateRange { start, end } => {
                write!(
                    f,
                    "Invalid validity window: start ({start}) must be before end ({end})"
                )
            }
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::EmptyActor => {
                write!(f, "Acting user must not be empty")
            }
        }
    }
}

impl std::error::Error for DomainError {}
