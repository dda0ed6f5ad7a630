// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Pure field validation.
//!
//! These functions check structural constraints only. Uniqueness
//! (sequence numbers, plant codes, emails) requires context and is
//! enforced by the persistence layer's unique indexes.

use crate::error::DomainError;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Validates that a required text field is non-empty.
///
/// # Errors
///
/// Returns `DomainError::InvalidField` if the trimmed value is empty.
pub fn validate_required_text(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::InvalidField {
            field: field.to_string(),
            message: "must not be empty".to_string(),
        });
    }
    Ok(())
}

/// Validates an acting-user string carried on a mutating request.
///
/// # Errors
///
/// Returns `DomainError::EmptyActor` if the actor is empty.
pub fn validate_actor(actor: &str) -> Result<(), DomainError> {
    if actor.trim().is_empty() {
        return Err(DomainError::EmptyActor);
    }
    Ok(())
}

/// Validates an audit score.
///
/// # Arguments
///
/// * `score` - The score recorded when audit fieldwork completes
///
/// # Errors
///
/// Returns `DomainError::InvalidScore` if the score is outside 0-100.
pub fn validate_score(score: i32) -> Result<(), DomainError> {
    if !(0..=100).contains(&score) {
        return Err(DomainError::InvalidScore { score });
    }
    Ok(())
}

/// Validates a short reference code (plant or department).
///
/// # Errors
///
/// Returns `DomainError::InvalidField` if the code is empty or contains
/// whitespace.
pub fn validate_code(field: &str, value: &str) -> Result<(), DomainError> {
    validate_required_text(field, value)?;
    if value.chars().any(char::is_whitespace) {
        return Err(DomainError::InvalidField {
            field: field.to_string(),
            message: "must not contain whitespace".to_string(),
        });
    }
    Ok(())
}

/// Validates the structural shape of an email address.
///
/// This is not RFC-complete; it rejects the obviously malformed
/// (missing `@`, empty local part or domain).
///
/// # Errors
///
/// Returns `DomainError::InvalidField` if the email is malformed.
pub fn validate_email(email: &str) -> Result<(), DomainError> {
    let malformed = match email.split_once('@') {
        Some((local, domain)) => local.is_empty() || domain.is_empty() || domain.contains('@'),
        None => true,
    };
    if malformed {
        return Err(DomainError::InvalidField {
            field: "email".to_string(),
            message: format!("'{email}' is not a valid email address"),
        });
    }
    Ok(())
}

/// Parses an ISO-8601 calendar date (`YYYY-MM-DD`).
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the string does not parse.
pub fn parse_date(value: &str) -> Result<time::Date, DomainError> {
    time::Date::parse(
        value,
        time::macros::format_description!("[year]-[month]-[day]"),
    )
    .map_err(|e| DomainError::DateParseError {
        date_string: value.to_string(),
        error: e.to_string(),
    })
}

/// Parses an RFC 3339 timestamp.
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the string does not parse.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, DomainError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|e| DomainError::DateParseError {
        date_string: value.to_string(),
        error: e.to_string(),
    })
}

/// Validates a permit validity window.
///
/// Both bounds must be RFC 3339 timestamps and the start must be
/// strictly before the end.
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if either bound does not parse,
/// or `DomainError::InvalidDateRange` if the window is empty or inverted.
pub fn validate_validity_window(valid_from: &str, valid_to: &str) -> Result<(), DomainError> {
    let start: OffsetDateTime = parse_timestamp(valid_from)?;
    let end: OffsetDateTime = parse_timestamp(valid_to)?;

    // Rule: the window must have positive duration
    if start >= end {
        return Err(DomainError::InvalidDateRange {
            start: valid_from.to_string(),
            end: valid_to.to_string(),
        });
    }
    Ok(())
}
