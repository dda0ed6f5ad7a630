// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! CSV preview and import for bulk user account creation.
//!
//! The preview parses and validates without touching storage; the
//! import runs the same validation and writes only when every row
//! passes. A file that is half good never imports half its rows.

use csv::StringRecord;
use sitesafe::import_event;
use sitesafe_audit::{Actor, AuditEvent, EntityKind, EntityRef};
use sitesafe_domain::{validate_actor, validate_email};
use sitesafe_persistence::{NewAuditEvent, SqlitePersistence};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::handlers::current_timestamp;
use crate::request_response::ImportUsersRequest;

/// File-level CSV failures that reject the whole upload.
///
/// Row-level problems never surface here; the preview reports those per
/// row so the caller can show which lines need fixing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CsvImportError {
    /// The header row could not be read.
    #[error("Failed to read CSV headers: {0}")]
    UnreadableHeader(String),

    /// One or more required columns are absent.
    #[error("Missing required headers: {0}")]
    MissingHeaders(String),
}

/// A single row result from CSV validation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UserImportRow {
    /// The row number (1-based, excluding the header).
    pub row_number: usize,
    /// The parsed full name (if present).
    pub full_name: Option<String>,
    /// The parsed email address (if present).
    pub email: Option<String>,
    /// The parsed job title (if present).
    pub job_title: Option<String>,
    /// The row status.
    pub status: ImportRowStatus,
    /// Zero or more validation errors.
    pub errors: Vec<String>,
}

/// Status of one validated CSV row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportRowStatus {
    /// Row is valid and can be imported.
    Valid,
    /// Row has validation errors and cannot be imported.
    Invalid,
}

/// Result of CSV preview validation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UserImportPreview {
    /// Per-row validation results, in file order.
    pub rows: Vec<UserImportRow>,
    /// Total number of data rows.
    pub total_rows: usize,
    /// Number of valid rows.
    pub valid_count: usize,
    /// Number of invalid rows.
    pub invalid_count: usize,
}

/// Result of a committed import.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UserImportResult {
    /// Number of accounts created.
    pub imported_count: usize,
    /// Ids of the created accounts, in row order.
    pub user_ids: Vec<i64>,
}

/// Required CSV column headers (case-insensitive, normalized).
const REQUIRED_HEADERS: &[&str] = &["full_name", "email"];

/// Optional job title column, recognized when present.
const JOB_TITLE_HEADER: &str = "job_title";

/// Normalizes a CSV header for case-insensitive, whitespace-tolerant
/// matching.
fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase().replace(' ', "_")
}

/// Validates that all required headers are present in the CSV.
fn validate_headers(headers: &StringRecord) -> Result<HashMap<String, usize>, CsvImportError> {
    let mut header_map: HashMap<String, usize> = HashMap::new();
    for (idx, header) in headers.iter().enumerate() {
        header_map.insert(normalize_header(header), idx);
    }

    let mut missing: Vec<String> = Vec::new();
    for required in REQUIRED_HEADERS {
        if !header_map.contains_key(*required) {
            missing.push(String::from(*required));
        }
    }
    if !missing.is_empty() {
        return Err(CsvImportError::MissingHeaders(missing.join(", ")));
    }
    Ok(header_map)
}

/// Validates one CSV record against the row rules.
fn validate_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
    row_number: usize,
    seen_emails: &HashSet<String>,
) -> UserImportRow {
    let mut errors: Vec<String> = Vec::new();

    let get_field = |name: &str| -> Option<String> {
        header_map
            .get(name)
            .and_then(|&idx| record.get(idx))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };

    let full_name: Option<String> = get_field("full_name");
    if full_name.is_none() {
        errors.push(String::from("full_name: required field is missing or empty"));
    }

    let email: Option<String> = get_field("email");
    match &email {
        Some(value) => {
            if validate_email(value).is_err() {
                errors.push(format!("email: invalid address '{value}'"));
            } else if seen_emails.contains(&value.to_lowercase()) {
                errors.push(format!(
                    "email: duplicate within CSV - '{value}' appears multiple times"
                ));
            }
        }
        None => errors.push(String::from("email: required field is missing or empty")),
    }

    let job_title: Option<String> = get_field(JOB_TITLE_HEADER);

    let status: ImportRowStatus = if errors.is_empty() {
        ImportRowStatus::Valid
    } else {
        ImportRowStatus::Invalid
    };
    UserImportRow {
        row_number,
        full_name,
        email,
        job_title,
        status,
        errors,
    }
}

/// Previews and validates CSV user account data without persisting.
///
/// # Arguments
///
/// * `csv_text` - The raw CSV content as a string
///
/// # Returns
///
/// * `Ok(UserImportPreview)` with per-row validation results
/// * `Err(ApiError)` if the CSV headers are missing or unreadable
///
/// # Errors
///
/// Returns an error only for file-level problems: an unreadable header
/// row or an absent required header. Row-level problems are reported
/// per row in the preview, not as errors.
pub fn preview_user_import(csv_text: &str) -> Result<UserImportPreview, ApiError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(csv_text.as_bytes());

    let headers: StringRecord = reader
        .headers()
        .map_err(|e| CsvImportError::UnreadableHeader(e.to_string()))?
        .clone();
    let header_map: HashMap<String, usize> = validate_headers(&headers)?;

    let mut rows: Vec<UserImportRow> = Vec::new();
    let mut seen_emails: HashSet<String> = HashSet::new();

    for (idx, result) in reader.records().enumerate() {
        let row_number: usize = idx + 1;
        let record: StringRecord = match result {
            Ok(record) => record,
            Err(e) => {
                rows.push(UserImportRow {
                    row_number,
                    full_name: None,
                    email: None,
                    job_title: None,
                    status: ImportRowStatus::Invalid,
                    errors: vec![format!("CSV parse error: {e}")],
                });
                continue;
            }
        };

        let row: UserImportRow = validate_row(&record, &header_map, row_number, &seen_emails);
        if let Some(email) = &row.email {
            seen_emails.insert(email.to_lowercase());
        }
        rows.push(row);
    }

    let total_rows: usize = rows.len();
    let valid_count: usize = rows
        .iter()
        .filter(|row| row.status == ImportRowStatus::Valid)
        .count();
    let invalid_count: usize = total_rows - valid_count;

    Ok(UserImportPreview {
        rows,
        total_rows,
        valid_count,
        invalid_count,
    })
}

/// Imports user accounts from CSV, all rows or none.
///
/// Runs the same validation as the preview, then checks every email
/// against storage. Nothing is written unless the whole file passes.
/// One import audit event summarizes the batch.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The CSV content and acting user
///
/// # Returns
///
/// * `Ok(UserImportResult)` - Counts and ids of the created accounts
/// * `Err(ApiError)` - If any row is invalid or an email collides
///
/// # Errors
///
/// Returns an error if:
/// - The acting user is empty
/// - The CSV headers are missing or unreadable
/// - Any row fails validation
/// - Any email is already in use by an existing account
/// - The database rejects an insert
pub fn import_users(
    persistence: &mut SqlitePersistence,
    request: ImportUsersRequest,
) -> Result<UserImportResult, ApiError> {
    validate_actor(&request.performed_by).map_err(translate_domain_error)?;
    let preview: UserImportPreview = preview_user_import(&request.csv_text)?;

    if preview.invalid_count > 0 {
        let problems: Vec<String> = preview
            .rows
            .iter()
            .filter(|row| row.status == ImportRowStatus::Invalid)
            .map(|row| {
                let first: &str = row.errors.first().map_or("invalid row", String::as_str);
                format!("row {}: {}", row.row_number, first)
            })
            .collect();
        return Err(ApiError::InvalidInput {
            field: String::from("csv_text"),
            message: problems.join("; "),
        });
    }

    // Storage collisions abort before anything is written.
    for row in &preview.rows {
        if let Some(email) = &row.email
            && persistence
                .email_exists(email, None)
                .map_err(translate_persistence_error)?
        {
            return Err(ApiError::Conflict {
                resource_type: String::from("User account"),
                message: format!("Email '{email}' is already in use"),
            });
        }
    }

    let now: String = current_timestamp()?;
    let mut user_ids: Vec<i64> = Vec::with_capacity(preview.rows.len());
    for row in &preview.rows {
        let (Some(full_name), Some(email)) = (&row.full_name, &row.email) else {
            return Err(ApiError::Internal {
                message: format!(
                    "Row {} passed validation without required fields",
                    row.row_number
                ),
            });
        };
        let user_id: i64 = persistence
            .insert_user_account(full_name, email, row.job_title.clone(), &now)
            .map_err(translate_persistence_error)?;
        user_ids.push(user_id);
    }

    let imported_count: usize = user_ids.len();
    let event: AuditEvent = import_event(
        Actor::new(request.performed_by),
        EntityRef::new(EntityKind::UserAccount, 0),
        format!("Imported {imported_count} user accounts from CSV"),
        &now,
    );
    persistence
        .record_event(&NewAuditEvent::from(&event))
        .map_err(translate_persistence_error)?;

    tracing::info!(imported_count, "Imported user accounts from CSV");

    Ok(UserImportResult {
        imported_count,
        user_ids,
    })
}
