// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Request DTOs carry everything a mutation needs, including the acting
//! user; server-assigned fields (IDs, sequence numbers, status, audit
//! stamps) never appear in them. All DTOs serialize, so the HTTP layer
//! can extract them directly from JSON bodies and query strings.

use serde::{Deserialize, Deserializer};
use sitesafe_persistence::AuditEventRow;

/// Listing filter, deserializable from a query string.
///
/// List-valued fields (`statuses`, `kinds`, `priorities`, `severities`)
/// accept comma-separated values, e.g. `?statuses=open,in_progress`.
/// Fields that do not apply to an entity are ignored by its service.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SearchFilter {
    /// 1-based page number (default 1).
    pub page: Option<i64>,
    /// Rows per page (default 20, clamped to 1..=100).
    pub page_size: Option<i64>,
    /// Sort column; unknown names fall back to creation time.
    pub sort_by: Option<String>,
    /// Sort direction (default descending).
    pub sort_descending: Option<bool>,
    /// Case-insensitive substring match on title and description.
    pub search: Option<String>,
    /// Restrict to one plant.
    pub plant_id: Option<i64>,
    /// Restrict to one department.
    pub department_id: Option<i64>,
    /// Inclusive lower bound on creation time.
    pub date_from: Option<String>,
    /// Exclusive upper bound on creation time.
    pub date_to: Option<String>,
    /// Restrict to these statuses.
    #[serde(default, deserialize_with = "comma_separated")]
    pub statuses: Vec<String>,
    /// Restrict to these kinds.
    #[serde(default, deserialize_with = "comma_separated")]
    pub kinds: Vec<String>,
    /// Restrict to these priorities (observations only).
    #[serde(default, deserialize_with = "comma_separated")]
    pub priorities: Vec<String>,
    /// Restrict to these severities (incidents only).
    #[serde(default, deserialize_with = "comma_separated")]
    pub severities: Vec<String>,
}

/// Splits a single comma-separated query parameter into a list.
fn comma_separated<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default())
}

/// One page of listing results.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PagedResult<T> {
    /// The rows on this page.
    pub data: Vec<T>,
    /// Total rows matching the filter across all pages.
    pub total_count: i64,
    /// The 1-based page this result holds.
    pub current_page: i64,
    /// The page size used.
    pub page_size: i64,
    /// Total pages for this filter (0 when no rows match).
    pub total_pages: i64,
    /// Whether a later page exists.
    pub has_next_page: bool,
    /// Whether an earlier page exists.
    pub has_previous_page: bool,
}

impl<T> PagedResult<T> {
    /// Assembles a page from its rows and the total match count.
    #[must_use]
    pub fn new(data: Vec<T>, total_count: i64, current_page: i64, page_size: i64) -> Self {
        let total_pages: i64 = sitesafe::total_pages(total_count, page_size);
        Self {
            data,
            total_count,
            current_page,
            page_size,
            total_pages,
            has_next_page: current_page < total_pages,
            has_previous_page: current_page > 1,
        }
    }
}

/// Acting user for a bare deletion request.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeleteRequest {
    /// The acting user.
    pub performed_by: String,
}

/// API request to log a new safety observation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateObservationRequest {
    /// Short description of what was observed.
    pub title: String,
    /// Full narrative.
    pub description: String,
    /// Observation kind (`unsafe_act`, `unsafe_condition`, `near_miss`,
    /// `good_practice`).
    pub kind: String,
    /// Free-text hazard grouping (e.g. "electrical").
    pub hazard_category: String,
    /// Priority (`low`, `medium`, `high`, `critical`).
    pub priority: String,
    /// The plant where the observation was made.
    pub plant_id: i64,
    /// The department concerned.
    pub department_id: i64,
    /// The user who reported it.
    pub reported_by: i64,
    /// The user assigned to resolve it, if any.
    pub assigned_to: Option<i64>,
    /// Resolution due date (`YYYY-MM-DD`), if any.
    pub due_date: Option<String>,
    /// The acting user.
    pub created_by: String,
}

/// Partial update of an observation's editable fields.
///
/// Absent fields are left untouched. Status never moves through this
/// request; use the status change request instead.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UpdateObservationRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub kind: Option<String>,
    pub hazard_category: Option<String>,
    pub priority: Option<String>,
    pub plant_id: Option<i64>,
    pub department_id: Option<i64>,
    pub reported_by: Option<i64>,
    pub assigned_to: Option<i64>,
    pub due_date: Option<String>,
    /// The acting user.
    pub updated_by: String,
}

/// API request to move an observation to a new status.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ObservationStatusRequest {
    /// The target status.
    pub status: String,
    /// Resolution notes; replaces the stored notes when present.
    pub resolution_notes: Option<String>,
    /// Free-text note recorded on the audit event.
    pub note: Option<String>,
    /// The acting user.
    pub performed_by: String,
}

/// API request to report a new incident.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateIncidentRequest {
    /// Short description of the incident.
    pub title: String,
    /// Full narrative.
    pub description: String,
    /// Incident kind (`first_aid`, `lost_time_injury`, `fatality`,
    /// `property_damage`, `environmental`, `near_miss`).
    pub kind: String,
    /// Severity (`minor`, `moderate`, `serious`, `critical`).
    pub severity: String,
    /// The plant where the incident occurred.
    pub plant_id: i64,
    /// The department concerned.
    pub department_id: i64,
    /// When the incident occurred (RFC 3339).
    pub occurred_at: String,
    /// The user who reported it.
    pub reported_by: i64,
    /// The acting user.
    pub created_by: String,
}

/// Partial update of an incident's editable fields.
///
/// Investigation fields (`investigated_by`, `findings`, `root_cause`)
/// move with status transitions, not here.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UpdateIncidentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub kind: Option<String>,
    pub severity: Option<String>,
    pub plant_id: Option<i64>,
    pub department_id: Option<i64>,
    pub occurred_at: Option<String>,
    pub reported_by: Option<i64>,
    /// The acting user.
    pub updated_by: String,
}

/// API request to move an incident to a new status.
///
/// Investigation fields replace the stored values when present and are
/// kept otherwise, so findings survive the move to closed.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IncidentStatusRequest {
    /// The target status.
    pub status: String,
    /// The investigating user.
    pub investigated_by: Option<i64>,
    /// Investigation findings.
    pub findings: Option<String>,
    /// Root cause determination.
    pub root_cause: Option<String>,
    /// Free-text note recorded on the audit event.
    pub note: Option<String>,
    /// The acting user.
    pub performed_by: String,
}

/// API request to schedule a new safety audit.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateSafetyAuditRequest {
    /// Short description of the audit.
    pub title: String,
    /// Scope and methodology narrative.
    pub description: String,
    /// The plant being audited.
    pub plant_id: i64,
    /// The department being audited.
    pub department_id: i64,
    /// The auditing user.
    pub auditor_id: i64,
    /// The planned fieldwork date (`YYYY-MM-DD`).
    pub scheduled_date: String,
    /// The acting user.
    pub created_by: String,
}

/// Partial update of a safety audit's editable fields.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UpdateSafetyAuditRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub plant_id: Option<i64>,
    pub department_id: Option<i64>,
    pub auditor_id: Option<i64>,
    pub scheduled_date: Option<String>,
    /// The acting user.
    pub updated_by: String,
}

/// API request to move a safety audit to a new status.
///
/// A score is required exactly when completing the audit and rejected on
/// every other transition.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SafetyAuditStatusRequest {
    /// The target status.
    pub status: String,
    /// Overall score (0-100), on completion only.
    pub score: Option<i32>,
    /// Findings summary; replaces the stored summary when present.
    pub summary: Option<String>,
    /// Free-text note recorded on the audit event.
    pub note: Option<String>,
    /// The acting user.
    pub performed_by: String,
}

/// API request to draft a new work permit.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreatePermitRequest {
    /// Short description of the work.
    pub title: String,
    /// Full description of the work and its controls.
    pub description: String,
    /// Permit kind (`hot_work`, `confined_space`, `work_at_height`,
    /// `electrical`, `excavation`, `general`).
    pub kind: String,
    /// The plant where the work happens.
    pub plant_id: i64,
    /// The department doing the work.
    pub department_id: i64,
    /// The user requesting the permit.
    pub requested_by: i64,
    /// Start of the validity window (RFC 3339).
    pub valid_from: String,
    /// End of the validity window (RFC 3339), strictly after the start.
    pub valid_to: String,
    /// The workers covered by the permit.
    pub worker_ids: Vec<i64>,
    /// The acting user.
    pub created_by: String,
}

/// Partial update of a permit's editable fields.
///
/// A present `worker_ids` replaces the whole roster. Approval fields
/// move with status transitions, not here.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UpdatePermitRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub kind: Option<String>,
    pub plant_id: Option<i64>,
    pub department_id: Option<i64>,
    pub requested_by: Option<i64>,
    pub valid_from: Option<String>,
    pub valid_to: Option<String>,
    pub worker_ids: Option<Vec<i64>>,
    /// The acting user.
    pub updated_by: String,
}

/// API request to move a permit to a new status.
///
/// `approved_by` is required exactly when entering `approved` and
/// rejected on every other transition. Sending a pending permit back to
/// `draft` clears any recorded approval.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PermitStatusRequest {
    /// The target status.
    pub status: String,
    /// The approving user, on approval only.
    pub approved_by: Option<i64>,
    /// Conditions attached to the approval.
    pub approval_notes: Option<String>,
    /// Free-text note recorded on the audit event.
    pub note: Option<String>,
    /// The acting user.
    pub performed_by: String,
}

/// API request to register a plant.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreatePlantRequest {
    /// Display name.
    pub name: String,
    /// Short unique site code (e.g. "FRK1").
    pub code: String,
    /// The acting user.
    pub created_by: String,
}

/// API request to rename or recode a plant.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UpdatePlantRequest {
    /// Display name.
    pub name: String,
    /// Short unique site code.
    pub code: String,
    /// The acting user.
    pub updated_by: String,
}

/// API request to register a department.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateDepartmentRequest {
    /// Display name.
    pub name: String,
    /// Short unique code (e.g. "MAINT").
    pub code: String,
    /// The acting user.
    pub created_by: String,
}

/// API request to rename or recode a department.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UpdateDepartmentRequest {
    /// Display name.
    pub name: String,
    /// Short unique code.
    pub code: String,
    /// The acting user.
    pub updated_by: String,
}

/// API request to register a user account.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateUserAccountRequest {
    /// Display name.
    pub full_name: String,
    /// Unique email address.
    pub email: String,
    /// Job title, if any.
    pub job_title: Option<String>,
    /// The acting user.
    pub created_by: String,
}

/// API request to update a user account.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UpdateUserAccountRequest {
    /// Display name.
    pub full_name: String,
    /// Unique email address.
    pub email: String,
    /// Job title, if any; `None` clears it.
    pub job_title: Option<String>,
    /// The acting user.
    pub updated_by: String,
}

/// API request to preview a CSV user import.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PreviewUserImportRequest {
    /// The raw CSV content.
    pub csv_text: String,
}

/// API request to import user accounts from CSV.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ImportUsersRequest {
    /// The raw CSV content.
    pub csv_text: String,
    /// The acting user.
    pub performed_by: String,
}

/// One recorded audit event, as exposed by history operations.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AuditEventInfo {
    /// The event's storage identifier.
    pub audit_event_id: i64,
    /// The entity family ("observation", "incident", ...).
    pub entity_kind: String,
    /// The entity's storage identifier.
    pub entity_id: i64,
    /// The acting user.
    pub actor: String,
    /// The verb ("create", "update", "update_status", "delete", "import").
    pub action: String,
    /// Human-readable detail.
    pub details: Option<String>,
    /// Status before the change, for status transitions.
    pub from_status: Option<String>,
    /// Status after the change, for status transitions.
    pub to_status: Option<String>,
    /// Free-text note supplied with the change.
    pub note: Option<String>,
    /// When the event was recorded (RFC 3339).
    pub recorded_at: String,
}

impl From<AuditEventRow> for AuditEventInfo {
    fn from(row: AuditEventRow) -> Self {
        Self {
            audit_event_id: row.audit_event_id,
            entity_kind: row.entity_kind,
            entity_id: row.entity_id,
            actor: row.actor,
            action: row.action,
            details: row.details,
            from_status: row.from_status,
            to_status: row.to_status,
            note: row.note,
            recorded_at: row.recorded_at,
        }
    }
}
