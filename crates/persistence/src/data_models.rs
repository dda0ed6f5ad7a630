// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row and insert types bridging the Diesel schema and the domain model.
//!
//! Queryable `*Row` structs mirror table column order exactly. Conversions
//! back to domain types re-parse stored enum text; a row that fails to
//! parse is reported as `PersistenceError::DataCorruption` rather than
//! silently coerced.

use diesel::prelude::*;

use sitesafe_domain::{
    AuditStatus, Incident, IncidentKind, IncidentStatus, Observation, ObservationKind,
    ObservationStatus, Permit, PermitKind, PermitStatus, Priority, SafetyAudit, Severity,
    StatusLifecycle,
};

use crate::diesel_schema::{audit_events, incidents, observations, permits, safety_audits};
use crate::error::PersistenceError;

/// Queryable row for the `observations` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = observations)]
pub struct ObservationRow {
    pub observation_id: i64,
    pub ticket_number: String,
    pub title: String,
    pub description: String,
    pub kind: String,
    pub hazard_category: String,
    pub priority: String,
    pub status: String,
    pub plant_id: i64,
    pub department_id: i64,
    pub reported_by: i64,
    pub assigned_to: Option<i64>,
    pub due_date: Option<String>,
    pub resolution_notes: Option<String>,
    pub closed_at: Option<String>,
    pub created_at: String,
    pub created_by: String,
    pub updated_at: String,
    pub updated_by: String,
}

impl TryFrom<ObservationRow> for Observation {
    type Error = PersistenceError;

    fn try_from(row: ObservationRow) -> Result<Self, Self::Error> {
        let corrupt = |e: sitesafe_domain::DomainError| {
            PersistenceError::DataCorruption(format!(
                "observations row {}: {e}",
                row.observation_id
            ))
        };
        let kind: ObservationKind = ObservationKind::parse_str(&row.kind).map_err(corrupt)?;
        let priority: Priority = Priority::parse_str(&row.priority).map_err(corrupt)?;
        let status: ObservationStatus =
            ObservationStatus::parse_str(&row.status).map_err(corrupt)?;

        Ok(Self {
            observation_id: Some(row.observation_id),
            ticket_number: row.ticket_number,
            title: row.title,
            description: row.description,
            kind,
            hazard_category: row.hazard_category,
            priority,
            status,
            plant_id: row.plant_id,
            department_id: row.department_id,
            reported_by: row.reported_by,
            assigned_to: row.assigned_to,
            due_date: row.due_date,
            resolution_notes: row.resolution_notes,
            closed_at: row.closed_at,
            created_at: row.created_at,
            created_by: row.created_by,
            updated_at: row.updated_at,
            updated_by: row.updated_by,
        })
    }
}

/// Insertable record for the `observations` table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = observations)]
pub struct NewObservation {
    pub ticket_number: String,
    pub title: String,
    pub description: String,
    pub kind: String,
    pub hazard_category: String,
    pub priority: String,
    pub status: String,
    pub plant_id: i64,
    pub department_id: i64,
    pub reported_by: i64,
    pub assigned_to: Option<i64>,
    pub due_date: Option<String>,
    pub resolution_notes: Option<String>,
    pub closed_at: Option<String>,
    pub created_at: String,
    pub created_by: String,
    pub updated_at: String,
    pub updated_by: String,
}

impl From<&Observation> for NewObservation {
    fn from(obs: &Observation) -> Self {
        Self {
            ticket_number: obs.ticket_number.clone(),
            title: obs.title.clone(),
            description: obs.description.clone(),
            kind: obs.kind.as_str().to_string(),
            hazard_category: obs.hazard_category.clone(),
            priority: obs.priority.as_str().to_string(),
            status: obs.status.as_str().to_string(),
            plant_id: obs.plant_id,
            department_id: obs.department_id,
            reported_by: obs.reported_by,
            assigned_to: obs.assigned_to,
            due_date: obs.due_date.clone(),
            resolution_notes: obs.resolution_notes.clone(),
            closed_at: obs.closed_at.clone(),
            created_at: obs.created_at.clone(),
            created_by: obs.created_by.clone(),
            updated_at: obs.updated_at.clone(),
            updated_by: obs.updated_by.clone(),
        }
    }
}

/// Queryable row for the `incidents` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = incidents)]
pub struct IncidentRow {
    pub incident_id: i64,
    pub incident_number: String,
    pub title: String,
    pub description: String,
    pub kind: String,
    pub severity: String,
    pub status: String,
    pub plant_id: i64,
    pub department_id: i64,
    pub occurred_at: String,
    pub reported_by: i64,
    pub investigated_by: Option<i64>,
    pub findings: Option<String>,
    pub root_cause: Option<String>,
    pub closed_at: Option<String>,
    pub created_at: String,
    pub created_by: String,
    pub updated_at: String,
    pub updated_by: String,
}

impl TryFrom<IncidentRow> for Incident {
    type Error = PersistenceError;

    fn try_from(row: IncidentRow) -> Result<Self, Self::Error> {
        let corrupt = |e: sitesafe_domain::DomainError| {
            PersistenceError::DataCorruption(format!("incidents row {}: {e}", row.incident_id))
        };
        let kind: IncidentKind = IncidentKind::parse_str(&row.kind).map_err(corrupt)?;
        let severity: Severity = Severity::parse_str(&row.severity).map_err(corrupt)?;
        let status: IncidentStatus = IncidentStatus::parse_str(&row.status).map_err(corrupt)?;

        Ok(Self {
            incident_id: Some(row.incident_id),
            incident_number: row.incident_number,
            title: row.title,
            description: row.description,
            kind,
            severity,
            status,
            plant_id: row.plant_id,
            department_id: row.department_id,
            occurred_at: row.occurred_at,
            reported_by: row.reported_by,
            investigated_by: row.investigated_by,
            findings: row.findings,
            root_cause: row.root_cause,
            closed_at: row.closed_at,
            created_at: row.created_at,
            created_by: row.created_by,
            updated_at: row.updated_at,
            updated_by: row.updated_by,
        })
    }
}

/// Insertable record for the `incidents` table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = incidents)]
pub struct NewIncident {
    pub incident_number: String,
    pub title: String,
    pub description: String,
    pub kind: String,
    pub severity: String,
    pub status: String,
    pub plant_id: i64,
    pub department_id: i64,
    pub occurred_at: String,
    pub reported_by: i64,
    pub investigated_by: Option<i64>,
    pub findings: Option<String>,
    pub root_cause: Option<String>,
    pub closed_at: Option<String>,
    pub created_at: String,
    pub created_by: String,
    pub updated_at: String,
    pub updated_by: String,
}

impl From<&Incident> for NewIncident {
    fn from(incident: &Incident) -> Self {
        Self {
            incident_number: incident.incident_number.clone(),
            title: incident.title.clone(),
            description: incident.description.clone(),
            kind: incident.kind.as_str().to_string(),
            severity: incident.severity.as_str().to_string(),
            status: incident.status.as_str().to_string(),
            plant_id: incident.plant_id,
            department_id: incident.department_id,
            occurred_at: incident.occurred_at.clone(),
            reported_by: incident.reported_by,
            investigated_by: incident.investigated_by,
            findings: incident.findings.clone(),
            root_cause: incident.root_cause.clone(),
            closed_at: incident.closed_at.clone(),
            created_at: incident.created_at.clone(),
            created_by: incident.created_by.clone(),
            updated_at: incident.updated_at.clone(),
            updated_by: incident.updated_by.clone(),
        }
    }
}

/// Queryable row for the `safety_audits` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = safety_audits)]
pub struct SafetyAuditRow {
    pub audit_id: i64,
    pub audit_number: String,
    pub title: String,
    pub description: String,
    pub status: String,
    pub plant_id: i64,
    pub department_id: i64,
    pub auditor_id: i64,
    pub scheduled_date: String,
    pub completed_at: Option<String>,
    pub score: Option<i32>,
    pub summary: Option<String>,
    pub closed_at: Option<String>,
    pub created_at: String,
    pub created_by: String,
    pub updated_at: String,
    pub updated_by: String,
}

impl TryFrom<SafetyAuditRow> for SafetyAudit {
    type Error = PersistenceError;

    fn try_from(row: SafetyAuditRow) -> Result<Self, Self::Error> {
        let status: AuditStatus = AuditStatus::parse_str(&row.status).map_err(|e| {
            PersistenceError::DataCorruption(format!("safety_audits row {}: {e}", row.audit_id))
        })?;

        Ok(Self {
            audit_id: Some(row.audit_id),
            audit_number: row.audit_number,
            title: row.title,
            description: row.description,
            status,
            plant_id: row.plant_id,
            department_id: row.department_id,
            auditor_id: row.auditor_id,
            scheduled_date: row.scheduled_date,
            completed_at: row.completed_at,
            score: row.score,
            summary: row.summary,
            closed_at: row.closed_at,
            created_at: row.created_at,
            created_by: row.created_by,
            updated_at: row.updated_at,
            updated_by: row.updated_by,
        })
    }
}

/// Insertable record for the `safety_audits` table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = safety_audits)]
pub struct NewSafetyAudit {
    pub audit_number: String,
    pub title: String,
    pub description: String,
    pub status: String,
    pub plant_id: i64,
    pub department_id: i64,
    pub auditor_id: i64,
    pub scheduled_date: String,
    pub completed_at: Option<String>,
    pub score: Option<i32>,
    pub summary: Option<String>,
    pub closed_at: Option<String>,
    pub created_at: String,
    pub created_by: String,
    pub updated_at: String,
    pub updated_by: String,
}

impl From<&SafetyAudit> for NewSafetyAudit {
    fn from(audit: &SafetyAudit) -> Self {
        Self {
            audit_number: audit.audit_number.clone(),
            title: audit.title.clone(),
            description: audit.description.clone(),
            status: audit.status.as_str().to_string(),
            plant_id: audit.plant_id,
            department_id: audit.department_id,
            auditor_id: audit.auditor_id,
            scheduled_date: audit.scheduled_date.clone(),
            completed_at: audit.completed_at.clone(),
            score: audit.score,
            summary: audit.summary.clone(),
            closed_at: audit.closed_at.clone(),
            created_at: audit.created_at.clone(),
            created_by: audit.created_by.clone(),
            updated_at: audit.updated_at.clone(),
            updated_by: audit.updated_by.clone(),
        }
    }
}

/// Queryable row for the `permits` table.
///
/// Worker ids live in `permit_workers`; [`PermitRow::into_domain`] takes
/// them as an argument so list queries can batch-load workers per page.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = permits)]
pub struct PermitRow {
    pub permit_id: i64,
    pub permit_number: String,
    pub title: String,
    pub description: String,
    pub kind: String,
    pub status: String,
    pub plant_id: i64,
    pub department_id: i64,
    pub requested_by: i64,
    pub approved_by: Option<i64>,
    pub approved_at: Option<String>,
    pub approval_notes: Option<String>,
    pub valid_from: String,
    pub valid_to: String,
    pub closed_at: Option<String>,
    pub created_at: String,
    pub created_by: String,
    pub updated_at: String,
    pub updated_by: String,
}

impl PermitRow {
    /// Converts the row into a domain [`Permit`] with the given worker ids.
    ///
    /// # Errors
    ///
    /// Returns `DataCorruption` if the stored kind or status does not parse.
    pub fn into_domain(self, worker_ids: Vec<i64>) -> Result<Permit, PersistenceError> {
        let corrupt = |e: sitesafe_domain::DomainError| {
            PersistenceError::DataCorruption(format!("permits row {}: {e}", self.permit_id))
        };
        let kind: PermitKind = PermitKind::parse_str(&self.kind).map_err(corrupt)?;
        let status: PermitStatus = PermitStatus::parse_str(&self.status).map_err(corrupt)?;

        Ok(Permit {
            permit_id: Some(self.permit_id),
            permit_number: self.permit_number,
            title: self.title,
            description: self.description,
            kind,
            status,
            plant_id: self.plant_id,
            department_id: self.department_id,
            requested_by: self.requested_by,
            approved_by: self.approved_by,
            approved_at: self.approved_at,
            approval_notes: self.approval_notes,
            valid_from: self.valid_from,
            valid_to: self.valid_to,
            worker_ids,
            closed_at: self.closed_at,
            created_at: self.created_at,
            created_by: self.created_by,
            updated_at: self.updated_at,
            updated_by: self.updated_by,
        })
    }
}

/// Insertable record for the `permits` table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = permits)]
pub struct NewPermit {
    pub permit_number: String,
    pub title: String,
    pub description: String,
    pub kind: String,
    pub status: String,
    pub plant_id: i64,
    pub department_id: i64,
    pub requested_by: i64,
    pub approved_by: Option<i64>,
    pub approved_at: Option<String>,
    pub approval_notes: Option<String>,
    pub valid_from: String,
    pub valid_to: String,
    pub closed_at: Option<String>,
    pub created_at: String,
    pub created_by: String,
    pub updated_at: String,
    pub updated_by: String,
}

impl From<&Permit> for NewPermit {
    fn from(permit: &Permit) -> Self {
        Self {
            permit_number: permit.permit_number.clone(),
            title: permit.title.clone(),
            description: permit.description.clone(),
            kind: permit.kind.as_str().to_string(),
            status: permit.status.as_str().to_string(),
            plant_id: permit.plant_id,
            department_id: permit.department_id,
            requested_by: permit.requested_by,
            approved_by: permit.approved_by,
            approved_at: permit.approved_at.clone(),
            approval_notes: permit.approval_notes.clone(),
            valid_from: permit.valid_from.clone(),
            valid_to: permit.valid_to.clone(),
            closed_at: permit.closed_at.clone(),
            created_at: permit.created_at.clone(),
            created_by: permit.created_by.clone(),
            updated_at: permit.updated_at.clone(),
            updated_by: permit.updated_by.clone(),
        }
    }
}

/// Queryable row for the `audit_events` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = audit_events)]
pub struct AuditEventRow {
    pub audit_event_id: i64,
    pub entity_kind: String,
    pub entity_id: i64,
    pub actor: String,
    pub action: String,
    pub details: Option<String>,
    pub from_status: Option<String>,
    pub to_status: Option<String>,
    pub note: Option<String>,
    pub recorded_at: String,
}

/// Insertable record for the `audit_events` table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = audit_events)]
pub struct NewAuditEvent {
    pub entity_kind: String,
    pub entity_id: i64,
    pub actor: String,
    pub action: String,
    pub details: Option<String>,
    pub from_status: Option<String>,
    pub to_status: Option<String>,
    pub note: Option<String>,
    pub recorded_at: String,
}

impl From<&sitesafe_audit::AuditEvent> for NewAuditEvent {
    fn from(event: &sitesafe_audit::AuditEvent) -> Self {
        let (from_status, to_status) = event
            .change
            .as_ref()
            .map_or((None, None), |c| (c.from.clone(), c.to.clone()));

        Self {
            entity_kind: event.entity.kind.as_str().to_string(),
            entity_id: event.entity.id,
            actor: event.actor.id.clone(),
            action: event.action.name.clone(),
            details: event.action.details.clone(),
            from_status,
            to_status,
            note: event.note.clone(),
            recorded_at: event.recorded_at.clone(),
        }
    }
}

/// Paging and ordering parameters for list queries.
///
/// `sort_by` names a column from the entity's whitelist; unknown or absent
/// names fall back to `created_at`. The row id is always the tiebreak so
/// pages are stable across requests.
#[derive(Debug, Clone)]
pub struct PageSpec {
    pub sort_by: Option<String>,
    pub sort_descending: bool,
    pub limit: i64,
    pub offset: i64,
}

impl Default for PageSpec {
    fn default() -> Self {
        Self {
            sort_by: None,
            sort_descending: true,
            limit: 20,
            offset: 0,
        }
    }
}

/// Filter parameters shared by observation list, count, and statistics
/// queries. `date_from` is inclusive, `date_to` exclusive, both compared
/// against `created_at` as ISO-8601 text.
#[derive(Debug, Clone, Default)]
pub struct ObservationFilter {
    pub plant_id: Option<i64>,
    pub department_id: Option<i64>,
    pub statuses: Vec<String>,
    pub kinds: Vec<String>,
    pub priorities: Vec<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub search: Option<String>,
}

/// Filter parameters for incident queries.
#[derive(Debug, Clone, Default)]
pub struct IncidentFilter {
    pub plant_id: Option<i64>,
    pub department_id: Option<i64>,
    pub statuses: Vec<String>,
    pub kinds: Vec<String>,
    pub severities: Vec<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub search: Option<String>,
}

/// Filter parameters for safety audit queries.
#[derive(Debug, Clone, Default)]
pub struct SafetyAuditFilter {
    pub plant_id: Option<i64>,
    pub department_id: Option<i64>,
    pub statuses: Vec<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub search: Option<String>,
}

/// Filter parameters for permit queries.
#[derive(Debug, Clone, Default)]
pub struct PermitFilter {
    pub plant_id: Option<i64>,
    pub department_id: Option<i64>,
    pub statuses: Vec<String>,
    pub kinds: Vec<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub search: Option<String>,
}

/// Filter parameters for user account queries. `search` matches name or
/// email.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub search: Option<String>,
}
