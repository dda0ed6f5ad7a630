// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-side projections.
//!
//! Storage rows carry foreign keys only; the read surface carries display
//! names next to every person, plant, and department reference. Names are
//! resolved here from lookup maps fetched per page, never stored. A
//! missing referent projects to `None` rather than an error, so a deleted
//! user account never breaks a listing.

use std::collections::HashMap;

use sitesafe_domain::{
    Department, Incident, Observation, Permit, Plant, SafetyAudit, StatusLifecycle, UserAccount,
};

/// Display-name lookup tables for one projection pass.
///
/// Built once per page from the referenced ids, then shared across every
/// row on the page.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    /// Plant id to plant name.
    pub plants: HashMap<i64, String>,
    /// Department id to department name.
    pub departments: HashMap<i64, String>,
    /// User id to full name.
    pub users: HashMap<i64, String>,
}

impl NameIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn plant_name(&self, id: i64) -> Option<String> {
        self.plants.get(&id).cloned()
    }

    fn department_name(&self, id: i64) -> Option<String> {
        self.departments.get(&id).cloned()
    }

    fn user_name(&self, id: i64) -> Option<String> {
        self.users.get(&id).cloned()
    }

    fn optional_user_name(&self, id: Option<i64>) -> Option<String> {
        id.and_then(|id| self.user_name(id))
    }
}

/// Observation read DTO with display names resolved.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ObservationInfo {
    /// The observation's row id.
    pub observation_id: i64,
    /// The server-assigned ticket number (`OBS-YYYY-NNNN`).
    pub ticket_number: String,
    pub title: String,
    pub description: String,
    /// The observation kind (snake_case wire name).
    pub kind: String,
    pub hazard_category: String,
    /// The priority (snake_case wire name).
    pub priority: String,
    /// Target hours to resolution for the priority.
    pub sla_hours: u32,
    /// The current status (snake_case wire name).
    pub status: String,
    pub plant_id: i64,
    /// The plant's display name, when the plant still exists.
    pub plant_name: Option<String>,
    pub department_id: i64,
    pub department_name: Option<String>,
    pub reported_by: i64,
    pub reported_by_name: Option<String>,
    pub assigned_to: Option<i64>,
    pub assigned_to_name: Option<String>,
    pub due_date: Option<String>,
    pub resolution_notes: Option<String>,
    pub closed_at: Option<String>,
    pub created_at: String,
    pub created_by: String,
    pub updated_at: String,
    pub updated_by: String,
}

/// Projects an observation onto its read DTO.
#[must_use]
pub fn project_observation(observation: &Observation, names: &NameIndex) -> ObservationInfo {
    ObservationInfo {
        observation_id: observation.observation_id.unwrap_or_default(),
        ticket_number: observation.ticket_number.clone(),
        title: observation.title.clone(),
        description: observation.description.clone(),
        kind: observation.kind.as_str().to_string(),
        hazard_category: observation.hazard_category.clone(),
        priority: observation.priority.as_str().to_string(),
        sla_hours: observation.priority.sla_hours(),
        status: observation.status.as_str().to_string(),
        plant_id: observation.plant_id,
        plant_name: names.plant_name(observation.plant_id),
        department_id: observation.department_id,
        department_name: names.department_name(observation.department_id),
        reported_by: observation.reported_by,
        reported_by_name: names.user_name(observation.reported_by),
        assigned_to: observation.assigned_to,
        assigned_to_name: names.optional_user_name(observation.assigned_to),
        due_date: observation.due_date.clone(),
        resolution_notes: observation.resolution_notes.clone(),
        closed_at: observation.closed_at.clone(),
        created_at: observation.created_at.clone(),
        created_by: observation.created_by.clone(),
        updated_at: observation.updated_at.clone(),
        updated_by: observation.updated_by.clone(),
    }
}

/// Incident read DTO with display names resolved.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IncidentInfo {
    /// The incident's row id.
    pub incident_id: i64,
    /// The server-assigned incident number (`INC-YYYY-NNNN`).
    pub incident_number: String,
    pub title: String,
    pub description: String,
    /// The incident kind (snake_case wire name).
    pub kind: String,
    /// The severity (snake_case wire name).
    pub severity: String,
    /// The current status (snake_case wire name).
    pub status: String,
    pub plant_id: i64,
    pub plant_name: Option<String>,
    pub department_id: i64,
    pub department_name: Option<String>,
    /// When the incident occurred (RFC 3339 UTC).
    pub occurred_at: String,
    pub reported_by: i64,
    pub reported_by_name: Option<String>,
    pub investigated_by: Option<i64>,
    pub investigated_by_name: Option<String>,
    pub findings: Option<String>,
    pub root_cause: Option<String>,
    pub closed_at: Option<String>,
    pub created_at: String,
    pub created_by: String,
    pub updated_at: String,
    pub updated_by: String,
}

/// Projects an incident onto its read DTO.
#[must_use]
pub fn project_incident(incident: &Incident, names: &NameIndex) -> IncidentInfo {
    IncidentInfo {
        incident_id: incident.incident_id.unwrap_or_default(),
        incident_number: incident.incident_number.clone(),
        title: incident.title.clone(),
        description: incident.description.clone(),
        kind: incident.kind.as_str().to_string(),
        severity: incident.severity.as_str().to_string(),
        status: incident.status.as_str().to_string(),
        plant_id: incident.plant_id,
        plant_name: names.plant_name(incident.plant_id),
        department_id: incident.department_id,
        department_name: names.department_name(incident.department_id),
        occurred_at: incident.occurred_at.clone(),
        reported_by: incident.reported_by,
        reported_by_name: names.user_name(incident.reported_by),
        investigated_by: incident.investigated_by,
        investigated_by_name: names.optional_user_name(incident.investigated_by),
        findings: incident.findings.clone(),
        root_cause: incident.root_cause.clone(),
        closed_at: incident.closed_at.clone(),
        created_at: incident.created_at.clone(),
        created_by: incident.created_by.clone(),
        updated_at: incident.updated_at.clone(),
        updated_by: incident.updated_by.clone(),
    }
}

/// Safety audit read DTO with display names resolved.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SafetyAuditInfo {
    /// The audit's row id.
    pub audit_id: i64,
    /// The server-assigned audit number (`AUD-YYYY-NNNN`).
    pub audit_number: String,
    pub title: String,
    pub description: String,
    /// The current status (snake_case wire name).
    pub status: String,
    pub plant_id: i64,
    pub plant_name: Option<String>,
    pub department_id: i64,
    pub department_name: Option<String>,
    pub auditor_id: i64,
    pub auditor_name: Option<String>,
    /// The planned date (`YYYY-MM-DD`).
    pub scheduled_date: String,
    pub completed_at: Option<String>,
    /// The recorded score (0-100), present once the audit completed.
    pub score: Option<i32>,
    pub summary: Option<String>,
    pub closed_at: Option<String>,
    pub created_at: String,
    pub created_by: String,
    pub updated_at: String,
    pub updated_by: String,
}

/// Projects a safety audit onto its read DTO.
#[must_use]
pub fn project_safety_audit(audit: &SafetyAudit, names: &NameIndex) -> SafetyAuditInfo {
    SafetyAuditInfo {
        audit_id: audit.audit_id.unwrap_or_default(),
        audit_number: audit.audit_number.clone(),
        title: audit.title.clone(),
        description: audit.description.clone(),
        status: audit.status.as_str().to_string(),
        plant_id: audit.plant_id,
        plant_name: names.plant_name(audit.plant_id),
        department_id: audit.department_id,
        department_name: names.department_name(audit.department_id),
        auditor_id: audit.auditor_id,
        auditor_name: names.user_name(audit.auditor_id),
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

/// One authorized worker on a permit.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PermitWorkerInfo {
    pub user_id: i64,
    /// The worker's full name, when the account still exists.
    pub full_name: Option<String>,
}

/// Permit read DTO with display names and the worker roster resolved.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PermitInfo {
    /// The permit's row id.
    pub permit_id: i64,
    /// The server-assigned permit number (`PRM-YYYY-NNNN`).
    pub permit_number: String,
    pub title: String,
    pub description: String,
    /// The permit kind (snake_case wire name).
    pub kind: String,
    /// The current status (snake_case wire name).
    pub status: String,
    pub plant_id: i64,
    pub plant_name: Option<String>,
    pub department_id: i64,
    pub department_name: Option<String>,
    pub requested_by: i64,
    pub requested_by_name: Option<String>,
    pub approved_by: Option<i64>,
    pub approved_by_name: Option<String>,
    pub approved_at: Option<String>,
    pub approval_notes: Option<String>,
    /// Start of the validity window (RFC 3339 UTC).
    pub valid_from: String,
    /// End of the validity window (RFC 3339 UTC).
    pub valid_to: String,
    /// Workers authorized under the permit.
    pub workers: Vec<PermitWorkerInfo>,
    pub closed_at: Option<String>,
    pub created_at: String,
    pub created_by: String,
    pub updated_at: String,
    pub updated_by: String,
}

/// Projects a permit onto its read DTO.
#[must_use]
pub fn project_permit(permit: &Permit, names: &NameIndex) -> PermitInfo {
    let workers: Vec<PermitWorkerInfo> = permit
        .worker_ids
        .iter()
        .map(|&user_id| PermitWorkerInfo {
            user_id,
            full_name: names.user_name(user_id),
        })
        .collect();

    PermitInfo {
        permit_id: permit.permit_id.unwrap_or_default(),
        permit_number: permit.permit_number.clone(),
        title: permit.title.clone(),
        description: permit.description.clone(),
        kind: permit.kind.as_str().to_string(),
        status: permit.status.as_str().to_string(),
        plant_id: permit.plant_id,
        plant_name: names.plant_name(permit.plant_id),
        department_id: permit.department_id,
        department_name: names.department_name(permit.department_id),
        requested_by: permit.requested_by,
        requested_by_name: names.user_name(permit.requested_by),
        approved_by: permit.approved_by,
        approved_by_name: names.optional_user_name(permit.approved_by),
        approved_at: permit.approved_at.clone(),
        approval_notes: permit.approval_notes.clone(),
        valid_from: permit.valid_from.clone(),
        valid_to: permit.valid_to.clone(),
        workers,
        closed_at: permit.closed_at.clone(),
        created_at: permit.created_at.clone(),
        created_by: permit.created_by.clone(),
        updated_at: permit.updated_at.clone(),
        updated_by: permit.updated_by.clone(),
    }
}

/// Plant read DTO.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PlantInfo {
    pub plant_id: i64,
    pub name: String,
    pub code: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Plant> for PlantInfo {
    fn from(plant: &Plant) -> Self {
        Self {
            plant_id: plant.plant_id.unwrap_or_default(),
            name: plant.name.clone(),
            code: plant.code.clone(),
            created_at: plant.created_at.clone(),
            updated_at: plant.updated_at.clone(),
        }
    }
}

/// Department read DTO.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DepartmentInfo {
    pub department_id: i64,
    pub name: String,
    pub code: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Department> for DepartmentInfo {
    fn from(department: &Department) -> Self {
        Self {
            department_id: department.department_id.unwrap_or_default(),
            name: department.name.clone(),
            code: department.code.clone(),
            created_at: department.created_at.clone(),
            updated_at: department.updated_at.clone(),
        }
    }
}

/// User account read DTO.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UserAccountInfo {
    pub user_id: i64,
    pub full_name: String,
    pub email: String,
    pub job_title: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&UserAccount> for UserAccountInfo {
    fn from(user: &UserAccount) -> Self {
        Self {
            user_id: user.user_id.unwrap_or_default(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            job_title: user.job_title.clone(),
            created_at: user.created_at.clone(),
            updated_at: user.updated_at.clone(),
        }
    }
}
