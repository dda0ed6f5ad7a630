// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Service functions for every SiteSafe operation.
//!
//! Each function is one complete operation: validate the request,
//! verify referents, plan any status movement through the domain
//! tables, persist the result, and record the audit event. The server
//! layer maps these onto HTTP; nothing here knows about HTTP.
//!
//! Absence is a normal outcome, not an error: operations that target
//! one entity return `Ok(None)` when no row exists, and the caller
//! decides how to surface that.

use sitesafe::{
    ApprovalEffect, AuditStatistics, AuditTransitionPlan, DepartmentInfo, IncidentInfo,
    IncidentStatistics, NameIndex, ObservationInfo, ObservationStatistics, PermitInfo,
    PermitStatistics, PermitTransitionPlan, PlantInfo, SafetyAuditInfo, TransitionPlan,
    UserAccountInfo, creation_event, deletion_event, normalize_page, normalize_page_size, offset,
    plan_audit_transition, plan_permit_transition, plan_transition, project_incident,
    project_observation, project_permit, project_safety_audit, status_event, update_event,
};
use sitesafe_audit::{Actor, AuditEvent, EntityKind, EntityRef};
use sitesafe_domain::{
    AUDIT_PREFIX, AuditStatus, Department, DomainError, INCIDENT_PREFIX, Incident, IncidentKind,
    IncidentStatus, OBSERVATION_PREFIX, Observation, ObservationKind, ObservationStatus,
    PERMIT_PREFIX, Permit, PermitKind, PermitStatus, Plant, Priority, SafetyAudit, Severity,
    StatusLifecycle, format_sequence_number, parse_date, parse_timestamp, validate_actor,
    validate_code, validate_email, validate_required_text, validate_validity_window,
};
use sitesafe_persistence::{
    AuditEventRow, IncidentFilter, NewAuditEvent, NewIncident, NewObservation, NewPermit,
    NewSafetyAudit, ObservationFilter, PageSpec, PermitFilter, PersistenceError,
    SafetyAuditFilter, SqlitePersistence, UserFilter,
};
use std::collections::HashSet;

use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::request_response::{
    AuditEventInfo, CreateDepartmentRequest, CreateIncidentRequest, CreateObservationRequest,
    CreatePermitRequest, CreatePlantRequest, CreateSafetyAuditRequest, CreateUserAccountRequest,
    IncidentStatusRequest, ObservationStatusRequest, PagedResult, PermitStatusRequest,
    SafetyAuditStatusRequest, SearchFilter, UpdateDepartmentRequest, UpdateIncidentRequest,
    UpdateObservationRequest, UpdatePermitRequest, UpdatePlantRequest, UpdateSafetyAuditRequest,
    UpdateUserAccountRequest,
};

// ============================================================================
// Shared Helpers
// ============================================================================

/// Current instant as an RFC 3339 UTC timestamp.
pub(crate) fn current_timestamp() -> Result<String, ApiError> {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to format timestamp: {e}"),
        })
}

/// Today's UTC date as `YYYY-MM-DD`, used as the overdue cutoff.
fn today() -> Result<String, ApiError> {
    time::OffsetDateTime::now_utc()
        .date()
        .format(time::macros::format_description!("[year]-[month]-[day]"))
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to format date: {e}"),
        })
}

fn current_year() -> i32 {
    time::OffsetDateTime::now_utc().year()
}

/// Builds the read-side name index used to project entities into DTOs.
fn name_index(persistence: &mut SqlitePersistence) -> Result<NameIndex, ApiError> {
    let mut names: NameIndex = NameIndex::new();
    let plants: Vec<Plant> = persistence.list_plants().map_err(translate_persistence_error)?;
    for plant in plants {
        if let Some(plant_id) = plant.plant_id {
            names.plants.insert(plant_id, plant.name);
        }
    }
    let departments: Vec<Department> = persistence
        .list_departments()
        .map_err(translate_persistence_error)?;
    for department in departments {
        if let Some(department_id) = department.department_id {
            names.departments.insert(department_id, department.name);
        }
    }
    let users: Vec<(i64, String)> =
        persistence.user_names().map_err(translate_persistence_error)?;
    for (user_id, full_name) in users {
        names.users.insert(user_id, full_name);
    }
    Ok(names)
}

fn ensure_plant_exists(
    persistence: &mut SqlitePersistence,
    plant_id: i64,
) -> Result<(), ApiError> {
    if persistence
        .plant_exists(plant_id)
        .map_err(translate_persistence_error)?
    {
        return Ok(());
    }
    Err(ApiError::ResourceNotFound {
        resource_type: String::from("Plant"),
        message: format!("Plant {plant_id} does not exist"),
    })
}

fn ensure_department_exists(
    persistence: &mut SqlitePersistence,
    department_id: i64,
) -> Result<(), ApiError> {
    if persistence
        .department_exists(department_id)
        .map_err(translate_persistence_error)?
    {
        return Ok(());
    }
    Err(ApiError::ResourceNotFound {
        resource_type: String::from("Department"),
        message: format!("Department {department_id} does not exist"),
    })
}

fn ensure_user_exists(persistence: &mut SqlitePersistence, user_id: i64) -> Result<(), ApiError> {
    if persistence
        .user_exists(user_id)
        .map_err(translate_persistence_error)?
    {
        return Ok(());
    }
    Err(ApiError::ResourceNotFound {
        resource_type: String::from("User account"),
        message: format!("User account {user_id} does not exist"),
    })
}

/// Rejects a permit worker roster with repeated entries.
fn ensure_distinct_workers(worker_ids: &[i64]) -> Result<(), ApiError> {
    let mut seen: HashSet<i64> = HashSet::with_capacity(worker_ids.len());
    for worker_id in worker_ids {
        if !seen.insert(*worker_id) {
            return Err(ApiError::InvalidInput {
                field: String::from("worker_ids"),
                message: format!("Worker {worker_id} appears more than once"),
            });
        }
    }
    Ok(())
}

/// Verifies every listed worker has a user account.
fn ensure_workers_exist(
    persistence: &mut SqlitePersistence,
    worker_ids: &[i64],
) -> Result<(), ApiError> {
    if worker_ids.is_empty() {
        return Ok(());
    }
    let existing: Vec<i64> = persistence
        .existing_user_ids(worker_ids)
        .map_err(translate_persistence_error)?;
    let missing: Vec<String> = worker_ids
        .iter()
        .filter(|worker_id| !existing.contains(worker_id))
        .map(ToString::to_string)
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(ApiError::ResourceNotFound {
        resource_type: String::from("User account"),
        message: format!("Worker user accounts do not exist: {}", missing.join(", ")),
    })
}

/// Canonicalizes a list of enum values for filtering, rejecting unknown
/// names before they reach the database.
fn canonical_values<T>(
    values: &[String],
    parse: impl Fn(&str) -> Result<T, DomainError>,
    as_str: impl Fn(&T) -> &'static str,
) -> Result<Vec<String>, ApiError> {
    values
        .iter()
        .map(|value| {
            parse(value)
                .map(|parsed| as_str(&parsed).to_string())
                .map_err(translate_domain_error)
        })
        .collect()
}

fn observation_filter(filter: &SearchFilter) -> Result<ObservationFilter, ApiError> {
    Ok(ObservationFilter {
        plant_id: filter.plant_id,
        department_id: filter.department_id,
        statuses: canonical_values(
            &filter.statuses,
            ObservationStatus::parse_str,
            ObservationStatus::as_str,
        )?,
        kinds: canonical_values(&filter.kinds, ObservationKind::parse_str, ObservationKind::as_str)?,
        priorities: canonical_values(&filter.priorities, Priority::parse_str, Priority::as_str)?,
        date_from: filter.date_from.clone(),
        date_to: filter.date_to.clone(),
        search: filter.search.clone(),
    })
}

fn incident_filter(filter: &SearchFilter) -> Result<IncidentFilter, ApiError> {
    Ok(IncidentFilter {
        plant_id: filter.plant_id,
        department_id: filter.department_id,
        statuses: canonical_values(
            &filter.statuses,
            IncidentStatus::parse_str,
            IncidentStatus::as_str,
        )?,
        kinds: canonical_values(&filter.kinds, IncidentKind::parse_str, IncidentKind::as_str)?,
        severities: canonical_values(&filter.severities, Severity::parse_str, Severity::as_str)?,
        date_from: filter.date_from.clone(),
        date_to: filter.date_to.clone(),
        search: filter.search.clone(),
    })
}

fn safety_audit_filter(filter: &SearchFilter) -> Result<SafetyAuditFilter, ApiError> {
    Ok(SafetyAuditFilter {
        plant_id: filter.plant_id,
        department_id: filter.department_id,
        statuses: canonical_values(&filter.statuses, AuditStatus::parse_str, AuditStatus::as_str)?,
        date_from: filter.date_from.clone(),
        date_to: filter.date_to.clone(),
        search: filter.search.clone(),
    })
}

fn permit_filter(filter: &SearchFilter) -> Result<PermitFilter, ApiError> {
    Ok(PermitFilter {
        plant_id: filter.plant_id,
        department_id: filter.department_id,
        statuses: canonical_values(&filter.statuses, PermitStatus::parse_str, PermitStatus::as_str)?,
        kinds: canonical_values(&filter.kinds, PermitKind::parse_str, PermitKind::as_str)?,
        date_from: filter.date_from.clone(),
        date_to: filter.date_to.clone(),
        search: filter.search.clone(),
    })
}

/// Translates a search filter's paging fields into a query page spec.
fn page_spec(filter: &SearchFilter) -> PageSpec {
    let page: i64 = normalize_page(filter.page);
    let page_size: i64 = normalize_page_size(filter.page_size);
    PageSpec {
        sort_by: filter.sort_by.clone(),
        sort_descending: filter.sort_descending.unwrap_or(true),
        limit: page_size,
        offset: offset(page, page_size),
    }
}

// ============================================================================
// Observations
// ============================================================================

/// Lists observations matching the filter, one page at a time.
///
/// # Errors
///
/// Returns an error if a filter value names an unknown status, kind, or
/// priority, or if the database cannot be queried.
pub fn list_observations(
    persistence: &mut SqlitePersistence,
    filter: &SearchFilter,
) -> Result<PagedResult<ObservationInfo>, ApiError> {
    let entity_filter: ObservationFilter = observation_filter(filter)?;
    let page: PageSpec = page_spec(filter);
    let (observations, total_count) = persistence
        .list_observations(&entity_filter, &page)
        .map_err(translate_persistence_error)?;
    let names: NameIndex = name_index(persistence)?;
    let data: Vec<ObservationInfo> = observations
        .iter()
        .map(|observation| project_observation(observation, &names))
        .collect();
    Ok(PagedResult::new(
        data,
        total_count,
        normalize_page(filter.page),
        normalize_page_size(filter.page_size),
    ))
}

/// Retrieves one observation by id, or `None` if it does not exist.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn get_observation(
    persistence: &mut SqlitePersistence,
    observation_id: i64,
) -> Result<Option<ObservationInfo>, ApiError> {
    let Some(observation) = persistence
        .get_observation(observation_id)
        .map_err(translate_persistence_error)?
    else {
        return Ok(None);
    };
    let names: NameIndex = name_index(persistence)?;
    Ok(Some(project_observation(&observation, &names)))
}

/// Logs a new safety observation.
///
/// This function:
/// - Validates the request fields and the acting user
/// - Verifies the plant, department, and user referents exist
/// - Allocates the next `OBS-YYYY-NNNN` ticket number
/// - Persists the observation in its initial status
/// - Records the creation audit event
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The observation to log
///
/// # Returns
///
/// * `Ok(ObservationInfo)` - The stored observation with names resolved
/// * `Err(ApiError)` - If validation fails or a referent is missing
///
/// # Errors
///
/// Returns an error if:
/// - A required field is empty or an enum value is unknown
/// - The due date is not a valid `YYYY-MM-DD` date
/// - The plant, department, or a referenced user does not exist
/// - The database rejects the insert
pub fn create_observation(
    persistence: &mut SqlitePersistence,
    request: CreateObservationRequest,
) -> Result<ObservationInfo, ApiError> {
    validate_actor(&request.created_by).map_err(translate_domain_error)?;
    validate_required_text("title", &request.title).map_err(translate_domain_error)?;
    validate_required_text("description", &request.description).map_err(translate_domain_error)?;
    validate_required_text("hazard_category", &request.hazard_category)
        .map_err(translate_domain_error)?;
    let kind: ObservationKind =
        ObservationKind::parse_str(&request.kind).map_err(translate_domain_error)?;
    let priority: Priority =
        Priority::parse_str(&request.priority).map_err(translate_domain_error)?;
    if let Some(due_date) = &request.due_date {
        parse_date(due_date).map_err(translate_domain_error)?;
    }
    ensure_plant_exists(persistence, request.plant_id)?;
    ensure_department_exists(persistence, request.department_id)?;
    ensure_user_exists(persistence, request.reported_by)?;
    if let Some(assigned_to) = request.assigned_to {
        ensure_user_exists(persistence, assigned_to)?;
    }

    let now: String = current_timestamp()?;
    let year: i32 = current_year();
    let sequence: i64 = persistence
        .next_sequence_value(OBSERVATION_PREFIX, year)
        .map_err(translate_persistence_error)?;
    let ticket_number: String = format_sequence_number(OBSERVATION_PREFIX, year, sequence);

    let observation: Observation = Observation {
        observation_id: None,
        ticket_number,
        title: request.title,
        description: request.description,
        kind,
        hazard_category: request.hazard_category,
        priority,
        status: ObservationStatus::initial(),
        plant_id: request.plant_id,
        department_id: request.department_id,
        reported_by: request.reported_by,
        assigned_to: request.assigned_to,
        due_date: request.due_date,
        resolution_notes: None,
        closed_at: None,
        created_at: now.clone(),
        created_by: request.created_by.clone(),
        updated_at: now.clone(),
        updated_by: request.created_by.clone(),
    };
    let observation_id: i64 = persistence
        .insert_observation(&NewObservation::from(&observation))
        .map_err(translate_persistence_error)?;

    let event: AuditEvent = creation_event(
        Actor::new(request.created_by),
        EntityRef::new(EntityKind::Observation, observation_id),
        format!(
            "Created observation {}: {}",
            observation.ticket_number, observation.title
        ),
        Some(observation.status.as_str()),
        &now,
    );
    persistence
        .record_event(&NewAuditEvent::from(&event))
        .map_err(translate_persistence_error)?;

    load_observation_info(persistence, observation_id)
}

/// Updates an observation's descriptive fields.
///
/// Absent request fields leave the stored values untouched. Status and
/// its coupled closure fields never move here; that is the status
/// operation's job.
///
/// # Errors
///
/// Returns an error if validation fails, a referent is missing, or the
/// database rejects the update.
#[allow(clippy::too_many_lines)]
pub fn update_observation(
    persistence: &mut SqlitePersistence,
    observation_id: i64,
    request: UpdateObservationRequest,
) -> Result<Option<ObservationInfo>, ApiError> {
    validate_actor(&request.updated_by).map_err(translate_domain_error)?;
    let Some(mut observation) = persistence
        .get_observation(observation_id)
        .map_err(translate_persistence_error)?
    else {
        return Ok(None);
    };

    if let Some(title) = request.title {
        validate_required_text("title", &title).map_err(translate_domain_error)?;
        observation.title = title;
    }
    if let Some(description) = request.description {
        validate_required_text("description", &description).map_err(translate_domain_error)?;
        observation.description = description;
    }
    if let Some(kind) = &request.kind {
        observation.kind = ObservationKind::parse_str(kind).map_err(translate_domain_error)?;
    }
    if let Some(hazard_category) = request.hazard_category {
        validate_required_text("hazard_category", &hazard_category)
            .map_err(translate_domain_error)?;
        observation.hazard_category = hazard_category;
    }
    if let Some(priority) = &request.priority {
        observation.priority = Priority::parse_str(priority).map_err(translate_domain_error)?;
    }
    if let Some(plant_id) = request.plant_id {
        ensure_plant_exists(persistence, plant_id)?;
        observation.plant_id = plant_id;
    }
    if let Some(department_id) = request.department_id {
        ensure_department_exists(persistence, department_id)?;
        observation.department_id = department_id;
    }
    if let Some(reported_by) = request.reported_by {
        ensure_user_exists(persistence, reported_by)?;
        observation.reported_by = reported_by;
    }
    if let Some(assigned_to) = request.assigned_to {
        ensure_user_exists(persistence, assigned_to)?;
        observation.assigned_to = Some(assigned_to);
    }
    if let Some(due_date) = request.due_date {
        parse_date(&due_date).map_err(translate_domain_error)?;
        observation.due_date = Some(due_date);
    }

    let now: String = current_timestamp()?;
    observation.updated_at = now.clone();
    observation.updated_by = request.updated_by.clone();

    let rows_affected: usize = persistence
        .update_observation(observation_id, &observation)
        .map_err(translate_persistence_error)?;
    if rows_affected == 0 {
        return Ok(None);
    }

    let event: AuditEvent = update_event(
        Actor::new(request.updated_by),
        EntityRef::new(EntityKind::Observation, observation_id),
        format!("Updated observation {}", observation.ticket_number),
        &now,
    );
    persistence
        .record_event(&NewAuditEvent::from(&event))
        .map_err(translate_persistence_error)?;

    load_observation_info(persistence, observation_id).map(Some)
}

/// Moves an observation to a new status.
///
/// The requested transition is checked against the observation's
/// lifecycle table; entering the terminal status stamps `closed_at`.
/// Resolution notes supplied here replace the stored notes, absent
/// notes keep them.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `observation_id` - The observation to move
/// * `request` - The requested status and coupled fields
///
/// # Returns
///
/// * `Ok(Some(ObservationInfo))` - The observation after the move
/// * `Ok(None)` - If no observation has this id
/// * `Err(ApiError)` - If the transition is not legal
///
/// # Errors
///
/// Returns an error if:
/// - The acting user is empty
/// - The requested status is unknown
/// - The lifecycle table does not allow the transition
/// - The database rejects the update
pub fn update_observation_status(
    persistence: &mut SqlitePersistence,
    observation_id: i64,
    request: ObservationStatusRequest,
) -> Result<Option<ObservationInfo>, ApiError> {
    validate_actor(&request.performed_by).map_err(translate_domain_error)?;
    let Some(observation) = persistence
        .get_observation(observation_id)
        .map_err(translate_persistence_error)?
    else {
        return Ok(None);
    };
    let requested: ObservationStatus =
        ObservationStatus::parse_str(&request.status).map_err(translate_domain_error)?;
    let now: String = current_timestamp()?;
    let plan: TransitionPlan<ObservationStatus> =
        plan_transition(observation.status, requested, &now).map_err(translate_core_error)?;

    // Present request fields replace stored values, absent ones are kept.
    let resolution_notes: Option<String> = request.resolution_notes.or(observation.resolution_notes);
    let rows_affected: usize = persistence
        .update_observation_status(
            observation_id,
            plan.to.as_str(),
            resolution_notes,
            plan.closed_at,
            &now,
            &request.performed_by,
        )
        .map_err(translate_persistence_error)?;
    if rows_affected == 0 {
        return Ok(None);
    }

    let event: AuditEvent = status_event(
        Actor::new(request.performed_by),
        EntityRef::new(EntityKind::Observation, observation_id),
        plan.from.as_str(),
        plan.to.as_str(),
        request.note,
        &now,
    );
    persistence
        .record_event(&NewAuditEvent::from(&event))
        .map_err(translate_persistence_error)?;

    load_observation_info(persistence, observation_id).map(Some)
}

/// Deletes an observation.
///
/// The audit event outlives the row, so it is recorded before the
/// delete and captures the last status.
///
/// # Errors
///
/// Returns an error if the acting user is empty or the database rejects
/// the delete.
pub fn delete_observation(
    persistence: &mut SqlitePersistence,
    observation_id: i64,
    performed_by: &str,
) -> Result<Option<()>, ApiError> {
    validate_actor(performed_by).map_err(translate_domain_error)?;
    let Some(observation) = persistence
        .get_observation(observation_id)
        .map_err(translate_persistence_error)?
    else {
        return Ok(None);
    };

    let now: String = current_timestamp()?;
    let event: AuditEvent = deletion_event(
        Actor::new(performed_by.to_string()),
        EntityRef::new(EntityKind::Observation, observation_id),
        format!("Deleted observation {}", observation.ticket_number),
        Some(observation.status.as_str()),
        &now,
    );
    persistence
        .record_event(&NewAuditEvent::from(&event))
        .map_err(translate_persistence_error)?;

    let rows_affected: usize = persistence
        .delete_observation(observation_id)
        .map_err(translate_persistence_error)?;
    if rows_affected == 0 {
        return Ok(None);
    }
    Ok(Some(()))
}

/// Aggregates observation counts for the dashboard.
///
/// Honors the filter's plant, department, and date-range scope and
/// ignores its paging fields.
///
/// # Errors
///
/// Returns an error if a filter value is unknown or the database cannot
/// be queried.
pub fn observation_statistics(
    persistence: &mut SqlitePersistence,
    filter: &SearchFilter,
) -> Result<ObservationStatistics, ApiError> {
    let entity_filter: ObservationFilter = observation_filter(filter)?;
    let by_status: Vec<(String, i64)> = persistence
        .count_observations_by_status(&entity_filter)
        .map_err(translate_persistence_error)?;
    let by_hazard_category: Vec<(String, i64)> = persistence
        .count_observations_by_hazard_category(&entity_filter)
        .map_err(translate_persistence_error)?;
    let cutoff: String = today()?;
    let overdue: i64 = persistence
        .count_overdue_observations(&entity_filter, &cutoff)
        .map_err(translate_persistence_error)?;
    Ok(sitesafe::observation_statistics(
        &by_status,
        &by_hazard_category,
        overdue,
    ))
}

/// Returns an observation's audit trail, oldest event first.
///
/// Deleted observations keep their trail, so `None` means no row and no
/// events exist for this id.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn observation_history(
    persistence: &mut SqlitePersistence,
    observation_id: i64,
) -> Result<Option<Vec<AuditEventInfo>>, ApiError> {
    let observation: Option<Observation> = persistence
        .get_observation(observation_id)
        .map_err(translate_persistence_error)?;
    let events: Vec<AuditEventRow> = persistence
        .events_for_entity(EntityKind::Observation.as_str(), observation_id)
        .map_err(translate_persistence_error)?;
    if observation.is_none() && events.is_empty() {
        return Ok(None);
    }
    Ok(Some(events.into_iter().map(AuditEventInfo::from).collect()))
}

/// Reloads an observation after a write. Absence here is an internal
/// fault, not a caller-visible not-found.
fn load_observation_info(
    persistence: &mut SqlitePersistence,
    observation_id: i64,
) -> Result<ObservationInfo, ApiError> {
    let Some(observation) = persistence
        .get_observation(observation_id)
        .map_err(translate_persistence_error)?
    else {
        return Err(ApiError::Internal {
            message: format!("Observation {observation_id} missing after write"),
        });
    };
    let names: NameIndex = name_index(persistence)?;
    Ok(project_observation(&observation, &names))
}

// ============================================================================
// Incidents
// ============================================================================

/// Lists incidents matching the filter, one page at a time.
///
/// # Errors
///
/// Returns an error if a filter value names an unknown status, kind, or
/// severity, or if the database cannot be queried.
pub fn list_incidents(
    persistence: &mut SqlitePersistence,
    filter: &SearchFilter,
) -> Result<PagedResult<IncidentInfo>, ApiError> {
    let entity_filter: IncidentFilter = incident_filter(filter)?;
    let page: PageSpec = page_spec(filter);
    let (incidents, total_count) = persistence
        .list_incidents(&entity_filter, &page)
        .map_err(translate_persistence_error)?;
    let names: NameIndex = name_index(persistence)?;
    let data: Vec<IncidentInfo> = incidents
        .iter()
        .map(|incident| project_incident(incident, &names))
        .collect();
    Ok(PagedResult::new(
        data,
        total_count,
        normalize_page(filter.page),
        normalize_page_size(filter.page_size),
    ))
}

/// Retrieves one incident by id, or `None` if it does not exist.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn get_incident(
    persistence: &mut SqlitePersistence,
    incident_id: i64,
) -> Result<Option<IncidentInfo>, ApiError> {
    let Some(incident) = persistence
        .get_incident(incident_id)
        .map_err(translate_persistence_error)?
    else {
        return Ok(None);
    };
    let names: NameIndex = name_index(persistence)?;
    Ok(Some(project_incident(&incident, &names)))
}

/// Reports a new incident.
///
/// This function:
/// - Validates the request fields and the acting user
/// - Verifies the plant, department, and reporter exist
/// - Allocates the next `INC-YYYY-NNNN` incident number
/// - Persists the incident in its initial status
/// - Records the creation audit event
///
/// # Errors
///
/// Returns an error if:
/// - A required field is empty or an enum value is unknown
/// - The occurrence timestamp is not valid RFC 3339
/// - The plant, department, or reporter does not exist
/// - The database rejects the insert
pub fn create_incident(
    persistence: &mut SqlitePersistence,
    request: CreateIncidentRequest,
) -> Result<IncidentInfo, ApiError> {
    validate_actor(&request.created_by).map_err(translate_domain_error)?;
    validate_required_text("title", &request.title).map_err(translate_domain_error)?;
    validate_required_text("description", &request.description).map_err(translate_domain_error)?;
    let kind: IncidentKind =
        IncidentKind::parse_str(&request.kind).map_err(translate_domain_error)?;
    let severity: Severity =
        Severity::parse_str(&request.severity).map_err(translate_domain_error)?;
    parse_timestamp(&request.occurred_at).map_err(translate_domain_error)?;
    ensure_plant_exists(persistence, request.plant_id)?;
    ensure_department_exists(persistence, request.department_id)?;
    ensure_user_exists(persistence, request.reported_by)?;

    let now: String = current_timestamp()?;
    let year: i32 = current_year();
    let sequence: i64 = persistence
        .next_sequence_value(INCIDENT_PREFIX, year)
        .map_err(translate_persistence_error)?;
    let incident_number: String = format_sequence_number(INCIDENT_PREFIX, year, sequence);

    let incident: Incident = Incident {
        incident_id: None,
        incident_number,
        title: request.title,
        description: request.description,
        kind,
        severity,
        status: IncidentStatus::initial(),
        plant_id: request.plant_id,
        department_id: request.department_id,
        occurred_at: request.occurred_at,
        reported_by: request.reported_by,
        investigated_by: None,
        findings: None,
        root_cause: None,
        closed_at: None,
        created_at: now.clone(),
        created_by: request.created_by.clone(),
        updated_at: now.clone(),
        updated_by: request.created_by.clone(),
    };
    let incident_id: i64 = persistence
        .insert_incident(&NewIncident::from(&incident))
        .map_err(translate_persistence_error)?;

    let event: AuditEvent = creation_event(
        Actor::new(request.created_by),
        EntityRef::new(EntityKind::Incident, incident_id),
        format!(
            "Created incident {}: {}",
            incident.incident_number, incident.title
        ),
        Some(incident.status.as_str()),
        &now,
    );
    persistence
        .record_event(&NewAuditEvent::from(&event))
        .map_err(translate_persistence_error)?;

    load_incident_info(persistence, incident_id)
}

/// Updates an incident's descriptive fields.
///
/// Absent request fields leave the stored values untouched. The
/// investigation fields travel with status changes, not here.
///
/// # Errors
///
/// Returns an error if validation fails, a referent is missing, or the
/// database rejects the update.
pub fn update_incident(
    persistence: &mut SqlitePersistence,
    incident_id: i64,
    request: UpdateIncidentRequest,
) -> Result<Option<IncidentInfo>, ApiError> {
    validate_actor(&request.updated_by).map_err(translate_domain_error)?;
    let Some(mut incident) = persistence
        .get_incident(incident_id)
        .map_err(translate_persistence_error)?
    else {
        return Ok(None);
    };

    if let Some(title) = request.title {
        validate_required_text("title", &title).map_err(translate_domain_error)?;
        incident.title = title;
    }
    if let Some(description) = request.description {
        validate_required_text("description", &description).map_err(translate_domain_error)?;
        incident.description = description;
    }
    if let Some(kind) = &request.kind {
        incident.kind = IncidentKind::parse_str(kind).map_err(translate_domain_error)?;
    }
    if let Some(severity) = &request.severity {
        incident.severity = Severity::parse_str(severity).map_err(translate_domain_error)?;
    }
    if let Some(plant_id) = request.plant_id {
        ensure_plant_exists(persistence, plant_id)?;
        incident.plant_id = plant_id;
    }
    if let Some(department_id) = request.department_id {
        ensure_department_exists(persistence, department_id)?;
        incident.department_id = department_id;
    }
    if let Some(occurred_at) = request.occurred_at {
        parse_timestamp(&occurred_at).map_err(translate_domain_error)?;
        incident.occurred_at = occurred_at;
    }
    if let Some(reported_by) = request.reported_by {
        ensure_user_exists(persistence, reported_by)?;
        incident.reported_by = reported_by;
    }

    let now: String = current_timestamp()?;
    incident.updated_at = now.clone();
    incident.updated_by = request.updated_by.clone();

    let rows_affected: usize = persistence
        .update_incident(incident_id, &incident)
        .map_err(translate_persistence_error)?;
    if rows_affected == 0 {
        return Ok(None);
    }

    let event: AuditEvent = update_event(
        Actor::new(request.updated_by),
        EntityRef::new(EntityKind::Incident, incident_id),
        format!("Updated incident {}", incident.incident_number),
        &now,
    );
    persistence
        .record_event(&NewAuditEvent::from(&event))
        .map_err(translate_persistence_error)?;

    load_incident_info(persistence, incident_id).map(Some)
}

/// Moves an incident to a new status.
///
/// Investigation fields supplied with the request replace the stored
/// values; absent fields keep them. Entering the terminal status stamps
/// `closed_at`.
///
/// # Errors
///
/// Returns an error if:
/// - The acting user is empty
/// - The requested status is unknown
/// - The lifecycle table does not allow the transition
/// - A supplied investigator has no user account
/// - The database rejects the update
pub fn update_incident_status(
    persistence: &mut SqlitePersistence,
    incident_id: i64,
    request: IncidentStatusRequest,
) -> Result<Option<IncidentInfo>, ApiError> {
    validate_actor(&request.performed_by).map_err(translate_domain_error)?;
    let Some(incident) = persistence
        .get_incident(incident_id)
        .map_err(translate_persistence_error)?
    else {
        return Ok(None);
    };
    let requested: IncidentStatus =
        IncidentStatus::parse_str(&request.status).map_err(translate_domain_error)?;
    let now: String = current_timestamp()?;
    let plan: TransitionPlan<IncidentStatus> =
        plan_transition(incident.status, requested, &now).map_err(translate_core_error)?;

    if let Some(investigated_by) = request.investigated_by {
        ensure_user_exists(persistence, investigated_by)?;
    }
    let investigated_by: Option<i64> = request.investigated_by.or(incident.investigated_by);
    let findings: Option<String> = request.findings.or(incident.findings);
    let root_cause: Option<String> = request.root_cause.or(incident.root_cause);

    let rows_affected: usize = persistence
        .update_incident_status(
            incident_id,
            plan.to.as_str(),
            investigated_by,
            findings,
            root_cause,
            plan.closed_at,
            &now,
            &request.performed_by,
        )
        .map_err(translate_persistence_error)?;
    if rows_affected == 0 {
        return Ok(None);
    }

    let event: AuditEvent = status_event(
        Actor::new(request.performed_by),
        EntityRef::new(EntityKind::Incident, incident_id),
        plan.from.as_str(),
        plan.to.as_str(),
        request.note,
        &now,
    );
    persistence
        .record_event(&NewAuditEvent::from(&event))
        .map_err(translate_persistence_error)?;

    load_incident_info(persistence, incident_id).map(Some)
}

/// Deletes an incident, recording the audit event before the row goes.
///
/// # Errors
///
/// Returns an error if the acting user is empty or the database rejects
/// the delete.
pub fn delete_incident(
    persistence: &mut SqlitePersistence,
    incident_id: i64,
    performed_by: &str,
) -> Result<Option<()>, ApiError> {
    validate_actor(performed_by).map_err(translate_domain_error)?;
    let Some(incident) = persistence
        .get_incident(incident_id)
        .map_err(translate_persistence_error)?
    else {
        return Ok(None);
    };

    let now: String = current_timestamp()?;
    let event: AuditEvent = deletion_event(
        Actor::new(performed_by.to_string()),
        EntityRef::new(EntityKind::Incident, incident_id),
        format!("Deleted incident {}", incident.incident_number),
        Some(incident.status.as_str()),
        &now,
    );
    persistence
        .record_event(&NewAuditEvent::from(&event))
        .map_err(translate_persistence_error)?;

    let rows_affected: usize = persistence
        .delete_incident(incident_id)
        .map_err(translate_persistence_error)?;
    if rows_affected == 0 {
        return Ok(None);
    }
    Ok(Some(()))
}

/// Aggregates incident counts for the dashboard.
///
/// # Errors
///
/// Returns an error if a filter value is unknown or the database cannot
/// be queried.
pub fn incident_statistics(
    persistence: &mut SqlitePersistence,
    filter: &SearchFilter,
) -> Result<IncidentStatistics, ApiError> {
    let entity_filter: IncidentFilter = incident_filter(filter)?;
    let by_status: Vec<(String, i64)> = persistence
        .count_incidents_by_status(&entity_filter)
        .map_err(translate_persistence_error)?;
    let by_severity: Vec<(String, i64)> = persistence
        .count_incidents_by_severity(&entity_filter)
        .map_err(translate_persistence_error)?;
    let by_kind: Vec<(String, i64)> = persistence
        .count_incidents_by_kind(&entity_filter)
        .map_err(translate_persistence_error)?;
    Ok(sitesafe::incident_statistics(
        &by_status,
        &by_severity,
        &by_kind,
    ))
}

/// Returns an incident's audit trail, oldest event first.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn incident_history(
    persistence: &mut SqlitePersistence,
    incident_id: i64,
) -> Result<Option<Vec<AuditEventInfo>>, ApiError> {
    let incident: Option<Incident> = persistence
        .get_incident(incident_id)
        .map_err(translate_persistence_error)?;
    let events: Vec<AuditEventRow> = persistence
        .events_for_entity(EntityKind::Incident.as_str(), incident_id)
        .map_err(translate_persistence_error)?;
    if incident.is_none() && events.is_empty() {
        return Ok(None);
    }
    Ok(Some(events.into_iter().map(AuditEventInfo::from).collect()))
}

fn load_incident_info(
    persistence: &mut SqlitePersistence,
    incident_id: i64,
) -> Result<IncidentInfo, ApiError> {
    let Some(incident) = persistence
        .get_incident(incident_id)
        .map_err(translate_persistence_error)?
    else {
        return Err(ApiError::Internal {
            message: format!("Incident {incident_id} missing after write"),
        });
    };
    let names: NameIndex = name_index(persistence)?;
    Ok(project_incident(&incident, &names))
}

// ============================================================================
// Safety Audits
// ============================================================================

/// Lists safety audits matching the filter, one page at a time.
///
/// # Errors
///
/// Returns an error if a filter value names an unknown status, or if
/// the database cannot be queried.
pub fn list_safety_audits(
    persistence: &mut SqlitePersistence,
    filter: &SearchFilter,
) -> Result<PagedResult<SafetyAuditInfo>, ApiError> {
    let entity_filter: SafetyAuditFilter = safety_audit_filter(filter)?;
    let page: PageSpec = page_spec(filter);
    let (audits, total_count) = persistence
        .list_safety_audits(&entity_filter, &page)
        .map_err(translate_persistence_error)?;
    let names: NameIndex = name_index(persistence)?;
    let data: Vec<SafetyAuditInfo> = audits
        .iter()
        .map(|audit| project_safety_audit(audit, &names))
        .collect();
    Ok(PagedResult::new(
        data,
        total_count,
        normalize_page(filter.page),
        normalize_page_size(filter.page_size),
    ))
}

/// Retrieves one safety audit by id, or `None` if it does not exist.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn get_safety_audit(
    persistence: &mut SqlitePersistence,
    audit_id: i64,
) -> Result<Option<SafetyAuditInfo>, ApiError> {
    let Some(audit) = persistence
        .get_safety_audit(audit_id)
        .map_err(translate_persistence_error)?
    else {
        return Ok(None);
    };
    let names: NameIndex = name_index(persistence)?;
    Ok(Some(project_safety_audit(&audit, &names)))
}

/// Schedules a new safety audit.
///
/// This function:
/// - Validates the request fields and the acting user
/// - Verifies the plant, department, and auditor exist
/// - Allocates the next `AUD-YYYY-NNNN` audit number
/// - Persists the audit in its initial status
/// - Records the creation audit event
///
/// # Errors
///
/// Returns an error if:
/// - A required field is empty
/// - The scheduled date is not a valid `YYYY-MM-DD` date
/// - The plant, department, or auditor does not exist
/// - The database rejects the insert
pub fn create_safety_audit(
    persistence: &mut SqlitePersistence,
    request: CreateSafetyAuditRequest,
) -> Result<SafetyAuditInfo, ApiError> {
    validate_actor(&request.created_by).map_err(translate_domain_error)?;
    validate_required_text("title", &request.title).map_err(translate_domain_error)?;
    validate_required_text("description", &request.description).map_err(translate_domain_error)?;
    parse_date(&request.scheduled_date).map_err(translate_domain_error)?;
    ensure_plant_exists(persistence, request.plant_id)?;
    ensure_department_exists(persistence, request.department_id)?;
    ensure_user_exists(persistence, request.auditor_id)?;

    let now: String = current_timestamp()?;
    let year: i32 = current_year();
    let sequence: i64 = persistence
        .next_sequence_value(AUDIT_PREFIX, year)
        .map_err(translate_persistence_error)?;
    let audit_number: String = format_sequence_number(AUDIT_PREFIX, year, sequence);

    let audit: SafetyAudit = SafetyAudit {
        audit_id: None,
        audit_number,
        title: request.title,
        description: request.description,
        status: AuditStatus::initial(),
        plant_id: request.plant_id,
        department_id: request.department_id,
        auditor_id: request.auditor_id,
        scheduled_date: request.scheduled_date,
        completed_at: None,
        score: None,
        summary: None,
        closed_at: None,
        created_at: now.clone(),
        created_by: request.created_by.clone(),
        updated_at: now.clone(),
        updated_by: request.created_by.clone(),
    };
    let audit_id: i64 = persistence
        .insert_safety_audit(&NewSafetyAudit::from(&audit))
        .map_err(translate_persistence_error)?;

    let event: AuditEvent = creation_event(
        Actor::new(request.created_by),
        EntityRef::new(EntityKind::SafetyAudit, audit_id),
        format!("Created safety audit {}: {}", audit.audit_number, audit.title),
        Some(audit.status.as_str()),
        &now,
    );
    persistence
        .record_event(&NewAuditEvent::from(&event))
        .map_err(translate_persistence_error)?;

    load_safety_audit_info(persistence, audit_id)
}

/// Updates a safety audit's descriptive fields.
///
/// Absent request fields leave the stored values untouched. Completion
/// fields (score, summary) travel with status changes, not here.
///
/// # Errors
///
/// Returns an error if validation fails, a referent is missing, or the
/// database rejects the update.
pub fn update_safety_audit(
    persistence: &mut SqlitePersistence,
    audit_id: i64,
    request: UpdateSafetyAuditRequest,
) -> Result<Option<SafetyAuditInfo>, ApiError> {
    validate_actor(&request.updated_by).map_err(translate_domain_error)?;
    let Some(mut audit) = persistence
        .get_safety_audit(audit_id)
        .map_err(translate_persistence_error)?
    else {
        return Ok(None);
    };

    if let Some(title) = request.title {
        validate_required_text("title", &title).map_err(translate_domain_error)?;
        audit.title = title;
    }
    if let Some(description) = request.description {
        validate_required_text("description", &description).map_err(translate_domain_error)?;
        audit.description = description;
    }
    if let Some(plant_id) = request.plant_id {
        ensure_plant_exists(persistence, plant_id)?;
        audit.plant_id = plant_id;
    }
    if let Some(department_id) = request.department_id {
        ensure_department_exists(persistence, department_id)?;
        audit.department_id = department_id;
    }
    if let Some(auditor_id) = request.auditor_id {
        ensure_user_exists(persistence, auditor_id)?;
        audit.auditor_id = auditor_id;
    }
    if let Some(scheduled_date) = request.scheduled_date {
        parse_date(&scheduled_date).map_err(translate_domain_error)?;
        audit.scheduled_date = scheduled_date;
    }

    let now: String = current_timestamp()?;
    audit.updated_at = now.clone();
    audit.updated_by = request.updated_by.clone();

    let rows_affected: usize = persistence
        .update_safety_audit(audit_id, &audit)
        .map_err(translate_persistence_error)?;
    if rows_affected == 0 {
        return Ok(None);
    }

    let event: AuditEvent = update_event(
        Actor::new(request.updated_by),
        EntityRef::new(EntityKind::SafetyAudit, audit_id),
        format!("Updated safety audit {}", audit.audit_number),
        &now,
    );
    persistence
        .record_event(&NewAuditEvent::from(&event))
        .map_err(translate_persistence_error)?;

    load_safety_audit_info(persistence, audit_id).map(Some)
}

/// Moves a safety audit to a new status.
///
/// Completing an audit requires a score in range; the completion
/// timestamp is stamped by the plan. A summary supplied here replaces
/// the stored one, an absent summary keeps it.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `audit_id` - The audit to move
/// * `request` - The requested status and coupled fields
///
/// # Returns
///
/// * `Ok(Some(SafetyAuditInfo))` - The audit after the move
/// * `Ok(None)` - If no audit has this id
/// * `Err(ApiError)` - If the transition is not legal
///
/// # Errors
///
/// Returns an error if:
/// - The acting user is empty
/// - The requested status is unknown
/// - The lifecycle table does not allow the transition
/// - A score is missing on completion, out of range, or supplied on a
///   non-completing transition
/// - The database rejects the update
pub fn update_safety_audit_status(
    persistence: &mut SqlitePersistence,
    audit_id: i64,
    request: SafetyAuditStatusRequest,
) -> Result<Option<SafetyAuditInfo>, ApiError> {
    validate_actor(&request.performed_by).map_err(translate_domain_error)?;
    let Some(audit) = persistence
        .get_safety_audit(audit_id)
        .map_err(translate_persistence_error)?
    else {
        return Ok(None);
    };
    let requested: AuditStatus =
        AuditStatus::parse_str(&request.status).map_err(translate_domain_error)?;
    let now: String = current_timestamp()?;
    let plan: AuditTransitionPlan =
        plan_audit_transition(audit.status, requested, request.score, &now)
            .map_err(translate_core_error)?;

    let completed_at: Option<String> = plan.completed_at.or(audit.completed_at);
    let score: Option<i32> = plan.score.or(audit.score);
    let summary: Option<String> = request.summary.or(audit.summary);

    let rows_affected: usize = persistence
        .update_safety_audit_status(
            audit_id,
            plan.plan.to.as_str(),
            completed_at,
            score,
            summary,
            plan.plan.closed_at,
            &now,
            &request.performed_by,
        )
        .map_err(translate_persistence_error)?;
    if rows_affected == 0 {
        return Ok(None);
    }

    let event: AuditEvent = status_event(
        Actor::new(request.performed_by),
        EntityRef::new(EntityKind::SafetyAudit, audit_id),
        plan.plan.from.as_str(),
        plan.plan.to.as_str(),
        request.note,
        &now,
    );
    persistence
        .record_event(&NewAuditEvent::from(&event))
        .map_err(translate_persistence_error)?;

    load_safety_audit_info(persistence, audit_id).map(Some)
}

/// Deletes a safety audit, recording the audit event before the row
/// goes.
///
/// # Errors
///
/// Returns an error if the acting user is empty or the database rejects
/// the delete.
pub fn delete_safety_audit(
    persistence: &mut SqlitePersistence,
    audit_id: i64,
    performed_by: &str,
) -> Result<Option<()>, ApiError> {
    validate_actor(performed_by).map_err(translate_domain_error)?;
    let Some(audit) = persistence
        .get_safety_audit(audit_id)
        .map_err(translate_persistence_error)?
    else {
        return Ok(None);
    };

    let now: String = current_timestamp()?;
    let event: AuditEvent = deletion_event(
        Actor::new(performed_by.to_string()),
        EntityRef::new(EntityKind::SafetyAudit, audit_id),
        format!("Deleted safety audit {}", audit.audit_number),
        Some(audit.status.as_str()),
        &now,
    );
    persistence
        .record_event(&NewAuditEvent::from(&event))
        .map_err(translate_persistence_error)?;

    let rows_affected: usize = persistence
        .delete_safety_audit(audit_id)
        .map_err(translate_persistence_error)?;
    if rows_affected == 0 {
        return Ok(None);
    }
    Ok(Some(()))
}

/// Aggregates safety audit counts and the average score.
///
/// # Errors
///
/// Returns an error if a filter value is unknown or the database cannot
/// be queried.
pub fn safety_audit_statistics(
    persistence: &mut SqlitePersistence,
    filter: &SearchFilter,
) -> Result<AuditStatistics, ApiError> {
    let entity_filter: SafetyAuditFilter = safety_audit_filter(filter)?;
    let by_status: Vec<(String, i64)> = persistence
        .count_safety_audits_by_status(&entity_filter)
        .map_err(translate_persistence_error)?;
    let cutoff: String = today()?;
    let overdue: i64 = persistence
        .count_overdue_safety_audits(&entity_filter, &cutoff)
        .map_err(translate_persistence_error)?;
    let scores: Vec<i32> = persistence
        .safety_audit_scores(&entity_filter)
        .map_err(translate_persistence_error)?;
    Ok(sitesafe::audit_statistics(&by_status, overdue, &scores))
}

/// Returns a safety audit's audit trail, oldest event first.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn safety_audit_history(
    persistence: &mut SqlitePersistence,
    audit_id: i64,
) -> Result<Option<Vec<AuditEventInfo>>, ApiError> {
    let audit: Option<SafetyAudit> = persistence
        .get_safety_audit(audit_id)
        .map_err(translate_persistence_error)?;
    let events: Vec<AuditEventRow> = persistence
        .events_for_entity(EntityKind::SafetyAudit.as_str(), audit_id)
        .map_err(translate_persistence_error)?;
    if audit.is_none() && events.is_empty() {
        return Ok(None);
    }
    Ok(Some(events.into_iter().map(AuditEventInfo::from).collect()))
}

fn load_safety_audit_info(
    persistence: &mut SqlitePersistence,
    audit_id: i64,
) -> Result<SafetyAuditInfo, ApiError> {
    let Some(audit) = persistence
        .get_safety_audit(audit_id)
        .map_err(translate_persistence_error)?
    else {
        return Err(ApiError::Internal {
            message: format!("Safety audit {audit_id} missing after write"),
        });
    };
    let names: NameIndex = name_index(persistence)?;
    Ok(project_safety_audit(&audit, &names))
}

// ============================================================================
// Permits
// ============================================================================

/// Lists work permits matching the filter, one page at a time.
///
/// # Errors
///
/// Returns an error if a filter value names an unknown status or kind,
/// or if the database cannot be queried.
pub fn list_permits(
    persistence: &mut SqlitePersistence,
    filter: &SearchFilter,
) -> Result<PagedResult<PermitInfo>, ApiError> {
    let entity_filter: PermitFilter = permit_filter(filter)?;
    let page: PageSpec = page_spec(filter);
    let (permits, total_count) = persistence
        .list_permits(&entity_filter, &page)
        .map_err(translate_persistence_error)?;
    let names: NameIndex = name_index(persistence)?;
    let data: Vec<PermitInfo> = permits
        .iter()
        .map(|permit| project_permit(permit, &names))
        .collect();
    Ok(PagedResult::new(
        data,
        total_count,
        normalize_page(filter.page),
        normalize_page_size(filter.page_size),
    ))
}

/// Retrieves one permit by id, or `None` if it does not exist.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn get_permit(
    persistence: &mut SqlitePersistence,
    permit_id: i64,
) -> Result<Option<PermitInfo>, ApiError> {
    let Some(permit) = persistence
        .get_permit(permit_id)
        .map_err(translate_persistence_error)?
    else {
        return Ok(None);
    };
    let names: NameIndex = name_index(persistence)?;
    Ok(Some(project_permit(&permit, &names)))
}

/// Requests a new work permit.
///
/// This function:
/// - Validates the request fields and the acting user
/// - Checks the validity window is ordered
/// - Verifies the plant, department, requester, and all workers exist
/// - Allocates the next `PRM-YYYY-NNNN` permit number
/// - Persists the permit and its worker roster in draft status
/// - Records the creation audit event
///
/// # Errors
///
/// Returns an error if:
/// - A required field is empty or the kind is unknown
/// - The validity window is malformed or not ordered
/// - A worker appears more than once in the roster
/// - The plant, department, requester, or a worker does not exist
/// - The database rejects the insert
pub fn create_permit(
    persistence: &mut SqlitePersistence,
    request: CreatePermitRequest,
) -> Result<PermitInfo, ApiError> {
    validate_actor(&request.created_by).map_err(translate_domain_error)?;
    validate_required_text("title", &request.title).map_err(translate_domain_error)?;
    validate_required_text("description", &request.description).map_err(translate_domain_error)?;
    let kind: PermitKind = PermitKind::parse_str(&request.kind).map_err(translate_domain_error)?;
    validate_validity_window(&request.valid_from, &request.valid_to)
        .map_err(translate_domain_error)?;
    ensure_distinct_workers(&request.worker_ids)?;
    ensure_plant_exists(persistence, request.plant_id)?;
    ensure_department_exists(persistence, request.department_id)?;
    ensure_user_exists(persistence, request.requested_by)?;
    ensure_workers_exist(persistence, &request.worker_ids)?;

    let now: String = current_timestamp()?;
    let year: i32 = current_year();
    let sequence: i64 = persistence
        .next_sequence_value(PERMIT_PREFIX, year)
        .map_err(translate_persistence_error)?;
    let permit_number: String = format_sequence_number(PERMIT_PREFIX, year, sequence);

    let permit: Permit = Permit {
        permit_id: None,
        permit_number,
        title: request.title,
        description: request.description,
        kind,
        status: PermitStatus::initial(),
        plant_id: request.plant_id,
        department_id: request.department_id,
        requested_by: request.requested_by,
        approved_by: None,
        approved_at: None,
        approval_notes: None,
        valid_from: request.valid_from,
        valid_to: request.valid_to,
        worker_ids: request.worker_ids,
        closed_at: None,
        created_at: now.clone(),
        created_by: request.created_by.clone(),
        updated_at: now.clone(),
        updated_by: request.created_by.clone(),
    };
    let permit_id: i64 = persistence
        .insert_permit(&NewPermit::from(&permit), &permit.worker_ids)
        .map_err(translate_persistence_error)?;

    let event: AuditEvent = creation_event(
        Actor::new(request.created_by),
        EntityRef::new(EntityKind::Permit, permit_id),
        format!("Created permit {}: {}", permit.permit_number, permit.title),
        Some(permit.status.as_str()),
        &now,
    );
    persistence
        .record_event(&NewAuditEvent::from(&event))
        .map_err(translate_persistence_error)?;

    load_permit_info(persistence, permit_id)
}

/// Updates a permit's descriptive fields and worker roster.
///
/// Absent request fields leave the stored values untouched. A present
/// `worker_ids` replaces the whole roster. Approval fields travel with
/// status changes, not here.
///
/// # Errors
///
/// Returns an error if validation fails, a referent is missing, or the
/// database rejects the update.
#[allow(clippy::too_many_lines)]
pub fn update_permit(
    persistence: &mut SqlitePersistence,
    permit_id: i64,
    request: UpdatePermitRequest,
) -> Result<Option<PermitInfo>, ApiError> {
    validate_actor(&request.updated_by).map_err(translate_domain_error)?;
    let Some(mut permit) = persistence
        .get_permit(permit_id)
        .map_err(translate_persistence_error)?
    else {
        return Ok(None);
    };

    if let Some(title) = request.title {
        validate_required_text("title", &title).map_err(translate_domain_error)?;
        permit.title = title;
    }
    if let Some(description) = request.description {
        validate_required_text("description", &description).map_err(translate_domain_error)?;
        permit.description = description;
    }
    if let Some(kind) = &request.kind {
        permit.kind = PermitKind::parse_str(kind).map_err(translate_domain_error)?;
    }
    if let Some(plant_id) = request.plant_id {
        ensure_plant_exists(persistence, plant_id)?;
        permit.plant_id = plant_id;
    }
    if let Some(department_id) = request.department_id {
        ensure_department_exists(persistence, department_id)?;
        permit.department_id = department_id;
    }
    if let Some(requested_by) = request.requested_by {
        ensure_user_exists(persistence, requested_by)?;
        permit.requested_by = requested_by;
    }
    let window_changed: bool = request.valid_from.is_some() || request.valid_to.is_some();
    if let Some(valid_from) = request.valid_from {
        permit.valid_from = valid_from;
    }
    if let Some(valid_to) = request.valid_to {
        permit.valid_to = valid_to;
    }
    if window_changed {
        // The merged window must still be ordered.
        validate_validity_window(&permit.valid_from, &permit.valid_to)
            .map_err(translate_domain_error)?;
    }
    if let Some(worker_ids) = request.worker_ids {
        ensure_distinct_workers(&worker_ids)?;
        ensure_workers_exist(persistence, &worker_ids)?;
        permit.worker_ids = worker_ids;
    }

    let now: String = current_timestamp()?;
    permit.updated_at = now.clone();
    permit.updated_by = request.updated_by.clone();

    let rows_affected: usize = persistence
        .update_permit(permit_id, &permit)
        .map_err(translate_persistence_error)?;
    if rows_affected == 0 {
        return Ok(None);
    }

    let event: AuditEvent = update_event(
        Actor::new(request.updated_by),
        EntityRef::new(EntityKind::Permit, permit_id),
        format!("Updated permit {}", permit.permit_number),
        &now,
    );
    persistence
        .record_event(&NewAuditEvent::from(&event))
        .map_err(translate_persistence_error)?;

    load_permit_info(persistence, permit_id).map(Some)
}

/// Moves a permit to a new status.
///
/// Approval is coupled to the lifecycle: entering the approved status
/// requires an approver and stamps the approval, returning to draft
/// clears it, and every other move leaves it untouched.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `permit_id` - The permit to move
/// * `request` - The requested status and coupled fields
///
/// # Returns
///
/// * `Ok(Some(PermitInfo))` - The permit after the move
/// * `Ok(None)` - If no permit has this id
/// * `Err(ApiError)` - If the transition is not legal
///
/// # Errors
///
/// Returns an error if:
/// - The acting user is empty
/// - The requested status is unknown
/// - The lifecycle table does not allow the transition
/// - An approver is missing on approval, has no user account, or
///   approval fields are supplied on a non-approving transition
/// - The database rejects the update
pub fn update_permit_status(
    persistence: &mut SqlitePersistence,
    permit_id: i64,
    request: PermitStatusRequest,
) -> Result<Option<PermitInfo>, ApiError> {
    validate_actor(&request.performed_by).map_err(translate_domain_error)?;
    let Some(permit) = persistence
        .get_permit(permit_id)
        .map_err(translate_persistence_error)?
    else {
        return Ok(None);
    };
    let requested: PermitStatus =
        PermitStatus::parse_str(&request.status).map_err(translate_domain_error)?;
    let now: String = current_timestamp()?;
    let plan: PermitTransitionPlan = plan_permit_transition(
        permit.status,
        requested,
        request.approved_by,
        request.approval_notes,
        &now,
    )
    .map_err(translate_core_error)?;

    let (approved_by, approved_at, approval_notes): (
        Option<i64>,
        Option<String>,
        Option<String>,
    ) = match plan.approval {
        ApprovalEffect::Grant {
            approved_by,
            approved_at,
            approval_notes,
        } => {
            ensure_user_exists(persistence, approved_by)?;
            (Some(approved_by), Some(approved_at), approval_notes)
        }
        ApprovalEffect::Clear => (None, None, None),
        ApprovalEffect::None => (
            permit.approved_by,
            permit.approved_at.clone(),
            permit.approval_notes.clone(),
        ),
    };

    let rows_affected: usize = persistence
        .update_permit_status(
            permit_id,
            plan.plan.to.as_str(),
            approved_by,
            approved_at,
            approval_notes,
            plan.plan.closed_at,
            &now,
            &request.performed_by,
        )
        .map_err(translate_persistence_error)?;
    if rows_affected == 0 {
        return Ok(None);
    }

    let event: AuditEvent = status_event(
        Actor::new(request.performed_by),
        EntityRef::new(EntityKind::Permit, permit_id),
        plan.plan.from.as_str(),
        plan.plan.to.as_str(),
        request.note,
        &now,
    );
    persistence
        .record_event(&NewAuditEvent::from(&event))
        .map_err(translate_persistence_error)?;

    load_permit_info(persistence, permit_id).map(Some)
}

/// Deletes a permit and its worker roster, recording the audit event
/// before the rows go.
///
/// # Errors
///
/// Returns an error if the acting user is empty or the database rejects
/// the delete.
pub fn delete_permit(
    persistence: &mut SqlitePersistence,
    permit_id: i64,
    performed_by: &str,
) -> Result<Option<()>, ApiError> {
    validate_actor(performed_by).map_err(translate_domain_error)?;
    let Some(permit) = persistence
        .get_permit(permit_id)
        .map_err(translate_persistence_error)?
    else {
        return Ok(None);
    };

    let now: String = current_timestamp()?;
    let event: AuditEvent = deletion_event(
        Actor::new(performed_by.to_string()),
        EntityRef::new(EntityKind::Permit, permit_id),
        format!("Deleted permit {}", permit.permit_number),
        Some(permit.status.as_str()),
        &now,
    );
    persistence
        .record_event(&NewAuditEvent::from(&event))
        .map_err(translate_persistence_error)?;

    let rows_affected: usize = persistence
        .delete_permit(permit_id)
        .map_err(translate_persistence_error)?;
    if rows_affected == 0 {
        return Ok(None);
    }
    Ok(Some(()))
}

/// Aggregates permit counts for the dashboard.
///
/// # Errors
///
/// Returns an error if a filter value is unknown or the database cannot
/// be queried.
pub fn permit_statistics(
    persistence: &mut SqlitePersistence,
    filter: &SearchFilter,
) -> Result<PermitStatistics, ApiError> {
    let entity_filter: PermitFilter = permit_filter(filter)?;
    let by_status: Vec<(String, i64)> = persistence
        .count_permits_by_status(&entity_filter)
        .map_err(translate_persistence_error)?;
    let by_kind: Vec<(String, i64)> = persistence
        .count_permits_by_kind(&entity_filter)
        .map_err(translate_persistence_error)?;
    Ok(sitesafe::permit_statistics(&by_status, &by_kind))
}

/// Returns a permit's audit trail, oldest event first.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn permit_history(
    persistence: &mut SqlitePersistence,
    permit_id: i64,
) -> Result<Option<Vec<AuditEventInfo>>, ApiError> {
    let permit: Option<Permit> = persistence
        .get_permit(permit_id)
        .map_err(translate_persistence_error)?;
    let events: Vec<AuditEventRow> = persistence
        .events_for_entity(EntityKind::Permit.as_str(), permit_id)
        .map_err(translate_persistence_error)?;
    if permit.is_none() && events.is_empty() {
        return Ok(None);
    }
    Ok(Some(events.into_iter().map(AuditEventInfo::from).collect()))
}

fn load_permit_info(
    persistence: &mut SqlitePersistence,
    permit_id: i64,
) -> Result<PermitInfo, ApiError> {
    let Some(permit) = persistence
        .get_permit(permit_id)
        .map_err(translate_persistence_error)?
    else {
        return Err(ApiError::Internal {
            message: format!("Permit {permit_id} missing after write"),
        });
    };
    let names: NameIndex = name_index(persistence)?;
    Ok(project_permit(&permit, &names))
}

// ============================================================================
// Plants
// ============================================================================

/// Lists every plant, unpaged, ordered by name.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn list_plants(persistence: &mut SqlitePersistence) -> Result<Vec<PlantInfo>, ApiError> {
    let plants: Vec<Plant> = persistence.list_plants().map_err(translate_persistence_error)?;
    Ok(plants.iter().map(PlantInfo::from).collect())
}

/// Retrieves one plant by id, or `None` if it does not exist.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn get_plant(
    persistence: &mut SqlitePersistence,
    plant_id: i64,
) -> Result<Option<PlantInfo>, ApiError> {
    Ok(persistence
        .get_plant(plant_id)
        .map_err(translate_persistence_error)?
        .map(|plant| PlantInfo::from(&plant)))
}

/// Creates a plant.
///
/// The code must be unique across plants; a collision is a conflict,
/// not an internal error.
///
/// # Errors
///
/// Returns an error if the name is empty, the code is empty or contains
/// whitespace, the code is already in use, or the database rejects the
/// insert.
pub fn create_plant(
    persistence: &mut SqlitePersistence,
    request: CreatePlantRequest,
) -> Result<PlantInfo, ApiError> {
    validate_actor(&request.created_by).map_err(translate_domain_error)?;
    validate_required_text("name", &request.name).map_err(translate_domain_error)?;
    validate_code("code", &request.code).map_err(translate_domain_error)?;
    if persistence
        .plant_code_exists(&request.code, None)
        .map_err(translate_persistence_error)?
    {
        return Err(ApiError::Conflict {
            resource_type: String::from("Plant"),
            message: format!("Plant code '{}' is already in use", request.code),
        });
    }

    let now: String = current_timestamp()?;
    let plant_id: i64 = persistence
        .insert_plant(&request.name, &request.code, &now)
        .map_err(translate_persistence_error)?;

    let event: AuditEvent = creation_event(
        Actor::new(request.created_by),
        EntityRef::new(EntityKind::Plant, plant_id),
        format!("Created plant '{}' ({})", request.name, request.code),
        None,
        &now,
    );
    persistence
        .record_event(&NewAuditEvent::from(&event))
        .map_err(translate_persistence_error)?;

    load_plant_info(persistence, plant_id)
}

/// Replaces a plant's name and code.
///
/// # Errors
///
/// Returns an error if validation fails, the code is already in use by
/// another plant, or the database rejects the update.
pub fn update_plant(
    persistence: &mut SqlitePersistence,
    plant_id: i64,
    request: UpdatePlantRequest,
) -> Result<Option<PlantInfo>, ApiError> {
    validate_actor(&request.updated_by).map_err(translate_domain_error)?;
    validate_required_text("name", &request.name).map_err(translate_domain_error)?;
    validate_code("code", &request.code).map_err(translate_domain_error)?;
    if persistence
        .get_plant(plant_id)
        .map_err(translate_persistence_error)?
        .is_none()
    {
        return Ok(None);
    }
    if persistence
        .plant_code_exists(&request.code, Some(plant_id))
        .map_err(translate_persistence_error)?
    {
        return Err(ApiError::Conflict {
            resource_type: String::from("Plant"),
            message: format!("Plant code '{}' is already in use", request.code),
        });
    }

    let now: String = current_timestamp()?;
    let rows_affected: usize = persistence
        .update_plant(plant_id, &request.name, &request.code, &now)
        .map_err(translate_persistence_error)?;
    if rows_affected == 0 {
        return Ok(None);
    }

    let event: AuditEvent = update_event(
        Actor::new(request.updated_by),
        EntityRef::new(EntityKind::Plant, plant_id),
        format!("Updated plant '{}' ({})", request.name, request.code),
        &now,
    );
    persistence
        .record_event(&NewAuditEvent::from(&event))
        .map_err(translate_persistence_error)?;

    load_plant_info(persistence, plant_id).map(Some)
}

/// Deletes a plant.
///
/// Referential integrity decides first: a plant still referenced by any
/// safety record is not deletable, and no event is recorded for a
/// delete that did not happen.
///
/// # Errors
///
/// Returns an error if the acting user is empty, the plant is still
/// referenced, or the database rejects the delete.
pub fn delete_plant(
    persistence: &mut SqlitePersistence,
    plant_id: i64,
    performed_by: &str,
) -> Result<Option<()>, ApiError> {
    validate_actor(performed_by).map_err(translate_domain_error)?;
    let Some(plant) = persistence
        .get_plant(plant_id)
        .map_err(translate_persistence_error)?
    else {
        return Ok(None);
    };

    let rows_affected: usize = persistence.delete_plant(plant_id).map_err(|e| match e {
        PersistenceError::ForeignKeyViolation(_) => {
            tracing::warn!(plant_id, "Rejected plant deletion, still referenced");
            ApiError::DomainRuleViolation {
                rule: String::from("referential_integrity"),
                message: format!("Plant '{}' is still referenced by safety records", plant.name),
            }
        }
        other => translate_persistence_error(other),
    })?;
    if rows_affected == 0 {
        return Ok(None);
    }

    let now: String = current_timestamp()?;
    let event: AuditEvent = deletion_event(
        Actor::new(performed_by.to_string()),
        EntityRef::new(EntityKind::Plant, plant_id),
        format!("Deleted plant '{}' ({})", plant.name, plant.code),
        None,
        &now,
    );
    persistence
        .record_event(&NewAuditEvent::from(&event))
        .map_err(translate_persistence_error)?;
    Ok(Some(()))
}

fn load_plant_info(
    persistence: &mut SqlitePersistence,
    plant_id: i64,
) -> Result<PlantInfo, ApiError> {
    let Some(plant) = persistence
        .get_plant(plant_id)
        .map_err(translate_persistence_error)?
    else {
        return Err(ApiError::Internal {
            message: format!("Plant {plant_id} missing after write"),
        });
    };
    Ok(PlantInfo::from(&plant))
}

// ============================================================================
// Departments
// ============================================================================

/// Lists every department, unpaged, ordered by name.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn list_departments(
    persistence: &mut SqlitePersistence,
) -> Result<Vec<DepartmentInfo>, ApiError> {
    let departments: Vec<Department> = persistence
        .list_departments()
        .map_err(translate_persistence_error)?;
    Ok(departments.iter().map(DepartmentInfo::from).collect())
}

/// Retrieves one department by id, or `None` if it does not exist.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn get_department(
    persistence: &mut SqlitePersistence,
    department_id: i64,
) -> Result<Option<DepartmentInfo>, ApiError> {
    Ok(persistence
        .get_department(department_id)
        .map_err(translate_persistence_error)?
        .map(|department| DepartmentInfo::from(&department)))
}

/// Creates a department.
///
/// # Errors
///
/// Returns an error if the name is empty, the code is empty or contains
/// whitespace, the code is already in use, or the database rejects the
/// insert.
pub fn create_department(
    persistence: &mut SqlitePersistence,
    request: CreateDepartmentRequest,
) -> Result<DepartmentInfo, ApiError> {
    validate_actor(&request.created_by).map_err(translate_domain_error)?;
    validate_required_text("name", &request.name).map_err(translate_domain_error)?;
    validate_code("code", &request.code).map_err(translate_domain_error)?;
    if persistence
        .department_code_exists(&request.code, None)
        .map_err(translate_persistence_error)?
    {
        return Err(ApiError::Conflict {
            resource_type: String::from("Department"),
            message: format!("Department code '{}' is already in use", request.code),
        });
    }

    let now: String = current_timestamp()?;
    let department_id: i64 = persistence
        .insert_department(&request.name, &request.code, &now)
        .map_err(translate_persistence_error)?;

    let event: AuditEvent = creation_event(
        Actor::new(request.created_by),
        EntityRef::new(EntityKind::Department, department_id),
        format!("Created department '{}' ({})", request.name, request.code),
        None,
        &now,
    );
    persistence
        .record_event(&NewAuditEvent::from(&event))
        .map_err(translate_persistence_error)?;

    load_department_info(persistence, department_id)
}

/// Replaces a department's name and code.
///
/// # Errors
///
/// Returns an error if validation fails, the code is already in use by
/// another department, or the database rejects the update.
pub fn update_department(
    persistence: &mut SqlitePersistence,
    department_id: i64,
    request: UpdateDepartmentRequest,
) -> Result<Option<DepartmentInfo>, ApiError> {
    validate_actor(&request.updated_by).map_err(translate_domain_error)?;
    validate_required_text("name", &request.name).map_err(translate_domain_error)?;
    validate_code("code", &request.code).map_err(translate_domain_error)?;
    if persistence
        .get_department(department_id)
        .map_err(translate_persistence_error)?
        .is_none()
    {
        return Ok(None);
    }
    if persistence
        .department_code_exists(&request.code, Some(department_id))
        .map_err(translate_persistence_error)?
    {
        return Err(ApiError::Conflict {
            resource_type: String::from("Department"),
            message: format!("Department code '{}' is already in use", request.code),
        });
    }

    let now: String = current_timestamp()?;
    let rows_affected: usize = persistence
        .update_department(department_id, &request.name, &request.code, &now)
        .map_err(translate_persistence_error)?;
    if rows_affected == 0 {
        return Ok(None);
    }

    let event: AuditEvent = update_event(
        Actor::new(request.updated_by),
        EntityRef::new(EntityKind::Department, department_id),
        format!("Updated department '{}' ({})", request.name, request.code),
        &now,
    );
    persistence
        .record_event(&NewAuditEvent::from(&event))
        .map_err(translate_persistence_error)?;

    load_department_info(persistence, department_id).map(Some)
}

/// Deletes a department. Referential integrity decides first, as with
/// plants.
///
/// # Errors
///
/// Returns an error if the acting user is empty, the department is
/// still referenced, or the database rejects the delete.
pub fn delete_department(
    persistence: &mut SqlitePersistence,
    department_id: i64,
    performed_by: &str,
) -> Result<Option<()>, ApiError> {
    validate_actor(performed_by).map_err(translate_domain_error)?;
    let Some(department) = persistence
        .get_department(department_id)
        .map_err(translate_persistence_error)?
    else {
        return Ok(None);
    };

    let rows_affected: usize = persistence
        .delete_department(department_id)
        .map_err(|e| match e {
            PersistenceError::ForeignKeyViolation(_) => {
                tracing::warn!(department_id, "Rejected department deletion, still referenced");
                ApiError::DomainRuleViolation {
                    rule: String::from("referential_integrity"),
                    message: format!(
                        "Department '{}' is still referenced by safety records",
                        department.name
                    ),
                }
            }
            other => translate_persistence_error(other),
        })?;
    if rows_affected == 0 {
        return Ok(None);
    }

    let now: String = current_timestamp()?;
    let event: AuditEvent = deletion_event(
        Actor::new(performed_by.to_string()),
        EntityRef::new(EntityKind::Department, department_id),
        format!(
            "Deleted department '{}' ({})",
            department.name, department.code
        ),
        None,
        &now,
    );
    persistence
        .record_event(&NewAuditEvent::from(&event))
        .map_err(translate_persistence_error)?;
    Ok(Some(()))
}

fn load_department_info(
    persistence: &mut SqlitePersistence,
    department_id: i64,
) -> Result<DepartmentInfo, ApiError> {
    let Some(department) = persistence
        .get_department(department_id)
        .map_err(translate_persistence_error)?
    else {
        return Err(ApiError::Internal {
            message: format!("Department {department_id} missing after write"),
        });
    };
    Ok(DepartmentInfo::from(&department))
}

// ============================================================================
// User Accounts
// ============================================================================

/// Lists user accounts matching the filter, one page at a time.
///
/// The search term matches against full name and email.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn list_user_accounts(
    persistence: &mut SqlitePersistence,
    filter: &SearchFilter,
) -> Result<PagedResult<UserAccountInfo>, ApiError> {
    let user_filter: UserFilter = UserFilter {
        search: filter.search.clone(),
    };
    let page: PageSpec = page_spec(filter);
    let (accounts, total_count) = persistence
        .list_user_accounts(&user_filter, &page)
        .map_err(translate_persistence_error)?;
    let data: Vec<UserAccountInfo> = accounts.iter().map(UserAccountInfo::from).collect();
    Ok(PagedResult::new(
        data,
        total_count,
        normalize_page(filter.page),
        normalize_page_size(filter.page_size),
    ))
}

/// Retrieves one user account by id, or `None` if it does not exist.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn get_user_account(
    persistence: &mut SqlitePersistence,
    user_id: i64,
) -> Result<Option<UserAccountInfo>, ApiError> {
    Ok(persistence
        .get_user_account(user_id)
        .map_err(translate_persistence_error)?
        .map(|account| UserAccountInfo::from(&account)))
}

/// Creates a user account.
///
/// Email addresses are unique across accounts; a collision is a
/// conflict, not an internal error.
///
/// # Errors
///
/// Returns an error if the full name is empty, the email is malformed,
/// the email is already in use, or the database rejects the insert.
pub fn create_user_account(
    persistence: &mut SqlitePersistence,
    request: CreateUserAccountRequest,
) -> Result<UserAccountInfo, ApiError> {
    validate_actor(&request.created_by).map_err(translate_domain_error)?;
    validate_required_text("full_name", &request.full_name).map_err(translate_domain_error)?;
    validate_email(&request.email).map_err(translate_domain_error)?;
    if persistence
        .email_exists(&request.email, None)
        .map_err(translate_persistence_error)?
    {
        return Err(ApiError::Conflict {
            resource_type: String::from("User account"),
            message: format!("Email '{}' is already in use", request.email),
        });
    }

    let now: String = current_timestamp()?;
    let user_id: i64 = persistence
        .insert_user_account(
            &request.full_name,
            &request.email,
            request.job_title,
            &now,
        )
        .map_err(translate_persistence_error)?;

    let event: AuditEvent = creation_event(
        Actor::new(request.created_by),
        EntityRef::new(EntityKind::UserAccount, user_id),
        format!("Created user account '{}' <{}>", request.full_name, request.email),
        None,
        &now,
    );
    persistence
        .record_event(&NewAuditEvent::from(&event))
        .map_err(translate_persistence_error)?;

    load_user_account_info(persistence, user_id)
}

/// Replaces a user account's profile fields.
///
/// An absent `job_title` clears the stored one; this is a full-row
/// replace, not a merge.
///
/// # Errors
///
/// Returns an error if validation fails, the email is already in use by
/// another account, or the database rejects the update.
pub fn update_user_account(
    persistence: &mut SqlitePersistence,
    user_id: i64,
    request: UpdateUserAccountRequest,
) -> Result<Option<UserAccountInfo>, ApiError> {
    validate_actor(&request.updated_by).map_err(translate_domain_error)?;
    validate_required_text("full_name", &request.full_name).map_err(translate_domain_error)?;
    validate_email(&request.email).map_err(translate_domain_error)?;
    if persistence
        .get_user_account(user_id)
        .map_err(translate_persistence_error)?
        .is_none()
    {
        return Ok(None);
    }
    if persistence
        .email_exists(&request.email, Some(user_id))
        .map_err(translate_persistence_error)?
    {
        return Err(ApiError::Conflict {
            resource_type: String::from("User account"),
            message: format!("Email '{}' is already in use", request.email),
        });
    }

    let now: String = current_timestamp()?;
    let rows_affected: usize = persistence
        .update_user_account(
            user_id,
            &request.full_name,
            &request.email,
            request.job_title,
            &now,
        )
        .map_err(translate_persistence_error)?;
    if rows_affected == 0 {
        return Ok(None);
    }

    let event: AuditEvent = update_event(
        Actor::new(request.updated_by),
        EntityRef::new(EntityKind::UserAccount, user_id),
        format!("Updated user account '{}'", request.full_name),
        &now,
    );
    persistence
        .record_event(&NewAuditEvent::from(&event))
        .map_err(translate_persistence_error)?;

    load_user_account_info(persistence, user_id).map(Some)
}

/// Deletes a user account. Referential integrity decides first: an
/// account named by any safety record or permit roster stays.
///
/// # Errors
///
/// Returns an error if the acting user is empty, the account is still
/// referenced, or the database rejects the delete.
pub fn delete_user_account(
    persistence: &mut SqlitePersistence,
    user_id: i64,
    performed_by: &str,
) -> Result<Option<()>, ApiError> {
    validate_actor(performed_by).map_err(translate_domain_error)?;
    let Some(account) = persistence
        .get_user_account(user_id)
        .map_err(translate_persistence_error)?
    else {
        return Ok(None);
    };

    let rows_affected: usize = persistence
        .delete_user_account(user_id)
        .map_err(|e| match e {
            PersistenceError::ForeignKeyViolation(_) => {
                tracing::warn!(user_id, "Rejected user account deletion, still referenced");
                ApiError::DomainRuleViolation {
                    rule: String::from("referential_integrity"),
                    message: format!(
                        "User account '{}' is still referenced by safety records",
                        account.full_name
                    ),
                }
            }
            other => translate_persistence_error(other),
        })?;
    if rows_affected == 0 {
        return Ok(None);
    }

    let now: String = current_timestamp()?;
    let event: AuditEvent = deletion_event(
        Actor::new(performed_by.to_string()),
        EntityRef::new(EntityKind::UserAccount, user_id),
        format!("Deleted user account '{}'", account.full_name),
        None,
        &now,
    );
    persistence
        .record_event(&NewAuditEvent::from(&event))
        .map_err(translate_persistence_error)?;
    Ok(Some(()))
}

fn load_user_account_info(
    persistence: &mut SqlitePersistence,
    user_id: i64,
) -> Result<UserAccountInfo, ApiError> {
    let Some(account) = persistence
        .get_user_account(user_id)
        .map_err(translate_persistence_error)?
    else {
        return Err(ApiError::Internal {
            message: format!("User account {user_id} missing after write"),
        });
    };
    Ok(UserAccountInfo::from(&account))
}
