// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{
        Path, Query, Request, State as AxumState,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use sitesafe::{
    AuditStatistics, DepartmentInfo, IncidentInfo, IncidentStatistics, ObservationInfo,
    ObservationStatistics, PermitInfo, PermitStatistics, PlantInfo, SafetyAuditInfo,
    UserAccountInfo,
};
use sitesafe_api::{
    ApiError, AuditEventInfo, CreateDepartmentRequest, CreateIncidentRequest,
    CreateObservationRequest, CreatePermitRequest, CreatePlantRequest, CreateSafetyAuditRequest,
    CreateUserAccountRequest, DeleteRequest, ImportUsersRequest, IncidentStatusRequest,
    ObservationStatusRequest, PagedResult, PermitStatusRequest, PreviewUserImportRequest,
    SafetyAuditStatusRequest, SearchFilter, UpdateDepartmentRequest, UpdateIncidentRequest,
    UpdateObservationRequest, UpdatePermitRequest, UpdatePlantRequest, UpdateSafetyAuditRequest,
    UpdateUserAccountRequest, UserImportPreview, UserImportResult, create_department,
    create_incident, create_observation, create_permit, create_plant, create_safety_audit,
    create_user_account, delete_department, delete_incident, delete_observation, delete_permit,
    delete_plant, delete_safety_audit, delete_user_account, get_department, get_incident,
    get_observation, get_permit, get_plant, get_safety_audit, get_user_account, import_users,
    incident_history, incident_statistics, list_departments, list_incidents, list_observations,
    list_permits, list_plants, list_safety_audits, list_user_accounts, observation_history,
    observation_statistics, permit_history, permit_statistics, preview_user_import,
    safety_audit_history, safety_audit_statistics, update_department, update_incident,
    update_incident_status, update_observation, update_observation_status, update_permit,
    update_permit_status, update_plant, update_safety_audit, update_safety_audit_status,
    update_user_account,
};
use sitesafe_persistence::SqlitePersistence;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// SiteSafe Server - HTTP server for the SiteSafe EHS tracker
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Frontend origin allowed by CORS
    #[arg(short, long, default_value = "http://localhost:5173")]
    frontend_origin: String,
}

/// Application state shared across handlers.
///
/// This contains the persistence layer wrapped in a Mutex to allow
/// safe concurrent access, plus the configured CORS origin.
#[derive(Clone)]
struct AppState {
    /// The persistence layer for safety records and audit events.
    persistence: Arc<Mutex<SqlitePersistence>>,
    /// The single origin CORS responses allow.
    frontend_origin: HeaderValue,
}

/// API request carried by POST `/observations/{id}/close`.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CloseObservationApiRequest {
    /// How the observation was resolved.
    resolution_notes: Option<String>,
    /// Free-text note recorded on the transition event.
    note: Option<String>,
    /// The acting user.
    performed_by: String,
}

/// API request carried by POST `/incidents/{id}/close`.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CloseIncidentApiRequest {
    /// Investigation findings, if updated at closure.
    findings: Option<String>,
    /// Root cause, if updated at closure.
    root_cause: Option<String>,
    /// Free-text note recorded on the transition event.
    note: Option<String>,
    /// The acting user.
    performed_by: String,
}

/// API request carried by POST `/audits/{id}/start`.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct StartAuditApiRequest {
    /// Free-text note recorded on the transition event.
    note: Option<String>,
    /// The acting user.
    performed_by: String,
}

/// API request carried by POST `/audits/{id}/complete`.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CompleteAuditApiRequest {
    /// The audit score (0-100), required to complete.
    score: i32,
    /// Summary of the fieldwork.
    summary: Option<String>,
    /// Free-text note recorded on the transition event.
    note: Option<String>,
    /// The acting user.
    performed_by: String,
}

/// API request carried by POST `/audits/{id}/close`.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CloseAuditApiRequest {
    /// Free-text note recorded on the transition event.
    note: Option<String>,
    /// The acting user.
    performed_by: String,
}

/// API request carried by POST `/permits/{id}/approve`.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ApprovePermitApiRequest {
    /// The approving user account, required to approve.
    approved_by: i64,
    /// Conditions attached to the approval.
    approval_notes: Option<String>,
    /// Free-text note recorded on the transition event.
    note: Option<String>,
    /// The acting user.
    performed_by: String,
}

/// API request carried by POST `/permits/{id}/cancel`.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CancelPermitApiRequest {
    /// Free-text note recorded on the transition event.
    note: Option<String>,
    /// The acting user.
    performed_by: String,
}

/// Uniform response body returned by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ApiResponse<T> {
    /// Whether the request succeeded.
    success: bool,
    /// A human-readable outcome summary.
    message: String,
    /// The payload, absent on failures.
    data: Option<T>,
    /// Error details, empty on success.
    errors: Vec<String>,
    /// When the response was produced (RFC 3339).
    timestamp: String,
}

/// The current time as an RFC 3339 string, empty if formatting fails.
fn now_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_default()
}

/// Wraps a payload in the success envelope.
fn reply<T: Serialize>(status: StatusCode, message: &str, data: T) -> Response {
    let body: Json<ApiResponse<T>> = Json(ApiResponse {
        success: true,
        message: message.to_string(),
        data: Some(data),
        errors: Vec::new(),
        timestamp: now_rfc3339(),
    });
    (status, body).into_response()
}

/// HTTP error wrapper that renders the failure envelope.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ApiResponse<()>> = Json(ApiResponse {
            success: false,
            message: self.message.clone(),
            data: None,
            errors: vec![self.message],
            timestamp: now_rfc3339(),
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for HttpError {
    fn from(rejection: QueryRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for HttpError {
    fn from(rejection: PathRejection) -> Self {
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

/// Builds the 404 returned when a service reports absence.
fn not_found(resource_type: &str, id: i64) -> HttpError {
    HttpError {
        status: StatusCode::NOT_FOUND,
        message: format!("{resource_type} {id} not found"),
    }
}

/// Stamps the CORS response headers for the configured origin.
fn apply_cors_headers(headers: &mut HeaderMap, origin: &HeaderValue) {
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("content-type"),
    );
}

/// Edge middleware: answers CORS preflight, stamps CORS headers on every
/// response, and logs the request outcome.
async fn request_layer(
    AxumState(app_state): AxumState<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let method: Method = request.method().clone();
    let path: String = request.uri().path().to_string();

    if method == Method::OPTIONS {
        let mut response: Response = StatusCode::NO_CONTENT.into_response();
        apply_cors_headers(response.headers_mut(), &app_state.frontend_origin);
        return response;
    }

    let mut response: Response = next.run(request).await;
    apply_cors_headers(response.headers_mut(), &app_state.frontend_origin);
    tracing::debug!(%method, %path, status = %response.status(), "Handled request");
    response
}

/// Handler for GET `/api/observations`.
async fn handle_list_observations(
    AxumState(app_state): AxumState<AppState>,
    query: Result<Query<SearchFilter>, QueryRejection>,
) -> Result<Response, HttpError> {
    let Query(filter) = query?;
    let mut persistence = app_state.persistence.lock().await;
    let page: PagedResult<ObservationInfo> = list_observations(&mut persistence, &filter)?;
    drop(persistence);
    Ok(reply(StatusCode::OK, "Observations retrieved", page))
}

/// Handler for POST `/api/observations`.
async fn handle_create_observation(
    AxumState(app_state): AxumState<AppState>,
    payload: Result<Json<CreateObservationRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Json(request) = payload?;
    info!(
        title = %request.title,
        created_by = %request.created_by,
        "Handling create_observation request"
    );
    let mut persistence = app_state.persistence.lock().await;
    let created: ObservationInfo = create_observation(&mut persistence, request)?;
    drop(persistence);
    Ok(reply(StatusCode::CREATED, "Observation created", created))
}

/// Handler for GET `/api/observations/{id}`.
async fn handle_get_observation(
    AxumState(app_state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Response, HttpError> {
    let Path(observation_id) = path?;
    let mut persistence = app_state.persistence.lock().await;
    let found: Option<ObservationInfo> = get_observation(&mut persistence, observation_id)?;
    drop(persistence);
    let Some(observation) = found else {
        return Err(not_found("Observation", observation_id));
    };
    Ok(reply(StatusCode::OK, "Observation retrieved", observation))
}

/// Handler for PUT `/api/observations/{id}`.
async fn handle_update_observation(
    AxumState(app_state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateObservationRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Path(observation_id) = path?;
    let Json(request) = payload?;
    info!(observation_id, updated_by = %request.updated_by, "Handling update_observation request");
    let mut persistence = app_state.persistence.lock().await;
    let updated: Option<ObservationInfo> =
        update_observation(&mut persistence, observation_id, request)?;
    drop(persistence);
    let Some(observation) = updated else {
        return Err(not_found("Observation", observation_id));
    };
    Ok(reply(StatusCode::OK, "Observation updated", observation))
}

/// Handler for DELETE `/api/observations/{id}`.
async fn handle_delete_observation(
    AxumState(app_state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<DeleteRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Path(observation_id) = path?;
    let Json(request) = payload?;
    info!(observation_id, performed_by = %request.performed_by, "Handling delete_observation request");
    let mut persistence = app_state.persistence.lock().await;
    let deleted: Option<()> =
        delete_observation(&mut persistence, observation_id, &request.performed_by)?;
    drop(persistence);
    if deleted.is_none() {
        return Err(not_found("Observation", observation_id));
    }
    Ok(reply(StatusCode::OK, "Observation deleted", ()))
}

/// Runs an observation status change and wraps the outcome.
async fn run_observation_status(
    app_state: &AppState,
    observation_id: i64,
    request: ObservationStatusRequest,
) -> Result<Response, HttpError> {
    info!(
        observation_id,
        status = %request.status,
        performed_by = %request.performed_by,
        "Handling observation status request"
    );
    let mut persistence = app_state.persistence.lock().await;
    let updated: Option<ObservationInfo> =
        update_observation_status(&mut persistence, observation_id, request)?;
    drop(persistence);
    let Some(observation) = updated else {
        return Err(not_found("Observation", observation_id));
    };
    Ok(reply(
        StatusCode::OK,
        "Observation status updated",
        observation,
    ))
}

/// Handler for POST `/api/observations/{id}/status`.
async fn handle_update_observation_status(
    AxumState(app_state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ObservationStatusRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Path(observation_id) = path?;
    let Json(request) = payload?;
    run_observation_status(&app_state, observation_id, request).await
}

/// Handler for POST `/api/observations/{id}/close`.
async fn handle_close_observation(
    AxumState(app_state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CloseObservationApiRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Path(observation_id) = path?;
    let Json(body) = payload?;
    let request: ObservationStatusRequest = ObservationStatusRequest {
        status: String::from("closed"),
        resolution_notes: body.resolution_notes,
        note: body.note,
        performed_by: body.performed_by,
    };
    run_observation_status(&app_state, observation_id, request).await
}

/// Handler for GET `/api/observations/statistics`.
async fn handle_observation_statistics(
    AxumState(app_state): AxumState<AppState>,
    query: Result<Query<SearchFilter>, QueryRejection>,
) -> Result<Response, HttpError> {
    let Query(filter) = query?;
    let mut persistence = app_state.persistence.lock().await;
    let statistics: ObservationStatistics = observation_statistics(&mut persistence, &filter)?;
    drop(persistence);
    Ok(reply(
        StatusCode::OK,
        "Observation statistics retrieved",
        statistics,
    ))
}

/// Handler for GET `/api/observations/{id}/history`.
async fn handle_observation_history(
    AxumState(app_state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Response, HttpError> {
    let Path(observation_id) = path?;
    let mut persistence = app_state.persistence.lock().await;
    let history: Option<Vec<AuditEventInfo>> =
        observation_history(&mut persistence, observation_id)?;
    drop(persistence);
    let Some(events) = history else {
        return Err(not_found("Observation", observation_id));
    };
    Ok(reply(StatusCode::OK, "Observation history retrieved", events))
}

/// Handler for GET `/api/incidents`.
async fn handle_list_incidents(
    AxumState(app_state): AxumState<AppState>,
    query: Result<Query<SearchFilter>, QueryRejection>,
) -> Result<Response, HttpError> {
    let Query(filter) = query?;
    let mut persistence = app_state.persistence.lock().await;
    let page: PagedResult<IncidentInfo> = list_incidents(&mut persistence, &filter)?;
    drop(persistence);
    Ok(reply(StatusCode::OK, "Incidents retrieved", page))
}

/// Handler for POST `/api/incidents`.
async fn handle_create_incident(
    AxumState(app_state): AxumState<AppState>,
    payload: Result<Json<CreateIncidentRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Json(request) = payload?;
    info!(
        title = %request.title,
        severity = %request.severity,
        created_by = %request.created_by,
        "Handling create_incident request"
    );
    let mut persistence = app_state.persistence.lock().await;
    let created: IncidentInfo = create_incident(&mut persistence, request)?;
    drop(persistence);
    Ok(reply(StatusCode::CREATED, "Incident created", created))
}

/// Handler for GET `/api/incidents/{id}`.
async fn handle_get_incident(
    AxumState(app_state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Response, HttpError> {
    let Path(incident_id) = path?;
    let mut persistence = app_state.persistence.lock().await;
    let found: Option<IncidentInfo> = get_incident(&mut persistence, incident_id)?;
    drop(persistence);
    let Some(incident) = found else {
        return Err(not_found("Incident", incident_id));
    };
    Ok(reply(StatusCode::OK, "Incident retrieved", incident))
}

/// Handler for PUT `/api/incidents/{id}`.
async fn handle_update_incident(
    AxumState(app_state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateIncidentRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Path(incident_id) = path?;
    let Json(request) = payload?;
    info!(incident_id, updated_by = %request.updated_by, "Handling update_incident request");
    let mut persistence = app_state.persistence.lock().await;
    let updated: Option<IncidentInfo> = update_incident(&mut persistence, incident_id, request)?;
    drop(persistence);
    let Some(incident) = updated else {
        return Err(not_found("Incident", incident_id));
    };
    Ok(reply(StatusCode::OK, "Incident updated", incident))
}

/// Handler for DELETE `/api/incidents/{id}`.
async fn handle_delete_incident(
    AxumState(app_state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<DeleteRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Path(incident_id) = path?;
    let Json(request) = payload?;
    info!(incident_id, performed_by = %request.performed_by, "Handling delete_incident request");
    let mut persistence = app_state.persistence.lock().await;
    let deleted: Option<()> = delete_incident(&mut persistence, incident_id, &request.performed_by)?;
    drop(persistence);
    if deleted.is_none() {
        return Err(not_found("Incident", incident_id));
    }
    Ok(reply(StatusCode::OK, "Incident deleted", ()))
}

/// Runs an incident status change and wraps the outcome.
async fn run_incident_status(
    app_state: &AppState,
    incident_id: i64,
    request: IncidentStatusRequest,
) -> Result<Response, HttpError> {
    info!(
        incident_id,
        status = %request.status,
        performed_by = %request.performed_by,
        "Handling incident status request"
    );
    let mut persistence = app_state.persistence.lock().await;
    let updated: Option<IncidentInfo> =
        update_incident_status(&mut persistence, incident_id, request)?;
    drop(persistence);
    let Some(incident) = updated else {
        return Err(not_found("Incident", incident_id));
    };
    Ok(reply(StatusCode::OK, "Incident status updated", incident))
}

/// Handler for POST `/api/incidents/{id}/status`.
async fn handle_update_incident_status(
    AxumState(app_state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<IncidentStatusRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Path(incident_id) = path?;
    let Json(request) = payload?;
    run_incident_status(&app_state, incident_id, request).await
}

/// Handler for POST `/api/incidents/{id}/close`.
async fn handle_close_incident(
    AxumState(app_state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CloseIncidentApiRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Path(incident_id) = path?;
    let Json(body) = payload?;
    let request: IncidentStatusRequest = IncidentStatusRequest {
        status: String::from("closed"),
        investigated_by: None,
        findings: body.findings,
        root_cause: body.root_cause,
        note: body.note,
        performed_by: body.performed_by,
    };
    run_incident_status(&app_state, incident_id, request).await
}

/// Handler for GET `/api/incidents/statistics`.
async fn handle_incident_statistics(
    AxumState(app_state): AxumState<AppState>,
    query: Result<Query<SearchFilter>, QueryRejection>,
) -> Result<Response, HttpError> {
    let Query(filter) = query?;
    let mut persistence = app_state.persistence.lock().await;
    let statistics: IncidentStatistics = incident_statistics(&mut persistence, &filter)?;
    drop(persistence);
    Ok(reply(
        StatusCode::OK,
        "Incident statistics retrieved",
        statistics,
    ))
}

/// Handler for GET `/api/incidents/{id}/history`.
async fn handle_incident_history(
    AxumState(app_state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Response, HttpError> {
    let Path(incident_id) = path?;
    let mut persistence = app_state.persistence.lock().await;
    let history: Option<Vec<AuditEventInfo>> = incident_history(&mut persistence, incident_id)?;
    drop(persistence);
    let Some(events) = history else {
        return Err(not_found("Incident", incident_id));
    };
    Ok(reply(StatusCode::OK, "Incident history retrieved", events))
}

/// Handler for GET `/api/audits`.
async fn handle_list_safety_audits(
    AxumState(app_state): AxumState<AppState>,
    query: Result<Query<SearchFilter>, QueryRejection>,
) -> Result<Response, HttpError> {
    let Query(filter) = query?;
    let mut persistence = app_state.persistence.lock().await;
    let page: PagedResult<SafetyAuditInfo> = list_safety_audits(&mut persistence, &filter)?;
    drop(persistence);
    Ok(reply(StatusCode::OK, "Safety audits retrieved", page))
}

/// Handler for POST `/api/audits`.
async fn handle_create_safety_audit(
    AxumState(app_state): AxumState<AppState>,
    payload: Result<Json<CreateSafetyAuditRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Json(request) = payload?;
    info!(
        title = %request.title,
        scheduled_date = %request.scheduled_date,
        created_by = %request.created_by,
        "Handling create_safety_audit request"
    );
    let mut persistence = app_state.persistence.lock().await;
    let created: SafetyAuditInfo = create_safety_audit(&mut persistence, request)?;
    drop(persistence);
    Ok(reply(StatusCode::CREATED, "Safety audit created", created))
}

/// Handler for GET `/api/audits/{id}`.
async fn handle_get_safety_audit(
    AxumState(app_state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Response, HttpError> {
    let Path(audit_id) = path?;
    let mut persistence = app_state.persistence.lock().await;
    let found: Option<SafetyAuditInfo> = get_safety_audit(&mut persistence, audit_id)?;
    drop(persistence);
    let Some(audit) = found else {
        return Err(not_found("Safety audit", audit_id));
    };
    Ok(reply(StatusCode::OK, "Safety audit retrieved", audit))
}

/// Handler for PUT `/api/audits/{id}`.
async fn handle_update_safety_audit(
    AxumState(app_state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateSafetyAuditRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Path(audit_id) = path?;
    let Json(request) = payload?;
    info!(audit_id, updated_by = %request.updated_by, "Handling update_safety_audit request");
    let mut persistence = app_state.persistence.lock().await;
    let updated: Option<SafetyAuditInfo> =
        update_safety_audit(&mut persistence, audit_id, request)?;
    drop(persistence);
    let Some(audit) = updated else {
        return Err(not_found("Safety audit", audit_id));
    };
    Ok(reply(StatusCode::OK, "Safety audit updated", audit))
}

/// Handler for DELETE `/api/audits/{id}`.
async fn handle_delete_safety_audit(
    AxumState(app_state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<DeleteRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Path(audit_id) = path?;
    let Json(request) = payload?;
    info!(audit_id, performed_by = %request.performed_by, "Handling delete_safety_audit request");
    let mut persistence = app_state.persistence.lock().await;
    let deleted: Option<()> =
        delete_safety_audit(&mut persistence, audit_id, &request.performed_by)?;
    drop(persistence);
    if deleted.is_none() {
        return Err(not_found("Safety audit", audit_id));
    }
    Ok(reply(StatusCode::OK, "Safety audit deleted", ()))
}

/// Runs a safety audit status change and wraps the outcome.
async fn run_safety_audit_status(
    app_state: &AppState,
    audit_id: i64,
    request: SafetyAuditStatusRequest,
) -> Result<Response, HttpError> {
    info!(
        audit_id,
        status = %request.status,
        performed_by = %request.performed_by,
        "Handling safety audit status request"
    );
    let mut persistence = app_state.persistence.lock().await;
    let updated: Option<SafetyAuditInfo> =
        update_safety_audit_status(&mut persistence, audit_id, request)?;
    drop(persistence);
    let Some(audit) = updated else {
        return Err(not_found("Safety audit", audit_id));
    };
    Ok(reply(StatusCode::OK, "Safety audit status updated", audit))
}

/// Handler for POST `/api/audits/{id}/status`.
async fn handle_update_safety_audit_status(
    AxumState(app_state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<SafetyAuditStatusRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Path(audit_id) = path?;
    let Json(request) = payload?;
    run_safety_audit_status(&app_state, audit_id, request).await
}

/// Handler for POST `/api/audits/{id}/start`.
async fn handle_start_safety_audit(
    AxumState(app_state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<StartAuditApiRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Path(audit_id) = path?;
    let Json(body) = payload?;
    let request: SafetyAuditStatusRequest = SafetyAuditStatusRequest {
        status: String::from("in_progress"),
        score: None,
        summary: None,
        note: body.note,
        performed_by: body.performed_by,
    };
    run_safety_audit_status(&app_state, audit_id, request).await
}

/// Handler for POST `/api/audits/{id}/complete`.
async fn handle_complete_safety_audit(
    AxumState(app_state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CompleteAuditApiRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Path(audit_id) = path?;
    let Json(body) = payload?;
    let request: SafetyAuditStatusRequest = SafetyAuditStatusRequest {
        status: String::from("completed"),
        score: Some(body.score),
        summary: body.summary,
        note: body.note,
        performed_by: body.performed_by,
    };
    run_safety_audit_status(&app_state, audit_id, request).await
}

/// Handler for POST `/api/audits/{id}/close`.
async fn handle_close_safety_audit(
    AxumState(app_state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CloseAuditApiRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Path(audit_id) = path?;
    let Json(body) = payload?;
    let request: SafetyAuditStatusRequest = SafetyAuditStatusRequest {
        status: String::from("closed"),
        score: None,
        summary: None,
        note: body.note,
        performed_by: body.performed_by,
    };
    run_safety_audit_status(&app_state, audit_id, request).await
}

/// Handler for GET `/api/audits/statistics`.
async fn handle_safety_audit_statistics(
    AxumState(app_state): AxumState<AppState>,
    query: Result<Query<SearchFilter>, QueryRejection>,
) -> Result<Response, HttpError> {
    let Query(filter) = query?;
    let mut persistence = app_state.persistence.lock().await;
    let statistics: AuditStatistics = safety_audit_statistics(&mut persistence, &filter)?;
    drop(persistence);
    Ok(reply(
        StatusCode::OK,
        "Safety audit statistics retrieved",
        statistics,
    ))
}

/// Handler for GET `/api/audits/{id}/history`.
async fn handle_safety_audit_history(
    AxumState(app_state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Response, HttpError> {
    let Path(audit_id) = path?;
    let mut persistence = app_state.persistence.lock().await;
    let history: Option<Vec<AuditEventInfo>> = safety_audit_history(&mut persistence, audit_id)?;
    drop(persistence);
    let Some(events) = history else {
        return Err(not_found("Safety audit", audit_id));
    };
    Ok(reply(
        StatusCode::OK,
        "Safety audit history retrieved",
        events,
    ))
}

/// Handler for GET `/api/permits`.
async fn handle_list_permits(
    AxumState(app_state): AxumState<AppState>,
    query: Result<Query<SearchFilter>, QueryRejection>,
) -> Result<Response, HttpError> {
    let Query(filter) = query?;
    let mut persistence = app_state.persistence.lock().await;
    let page: PagedResult<PermitInfo> = list_permits(&mut persistence, &filter)?;
    drop(persistence);
    Ok(reply(StatusCode::OK, "Permits retrieved", page))
}

/// Handler for POST `/api/permits`.
async fn handle_create_permit(
    AxumState(app_state): AxumState<AppState>,
    payload: Result<Json<CreatePermitRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Json(request) = payload?;
    info!(
        title = %request.title,
        kind = %request.kind,
        created_by = %request.created_by,
        "Handling create_permit request"
    );
    let mut persistence = app_state.persistence.lock().await;
    let created: PermitInfo = create_permit(&mut persistence, request)?;
    drop(persistence);
    Ok(reply(StatusCode::CREATED, "Permit created", created))
}

/// Handler for GET `/api/permits/{id}`.
async fn handle_get_permit(
    AxumState(app_state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Response, HttpError> {
    let Path(permit_id) = path?;
    let mut persistence = app_state.persistence.lock().await;
    let found: Option<PermitInfo> = get_permit(&mut persistence, permit_id)?;
    drop(persistence);
    let Some(permit) = found else {
        return Err(not_found("Permit", permit_id));
    };
    Ok(reply(StatusCode::OK, "Permit retrieved", permit))
}

/// Handler for PUT `/api/permits/{id}`.
async fn handle_update_permit(
    AxumState(app_state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdatePermitRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Path(permit_id) = path?;
    let Json(request) = payload?;
    info!(permit_id, updated_by = %request.updated_by, "Handling update_permit request");
    let mut persistence = app_state.persistence.lock().await;
    let updated: Option<PermitInfo> = update_permit(&mut persistence, permit_id, request)?;
    drop(persistence);
    let Some(permit) = updated else {
        return Err(not_found("Permit", permit_id));
    };
    Ok(reply(StatusCode::OK, "Permit updated", permit))
}

/// Handler for DELETE `/api/permits/{id}`.
async fn handle_delete_permit(
    AxumState(app_state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<DeleteRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Path(permit_id) = path?;
    let Json(request) = payload?;
    info!(permit_id, performed_by = %request.performed_by, "Handling delete_permit request");
    let mut persistence = app_state.persistence.lock().await;
    let deleted: Option<()> = delete_permit(&mut persistence, permit_id, &request.performed_by)?;
    drop(persistence);
    if deleted.is_none() {
        return Err(not_found("Permit", permit_id));
    }
    Ok(reply(StatusCode::OK, "Permit deleted", ()))
}

/// Runs a permit status change and wraps the outcome.
async fn run_permit_status(
    app_state: &AppState,
    permit_id: i64,
    request: PermitStatusRequest,
) -> Result<Response, HttpError> {
    info!(
        permit_id,
        status = %request.status,
        performed_by = %request.performed_by,
        "Handling permit status request"
    );
    let mut persistence = app_state.persistence.lock().await;
    let updated: Option<PermitInfo> = update_permit_status(&mut persistence, permit_id, request)?;
    drop(persistence);
    let Some(permit) = updated else {
        return Err(not_found("Permit", permit_id));
    };
    Ok(reply(StatusCode::OK, "Permit status updated", permit))
}

/// Handler for POST `/api/permits/{id}/status`.
async fn handle_update_permit_status(
    AxumState(app_state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<PermitStatusRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Path(permit_id) = path?;
    let Json(request) = payload?;
    run_permit_status(&app_state, permit_id, request).await
}

/// Handler for POST `/api/permits/{id}/approve`.
async fn handle_approve_permit(
    AxumState(app_state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ApprovePermitApiRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Path(permit_id) = path?;
    let Json(body) = payload?;
    let request: PermitStatusRequest = PermitStatusRequest {
        status: String::from("approved"),
        approved_by: Some(body.approved_by),
        approval_notes: body.approval_notes,
        note: body.note,
        performed_by: body.performed_by,
    };
    run_permit_status(&app_state, permit_id, request).await
}

/// Handler for POST `/api/permits/{id}/cancel`.
async fn handle_cancel_permit(
    AxumState(app_state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CancelPermitApiRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Path(permit_id) = path?;
    let Json(body) = payload?;
    let request: PermitStatusRequest = PermitStatusRequest {
        status: String::from("cancelled"),
        approved_by: None,
        approval_notes: None,
        note: body.note,
        performed_by: body.performed_by,
    };
    run_permit_status(&app_state, permit_id, request).await
}

/// Handler for GET `/api/permits/statistics`.
async fn handle_permit_statistics(
    AxumState(app_state): AxumState<AppState>,
    query: Result<Query<SearchFilter>, QueryRejection>,
) -> Result<Response, HttpError> {
    let Query(filter) = query?;
    let mut persistence = app_state.persistence.lock().await;
    let statistics: PermitStatistics = permit_statistics(&mut persistence, &filter)?;
    drop(persistence);
    Ok(reply(
        StatusCode::OK,
        "Permit statistics retrieved",
        statistics,
    ))
}

/// Handler for GET `/api/permits/{id}/history`.
async fn handle_permit_history(
    AxumState(app_state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Response, HttpError> {
    let Path(permit_id) = path?;
    let mut persistence = app_state.persistence.lock().await;
    let history: Option<Vec<AuditEventInfo>> = permit_history(&mut persistence, permit_id)?;
    drop(persistence);
    let Some(events) = history else {
        return Err(not_found("Permit", permit_id));
    };
    Ok(reply(StatusCode::OK, "Permit history retrieved", events))
}

/// Handler for GET `/api/plants`.
async fn handle_list_plants(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Response, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let plants: Vec<PlantInfo> = list_plants(&mut persistence)?;
    drop(persistence);
    Ok(reply(StatusCode::OK, "Plants retrieved", plants))
}

/// Handler for POST `/api/plants`.
async fn handle_create_plant(
    AxumState(app_state): AxumState<AppState>,
    payload: Result<Json<CreatePlantRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Json(request) = payload?;
    info!(name = %request.name, code = %request.code, "Handling create_plant request");
    let mut persistence = app_state.persistence.lock().await;
    let created: PlantInfo = create_plant(&mut persistence, request)?;
    drop(persistence);
    Ok(reply(StatusCode::CREATED, "Plant created", created))
}

/// Handler for GET `/api/plants/{id}`.
async fn handle_get_plant(
    AxumState(app_state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Response, HttpError> {
    let Path(plant_id) = path?;
    let mut persistence = app_state.persistence.lock().await;
    let found: Option<PlantInfo> = get_plant(&mut persistence, plant_id)?;
    drop(persistence);
    let Some(plant) = found else {
        return Err(not_found("Plant", plant_id));
    };
    Ok(reply(StatusCode::OK, "Plant retrieved", plant))
}

/// Handler for PUT `/api/plants/{id}`.
async fn handle_update_plant(
    AxumState(app_state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdatePlantRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Path(plant_id) = path?;
    let Json(request) = payload?;
    info!(plant_id, updated_by = %request.updated_by, "Handling update_plant request");
    let mut persistence = app_state.persistence.lock().await;
    let updated: Option<PlantInfo> = update_plant(&mut persistence, plant_id, request)?;
    drop(persistence);
    let Some(plant) = updated else {
        return Err(not_found("Plant", plant_id));
    };
    Ok(reply(StatusCode::OK, "Plant updated", plant))
}

/// Handler for DELETE `/api/plants/{id}`.
async fn handle_delete_plant(
    AxumState(app_state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<DeleteRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Path(plant_id) = path?;
    let Json(request) = payload?;
    info!(plant_id, performed_by = %request.performed_by, "Handling delete_plant request");
    let mut persistence = app_state.persistence.lock().await;
    let deleted: Option<()> = delete_plant(&mut persistence, plant_id, &request.performed_by)?;
    drop(persistence);
    if deleted.is_none() {
        return Err(not_found("Plant", plant_id));
    }
    Ok(reply(StatusCode::OK, "Plant deleted", ()))
}

/// Handler for GET `/api/departments`.
async fn handle_list_departments(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Response, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let departments: Vec<DepartmentInfo> = list_departments(&mut persistence)?;
    drop(persistence);
    Ok(reply(StatusCode::OK, "Departments retrieved", departments))
}

/// Handler for POST `/api/departments`.
async fn handle_create_department(
    AxumState(app_state): AxumState<AppState>,
    payload: Result<Json<CreateDepartmentRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Json(request) = payload?;
    info!(name = %request.name, code = %request.code, "Handling create_department request");
    let mut persistence = app_state.persistence.lock().await;
    let created: DepartmentInfo = create_department(&mut persistence, request)?;
    drop(persistence);
    Ok(reply(StatusCode::CREATED, "Department created", created))
}

/// Handler for GET `/api/departments/{id}`.
async fn handle_get_department(
    AxumState(app_state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Response, HttpError> {
    let Path(department_id) = path?;
    let mut persistence = app_state.persistence.lock().await;
    let found: Option<DepartmentInfo> = get_department(&mut persistence, department_id)?;
    drop(persistence);
    let Some(department) = found else {
        return Err(not_found("Department", department_id));
    };
    Ok(reply(StatusCode::OK, "Department retrieved", department))
}

/// Handler for PUT `/api/departments/{id}`.
async fn handle_update_department(
    AxumState(app_state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateDepartmentRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Path(department_id) = path?;
    let Json(request) = payload?;
    info!(department_id, updated_by = %request.updated_by, "Handling update_department request");
    let mut persistence = app_state.persistence.lock().await;
    let updated: Option<DepartmentInfo> =
        update_department(&mut persistence, department_id, request)?;
    drop(persistence);
    let Some(department) = updated else {
        return Err(not_found("Department", department_id));
    };
    Ok(reply(StatusCode::OK, "Department updated", department))
}

/// Handler for DELETE `/api/departments/{id}`.
async fn handle_delete_department(
    AxumState(app_state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<DeleteRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Path(department_id) = path?;
    let Json(request) = payload?;
    info!(department_id, performed_by = %request.performed_by, "Handling delete_department request");
    let mut persistence = app_state.persistence.lock().await;
    let deleted: Option<()> =
        delete_department(&mut persistence, department_id, &request.performed_by)?;
    drop(persistence);
    if deleted.is_none() {
        return Err(not_found("Department", department_id));
    }
    Ok(reply(StatusCode::OK, "Department deleted", ()))
}

/// Handler for GET `/api/users`.
async fn handle_list_user_accounts(
    AxumState(app_state): AxumState<AppState>,
    query: Result<Query<SearchFilter>, QueryRejection>,
) -> Result<Response, HttpError> {
    let Query(filter) = query?;
    let mut persistence = app_state.persistence.lock().await;
    let page: PagedResult<UserAccountInfo> = list_user_accounts(&mut persistence, &filter)?;
    drop(persistence);
    Ok(reply(StatusCode::OK, "User accounts retrieved", page))
}

/// Handler for POST `/api/users`.
async fn handle_create_user_account(
    AxumState(app_state): AxumState<AppState>,
    payload: Result<Json<CreateUserAccountRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Json(request) = payload?;
    info!(email = %request.email, "Handling create_user_account request");
    let mut persistence = app_state.persistence.lock().await;
    let created: UserAccountInfo = create_user_account(&mut persistence, request)?;
    drop(persistence);
    Ok(reply(StatusCode::CREATED, "User account created", created))
}

/// Handler for GET `/api/users/{id}`.
async fn handle_get_user_account(
    AxumState(app_state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Response, HttpError> {
    let Path(user_id) = path?;
    let mut persistence = app_state.persistence.lock().await;
    let found: Option<UserAccountInfo> = get_user_account(&mut persistence, user_id)?;
    drop(persistence);
    let Some(account) = found else {
        return Err(not_found("User account", user_id));
    };
    Ok(reply(StatusCode::OK, "User account retrieved", account))
}

/// Handler for PUT `/api/users/{id}`.
async fn handle_update_user_account(
    AxumState(app_state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateUserAccountRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Path(user_id) = path?;
    let Json(request) = payload?;
    info!(user_id, updated_by = %request.updated_by, "Handling update_user_account request");
    let mut persistence = app_state.persistence.lock().await;
    let updated: Option<UserAccountInfo> = update_user_account(&mut persistence, user_id, request)?;
    drop(persistence);
    let Some(account) = updated else {
        return Err(not_found("User account", user_id));
    };
    Ok(reply(StatusCode::OK, "User account updated", account))
}

/// Handler for DELETE `/api/users/{id}`.
async fn handle_delete_user_account(
    AxumState(app_state): AxumState<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<DeleteRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Path(user_id) = path?;
    let Json(request) = payload?;
    info!(user_id, performed_by = %request.performed_by, "Handling delete_user_account request");
    let mut persistence = app_state.persistence.lock().await;
    let deleted: Option<()> = delete_user_account(&mut persistence, user_id, &request.performed_by)?;
    drop(persistence);
    if deleted.is_none() {
        return Err(not_found("User account", user_id));
    }
    Ok(reply(StatusCode::OK, "User account deleted", ()))
}

/// Handler for POST `/api/users/import/preview`.
#[allow(clippy::unused_async)]
async fn handle_preview_user_import(
    payload: Result<Json<PreviewUserImportRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Json(request) = payload?;
    let preview: UserImportPreview = preview_user_import(&request.csv_text)?;
    Ok(reply(StatusCode::OK, "Import preview generated", preview))
}

/// Handler for POST `/api/users/import`.
async fn handle_import_users(
    AxumState(app_state): AxumState<AppState>,
    payload: Result<Json<ImportUsersRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Json(request) = payload?;
    info!(performed_by = %request.performed_by, "Handling import_users request");
    let mut persistence = app_state.persistence.lock().await;
    let result: UserImportResult = import_users(&mut persistence, request)?;
    drop(persistence);
    Ok(reply(StatusCode::CREATED, "User accounts imported", result))
}

/// Builds the application router with all endpoints under `/api`.
fn build_router(app_state: AppState) -> Router {
    let api: Router<AppState> = Router::new()
        .route(
            "/observations",
            get(handle_list_observations).post(handle_create_observation),
        )
        .route("/observations/statistics", get(handle_observation_statistics))
        .route(
            "/observations/{observation_id}",
            get(handle_get_observation)
                .put(handle_update_observation)
                .delete(handle_delete_observation),
        )
        .route(
            "/observations/{observation_id}/status",
            post(handle_update_observation_status),
        )
        .route(
            "/observations/{observation_id}/close",
            post(handle_close_observation),
        )
        .route(
            "/observations/{observation_id}/history",
            get(handle_observation_history),
        )
        .route(
            "/incidents",
            get(handle_list_incidents).post(handle_create_incident),
        )
        .route("/incidents/statistics", get(handle_incident_statistics))
        .route(
            "/incidents/{incident_id}",
            get(handle_get_incident)
                .put(handle_update_incident)
                .delete(handle_delete_incident),
        )
        .route(
            "/incidents/{incident_id}/status",
            post(handle_update_incident_status),
        )
        .route("/incidents/{incident_id}/close", post(handle_close_incident))
        .route(
            "/incidents/{incident_id}/history",
            get(handle_incident_history),
        )
        .route(
            "/audits",
            get(handle_list_safety_audits).post(handle_create_safety_audit),
        )
        .route("/audits/statistics", get(handle_safety_audit_statistics))
        .route(
            "/audits/{audit_id}",
            get(handle_get_safety_audit)
                .put(handle_update_safety_audit)
                .delete(handle_delete_safety_audit),
        )
        .route(
            "/audits/{audit_id}/status",
            post(handle_update_safety_audit_status),
        )
        .route("/audits/{audit_id}/start", post(handle_start_safety_audit))
        .route(
            "/audits/{audit_id}/complete",
            post(handle_complete_safety_audit),
        )
        .route("/audits/{audit_id}/close", post(handle_close_safety_audit))
        .route("/audits/{audit_id}/history", get(handle_safety_audit_history))
        .route(
            "/permits",
            get(handle_list_permits).post(handle_create_permit),
        )
        .route("/permits/statistics", get(handle_permit_statistics))
        .route(
            "/permits/{permit_id}",
            get(handle_get_permit)
                .put(handle_update_permit)
                .delete(handle_delete_permit),
        )
        .route(
            "/permits/{permit_id}/status",
            post(handle_update_permit_status),
        )
        .route("/permits/{permit_id}/approve", post(handle_approve_permit))
        .route("/permits/{permit_id}/cancel", post(handle_cancel_permit))
        .route("/permits/{permit_id}/history", get(handle_permit_history))
        .route("/plants", get(handle_list_plants).post(handle_create_plant))
        .route(
            "/plants/{plant_id}",
            get(handle_get_plant)
                .put(handle_update_plant)
                .delete(handle_delete_plant),
        )
        .route(
            "/departments",
            get(handle_list_departments).post(handle_create_department),
        )
        .route(
            "/departments/{department_id}",
            get(handle_get_department)
                .put(handle_update_department)
                .delete(handle_delete_department),
        )
        .route(
            "/users",
            get(handle_list_user_accounts).post(handle_create_user_account),
        )
        .route("/users/import", post(handle_import_users))
        .route("/users/import/preview", post(handle_preview_user_import))
        .route(
            "/users/{user_id}",
            get(handle_get_user_account)
                .put(handle_update_user_account)
                .delete(handle_delete_user_account),
        );

    Router::new()
        .nest("/api", api)
        .layer(middleware::from_fn_with_state(
            app_state.clone(),
            request_layer,
        ))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing SiteSafe server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: SqlitePersistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        SqlitePersistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        SqlitePersistence::new_in_memory()?
    };

    let frontend_origin: HeaderValue = args.frontend_origin.parse()?;
    info!(origin = %args.frontend_origin, "CORS restricted to frontend origin");

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        frontend_origin,
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
