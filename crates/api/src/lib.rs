// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Service boundary layer for SiteSafe.
//!
//! This crate exposes one function per operation the system supports:
//! CRUD and lifecycle moves for observations, incidents, safety audits,
//! and work permits, directory management for plants, departments, and
//! user accounts, statistics, audit-trail reads, and the CSV user
//! import. Each function validates its request, runs the domain rules,
//! persists the result, and records the audit event.
//!
//! The HTTP server is a thin shell over these functions. Everything
//! worth testing about an operation is testable here, without a socket.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

mod csv_import;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use csv_import::{
    CsvImportError, ImportRowStatus, UserImportPreview, UserImportResult, UserImportRow,
    import_users, preview_user_import,
};
pub use error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
pub use handlers::{
    create_department, create_incident, create_observation, create_permit, create_plant,
    create_safety_audit, create_user_account, delete_department, delete_incident,
    delete_observation, delete_permit, delete_plant, delete_safety_audit, delete_user_account,
    get_department, get_incident, get_observation, get_permit, get_plant, get_safety_audit,
    get_user_account, incident_history, incident_statistics, list_departments, list_incidents,
    list_observations, list_permits, list_plants, list_safety_audits, list_user_accounts,
    observation_history, observation_statistics, permit_history, permit_statistics,
    safety_audit_history, safety_audit_statistics, update_department, update_incident,
    update_incident_status, update_observation, update_observation_status, update_permit,
    update_permit_status, update_plant, update_safety_audit, update_safety_audit_status,
    update_user_account,
};
pub use request_response::{
    AuditEventInfo, CreateDepartmentRequest, CreateIncidentRequest, CreateObservationRequest,
    CreatePermitRequest, CreatePlantRequest, CreateSafetyAuditRequest, CreateUserAccountRequest,
    DeleteRequest, ImportUsersRequest, IncidentStatusRequest, ObservationStatusRequest,
    PagedResult, PermitStatusRequest, PreviewUserImportRequest, SafetyAuditStatusRequest,
    SearchFilter, UpdateDepartmentRequest, UpdateIncidentRequest, UpdateObservationRequest,
    UpdatePermitRequest, UpdatePlantRequest, UpdateSafetyAuditRequest, UpdateUserAccountRequest,
};
