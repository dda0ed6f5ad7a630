// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Query modules for persistence layer.
//!
//! This module contains all read-only queries for the persistence layer.
//!
//! ## Module Organization
//!
//! - `observations` — Observation lookups, lists, and counts
//! - `incidents` — Incident lookups, lists, and counts
//! - `safety_audits` — Safety audit lookups, lists, counts, and scores
//! - `permits` — Permit lookups and lists, including worker rosters
//! - `directory` — Plants, departments, user accounts, existence checks
//! - `audit_trail` — Per-entity audit event chronologies
//!
//! ## Backend-Specific Functions
//!
//! All query functions are generated in backend-specific monomorphic versions:
//! - Functions suffixed with `_sqlite` for `SQLite`
//! - Functions suffixed with `_mysql` for `MySQL`/`MariaDB`
//!
//! The `Persistence` adapter in `lib.rs` dispatches to the appropriate version
//! based on the active backend connection.

pub mod audit_trail;
pub mod directory;
pub mod incidents;
pub mod observations;
pub mod permits;
pub mod safety_audits;

// Re-export backend-specific query functions used by lib.rs
pub use audit_trail::{events_for_entity_mysql, events_for_entity_sqlite};
pub use directory::{
    department_code_exists_mysql, department_code_exists_sqlite, department_exists_mysql,
    department_exists_sqlite, email_exists_mysql, email_exists_sqlite, existing_user_ids_mysql,
    existing_user_ids_sqlite, get_department_mysql, get_department_sqlite, get_plant_mysql,
    get_plant_sqlite, get_user_account_mysql, get_user_account_sqlite, list_departments_mysql,
    list_departments_sqlite, list_plants_mysql, list_plants_sqlite, list_user_accounts_mysql,
    list_user_accounts_sqlite, plant_code_exists_mysql, plant_code_exists_sqlite,
    plant_exists_mysql, plant_exists_sqlite, user_exists_mysql, user_exists_sqlite,
    user_names_mysql, user_names_sqlite,
};
pub use incidents::{
    count_incidents_by_kind_mysql, count_incidents_by_kind_sqlite, count_incidents_by_severity_mysql,
    count_incidents_by_severity_sqlite, count_incidents_by_status_mysql,
    count_incidents_by_status_sqlite, get_incident_mysql, get_incident_sqlite, list_incidents_mysql,
    list_incidents_sqlite,
};
pub use observations::{
    count_observations_by_hazard_category_mysql, count_observations_by_hazard_category_sqlite,
    count_observations_by_status_mysql, count_observations_by_status_sqlite,
    count_overdue_observations_mysql, count_overdue_observations_sqlite, get_observation_mysql,
    get_observation_sqlite, list_observations_mysql, list_observations_sqlite,
};
pub use permits::{
    count_permits_by_kind_mysql, count_permits_by_kind_sqlite, count_permits_by_status_mysql,
    count_permits_by_status_sqlite, get_permit_mysql, get_permit_sqlite, list_permits_mysql,
    list_permits_sqlite,
};
pub use safety_audits::{
    count_overdue_safety_audits_mysql, count_overdue_safety_audits_sqlite,
    count_safety_audits_by_status_mysql, count_safety_audits_by_status_sqlite,
    get_safety_audit_mysql, get_safety_audit_sqlite, list_safety_audits_mysql,
    list_safety_audits_sqlite, safety_audit_scores_mysql, safety_audit_scores_sqlite,
};
