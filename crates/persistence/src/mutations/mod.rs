// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-agnostic mutation modules.
//!
//! This module contains all state-changing operations for the persistence layer.
//! Most mutations use Diesel DSL and are backend-agnostic; the one
//! backend-specific touch point is reading back generated IDs after an insert.
//!
//! ## Module Organization
//!
//! - `observations` — Observation inserts, updates, status moves, deletes
//! - `incidents` — Incident inserts, updates, status moves, deletes
//! - `safety_audits` — Safety audit inserts, updates, status moves, deletes
//! - `permits` — Permit and worker roster mutations (transactional)
//! - `directory` — Plant, department, and user account mutations
//! - `audit_trail` — Append-only audit event recording
//! - `sequence` — Per-prefix, per-year sequence counter allocation
//!
//! ## Backend-Specific Code
//!
//! Generated-ID reads go through `PersistenceBackend::last_insert_id()` from
//! the `backend` module. All other code uses Diesel DSL exclusively.

pub mod audit_trail;
pub mod directory;
pub mod incidents;
pub mod observations;
pub mod permits;
pub mod safety_audits;
pub mod sequence;

// Re-export backend-specific mutation functions used by lib.rs
pub use audit_trail::{record_event_mysql, record_event_sqlite};
pub use directory::{
    delete_department_mysql, delete_department_sqlite, delete_plant_mysql, delete_plant_sqlite,
    delete_user_account_mysql, delete_user_account_sqlite, insert_department_mysql,
    insert_department_sqlite, insert_plant_mysql, insert_plant_sqlite, insert_user_account_mysql,
    insert_user_account_sqlite, update_department_mysql, update_department_sqlite,
    update_plant_mysql, update_plant_sqlite, update_user_account_mysql, update_user_account_sqlite,
};
pub use incidents::{
    delete_incident_mysql, delete_incident_sqlite, insert_incident_mysql, insert_incident_sqlite,
    update_incident_mysql, update_incident_sqlite, update_incident_status_mysql,
    update_incident_status_sqlite,
};
pub use observations::{
    delete_observation_mysql, delete_observation_sqlite, insert_observation_mysql,
    insert_observation_sqlite, update_observation_mysql, update_observation_sqlite,
    update_observation_status_mysql, update_observation_status_sqlite,
};
pub use permits::{
    delete_permit_mysql, delete_permit_sqlite, insert_permit_mysql, insert_permit_sqlite,
    update_permit_mysql, update_permit_sqlite, update_permit_status_mysql,
    update_permit_status_sqlite,
};
pub use safety_audits::{
    delete_safety_audit_mysql, delete_safety_audit_sqlite, insert_safety_audit_mysql,
    insert_safety_audit_sqlite, update_safety_audit_mysql, update_safety_audit_sqlite,
    update_safety_audit_status_mysql, update_safety_audit_status_sqlite,
};
pub use sequence::{next_sequence_value_mysql, next_sequence_value_sqlite};
