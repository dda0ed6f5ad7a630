// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod initialization_tests;
mod permit_tests;
mod safety_audit_tests;
mod sequence_tests;

use sitesafe_domain::{
    AuditStatus, Incident, IncidentKind, IncidentStatus, Observation, ObservationKind,
    ObservationStatus, Permit, PermitKind, PermitStatus, Priority, SafetyAudit, Severity,
    StatusLifecycle,
};

use crate::Persistence;

pub const TEST_TIMESTAMP: &str = "2026-03-01T08:00:00Z";

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("in-memory database")
}

/// Seeds one plant, one department, and one user account; returns their IDs.
pub fn seed_directory(db: &mut Persistence) -> (i64, i64, i64) {
    let plant_id = db
        .insert_plant("Frankfurt Works", "FRK1", TEST_TIMESTAMP)
        .expect("insert plant");
    let department_id = db
        .insert_department("Maintenance", "MAINT", TEST_TIMESTAMP)
        .expect("insert department");
    let user_id = db
        .insert_user_account(
            "Dana Reyes",
            "dana.reyes@example.com",
            Some(String::from("Technician")),
            TEST_TIMESTAMP,
        )
        .expect("insert user account");
    (plant_id, department_id, user_id)
}

pub fn create_test_observation(plant_id: i64, department_id: i64, reported_by: i64) -> Observation {
    Observation {
        observation_id: None,
        ticket_number: String::from("OBS-2026-0001"),
        title: String::from("Blocked fire exit in hall B"),
        description: String::from("Pallets stacked in front of the east fire exit."),
        kind: ObservationKind::UnsafeCondition,
        hazard_category: String::from("housekeeping"),
        priority: Priority::High,
        status: ObservationStatus::initial(),
        plant_id,
        department_id,
        reported_by,
        assigned_to: None,
        due_date: Some(String::from("2026-03-15")),
        resolution_notes: None,
        closed_at: None,
        created_at: String::from(TEST_TIMESTAMP),
        created_by: String::from("dana.reyes"),
        updated_at: String::from(TEST_TIMESTAMP),
        updated_by: String::from("dana.reyes"),
    }
}

pub fn create_test_incident(plant_id: i64, department_id: i64, reported_by: i64) -> Incident {
    Incident {
        incident_id: None,
        incident_number: String::from("INC-2026-0001"),
        title: String::from("Forklift collision with racking"),
        description: String::from("Forklift clipped racking upright in aisle 4."),
        kind: IncidentKind::PropertyDamage,
        severity: Severity::Moderate,
        status: IncidentStatus::initial(),
        plant_id,
        department_id,
        occurred_at: String::from("2026-02-28T14:30:00Z"),
        reported_by,
        investigated_by: None,
        findings: None,
        root_cause: None,
        closed_at: None,
        created_at: String::from(TEST_TIMESTAMP),
        created_by: String::from("dana.reyes"),
        updated_at: String::from(TEST_TIMESTAMP),
        updated_by: String::from("dana.reyes"),
    }
}

pub fn create_test_safety_audit(plant_id: i64, department_id: i64, auditor_id: i64) -> SafetyAudit {
    SafetyAudit {
        audit_id: None,
        audit_number: String::from("AUD-2026-0001"),
        title: String::from("Quarterly walkthrough, hall B"),
        description: String::from("Scheduled quarterly safety walkthrough."),
        status: AuditStatus::initial(),
        plant_id,
        department_id,
        auditor_id,
        scheduled_date: String::from("2026-03-20"),
        completed_at: None,
        score: None,
        summary: None,
        closed_at: None,
        created_at: String::from(TEST_TIMESTAMP),
        created_by: String::from("dana.reyes"),
        updated_at: String::from(TEST_TIMESTAMP),
        updated_by: String::from("dana.reyes"),
    }
}

pub fn create_test_permit(
    plant_id: i64,
    department_id: i64,
    requested_by: i64,
    worker_ids: Vec<i64>,
) -> Permit {
    Permit {
        permit_id: None,
        permit_number: String::from("PRM-2026-0001"),
        title: String::from("Hot work on pipe bridge"),
        description: String::from("Welding repair on the hall B pipe bridge."),
        kind: PermitKind::HotWork,
        status: PermitStatus::initial(),
        plant_id,
        department_id,
        requested_by,
        approved_by: None,
        approved_at: None,
        approval_notes: None,
        valid_from: String::from("2026-03-10T06:00:00Z"),
        valid_to: String::from("2026-03-10T18:00:00Z"),
        closed_at: None,
        created_at: String::from(TEST_TIMESTAMP),
        created_by: String::from("dana.reyes"),
        updated_at: String::from(TEST_TIMESTAMP),
        updated_by: String::from("dana.reyes"),
        worker_ids,
    }
}
