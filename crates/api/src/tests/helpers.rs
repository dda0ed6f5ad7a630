// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use sitesafe_persistence::SqlitePersistence;

use crate::request_response::{
    CreateIncidentRequest, CreateObservationRequest, CreatePermitRequest,
    CreateSafetyAuditRequest,
};

/// An in-memory database with the reference rows every test needs: one
/// plant, one department, and two user accounts.
pub struct TestSite {
    pub persistence: SqlitePersistence,
    pub plant_id: i64,
    pub department_id: i64,
    pub reporter_id: i64,
    pub assignee_id: i64,
}

pub fn create_test_site() -> TestSite {
    let mut persistence: SqlitePersistence =
        SqlitePersistence::new_in_memory().expect("Failed to create in-memory persistence");
    let plant_id: i64 = persistence
        .insert_plant("North Plant", "NORTH", "2026-01-01T00:00:00Z")
        .expect("Failed to insert plant");
    let department_id: i64 = persistence
        .insert_department("Maintenance", "MAINT", "2026-01-01T00:00:00Z")
        .expect("Failed to insert department");
    let reporter_id: i64 = persistence
        .insert_user_account(
            "Rosa Vega",
            "rosa.vega@example.com",
            Some(String::from("Shift Supervisor")),
            "2026-01-01T00:00:00Z",
        )
        .expect("Failed to insert user account");
    let assignee_id: i64 = persistence
        .insert_user_account(
            "Omar Haddad",
            "omar.haddad@example.com",
            None,
            "2026-01-01T00:00:00Z",
        )
        .expect("Failed to insert user account");
    TestSite {
        persistence,
        plant_id,
        department_id,
        reporter_id,
        assignee_id,
    }
}

pub fn observation_request(site: &TestSite) -> CreateObservationRequest {
    CreateObservationRequest {
        title: String::from("Blocked fire exit"),
        description: String::from("Pallets stacked in front of the east fire exit"),
        kind: String::from("unsafe_condition"),
        hazard_category: String::from("fire"),
        priority: String::from("high"),
        plant_id: site.plant_id,
        department_id: site.department_id,
        reported_by: site.reporter_id,
        assigned_to: Some(site.assignee_id),
        due_date: Some(String::from("2026-04-01")),
        created_by: String::from("rosa.vega"),
    }
}

pub fn incident_request(site: &TestSite) -> CreateIncidentRequest {
    CreateIncidentRequest {
        title: String::from("Forklift collision"),
        description: String::from("Forklift clipped a racking upright in aisle 4"),
        kind: String::from("property_damage"),
        severity: String::from("moderate"),
        plant_id: site.plant_id,
        department_id: site.department_id,
        occurred_at: String::from("2026-02-10T06:45:00Z"),
        reported_by: site.reporter_id,
        created_by: String::from("rosa.vega"),
    }
}

pub fn safety_audit_request(site: &TestSite) -> CreateSafetyAuditRequest {
    CreateSafetyAuditRequest {
        title: String::from("Quarterly walkthrough"),
        description: String::from("Scheduled quarterly audit of the maintenance shop"),
        plant_id: site.plant_id,
        department_id: site.department_id,
        auditor_id: site.assignee_id,
        scheduled_date: String::from("2026-03-15"),
        created_by: String::from("rosa.vega"),
    }
}

pub fn permit_request(site: &TestSite) -> CreatePermitRequest {
    CreatePermitRequest {
        title: String::from("Weld racking repair"),
        description: String::from("Hot work on the damaged upright in aisle 4"),
        kind: String::from("hot_work"),
        plant_id: site.plant_id,
        department_id: site.department_id,
        requested_by: site.reporter_id,
        valid_from: String::from("2026-03-01T07:00:00Z"),
        valid_to: String::from("2026-03-01T16:00:00Z"),
        worker_ids: vec![site.assignee_id],
        created_by: String::from("rosa.vega"),
    }
}
