// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    DepartmentInfo, NameIndex, PlantInfo, UserAccountInfo, project_incident, project_observation,
    project_permit, project_safety_audit,
};
use sitesafe_domain::{
    AuditStatus, Department, Incident, IncidentKind, IncidentStatus, Observation, ObservationKind,
    ObservationStatus, Permit, PermitKind, PermitStatus, Plant, Priority, SafetyAudit, Severity,
    StatusLifecycle, UserAccount,
};

const NOW: &str = "2026-03-15T08:30:00Z";

fn sample_names() -> NameIndex {
    let mut names = NameIndex::new();
    names.plants.insert(1, String::from("Frankfurt Works"));
    names.departments.insert(2, String::from("Maintenance"));
    names.users.insert(3, String::from("Dana Reyes"));
    names.users.insert(4, String::from("Jonas Weber"));
    names
}

fn sample_observation() -> Observation {
    Observation {
        observation_id: Some(10),
        ticket_number: String::from("OBS-2026-0001"),
        title: String::from("Blocked fire exit in hall B"),
        description: String::from("Pallets stacked in front of the east fire exit."),
        kind: ObservationKind::UnsafeCondition,
        hazard_category: String::from("housekeeping"),
        priority: Priority::High,
        status: ObservationStatus::initial(),
        plant_id: 1,
        department_id: 2,
        reported_by: 3,
        assigned_to: Some(4),
        due_date: Some(String::from("2026-03-20")),
        resolution_notes: None,
        closed_at: None,
        created_at: String::from(NOW),
        created_by: String::from("dana.reyes"),
        updated_at: String::from(NOW),
        updated_by: String::from("dana.reyes"),
    }
}

fn sample_incident() -> Incident {
    Incident {
        incident_id: Some(20),
        incident_number: String::from("INC-2026-0001"),
        title: String::from("Forklift collision with racking"),
        description: String::from("Forklift clipped the end frame of rack 14."),
        kind: IncidentKind::PropertyDamage,
        severity: Severity::Moderate,
        status: IncidentStatus::UnderInvestigation,
        plant_id: 1,
        department_id: 2,
        occurred_at: String::from("2026-03-14T14:30:00Z"),
        reported_by: 3,
        investigated_by: Some(4),
        findings: None,
        root_cause: None,
        closed_at: None,
        created_at: String::from(NOW),
        created_by: String::from("dana.reyes"),
        updated_at: String::from(NOW),
        updated_by: String::from("dana.reyes"),
    }
}

fn sample_audit() -> SafetyAudit {
    SafetyAudit {
        audit_id: Some(30),
        audit_number: String::from("AUD-2026-0001"),
        title: String::from("Quarterly walkthrough, hall B"),
        description: String::from("Scheduled quarterly walkthrough."),
        status: AuditStatus::Completed,
        plant_id: 1,
        department_id: 2,
        auditor_id: 4,
        scheduled_date: String::from("2026-03-10"),
        completed_at: Some(String::from(NOW)),
        score: Some(87),
        summary: Some(String::from("Two minor findings.")),
        closed_at: None,
        created_at: String::from(NOW),
        created_by: String::from("jonas.weber"),
        updated_at: String::from(NOW),
        updated_by: String::from("jonas.weber"),
    }
}

fn sample_permit() -> Permit {
    Permit {
        permit_id: Some(40),
        permit_number: String::from("PRM-2026-0001"),
        title: String::from("Hot work on pipe bridge"),
        description: String::from("Welding repair on the cooling line."),
        kind: PermitKind::HotWork,
        status: PermitStatus::Approved,
        plant_id: 1,
        department_id: 2,
        requested_by: 3,
        approved_by: Some(4),
        approved_at: Some(String::from(NOW)),
        approval_notes: Some(String::from("Fire watch posted")),
        valid_from: String::from("2026-03-16T06:00:00Z"),
        valid_to: String::from("2026-03-16T18:00:00Z"),
        worker_ids: vec![3, 4],
        closed_at: None,
        created_at: String::from(NOW),
        created_by: String::from("dana.reyes"),
        updated_at: String::from(NOW),
        updated_by: String::from("jonas.weber"),
    }
}

#[test]
fn test_observation_projection_resolves_names() {
    let info = project_observation(&sample_observation(), &sample_names());

    assert_eq!(info.observation_id, 10);
    assert_eq!(info.ticket_number, "OBS-2026-0001");
    assert_eq!(info.kind, "unsafe_condition");
    assert_eq!(info.priority, "high");
    assert_eq!(info.status, "open");
    assert_eq!(info.plant_name, Some(String::from("Frankfurt Works")));
    assert_eq!(info.department_name, Some(String::from("Maintenance")));
    assert_eq!(info.reported_by_name, Some(String::from("Dana Reyes")));
    assert_eq!(info.assigned_to_name, Some(String::from("Jonas Weber")));
}

#[test]
fn test_observation_projection_carries_sla_for_priority() {
    let mut observation = sample_observation();
    observation.priority = Priority::Critical;

    let info = project_observation(&observation, &sample_names());

    assert_eq!(info.sla_hours, 4);
}

#[test]
fn test_missing_referents_project_to_none() {
    let info = project_observation(&sample_observation(), &NameIndex::new());

    // Ids survive even when the names cannot be resolved.
    assert_eq!(info.plant_id, 1);
    assert_eq!(info.plant_name, None);
    assert_eq!(info.department_name, None);
    assert_eq!(info.reported_by_name, None);
    assert_eq!(info.assigned_to_name, None);
}

#[test]
fn test_unassigned_observation_has_no_assignee_name() {
    let mut observation = sample_observation();
    observation.assigned_to = None;

    let info = project_observation(&observation, &sample_names());

    assert_eq!(info.assigned_to, None);
    assert_eq!(info.assigned_to_name, None);
}

#[test]
fn test_incident_projection_resolves_investigator() {
    let info = project_incident(&sample_incident(), &sample_names());

    assert_eq!(info.incident_id, 20);
    assert_eq!(info.kind, "property_damage");
    assert_eq!(info.severity, "moderate");
    assert_eq!(info.status, "under_investigation");
    assert_eq!(info.investigated_by, Some(4));
    assert_eq!(info.investigated_by_name, Some(String::from("Jonas Weber")));
}

#[test]
fn test_safety_audit_projection_keeps_score() {
    let info = project_safety_audit(&sample_audit(), &sample_names());

    assert_eq!(info.audit_id, 30);
    assert_eq!(info.status, "completed");
    assert_eq!(info.auditor_name, Some(String::from("Jonas Weber")));
    assert_eq!(info.score, Some(87));
    assert_eq!(info.summary, Some(String::from("Two minor findings.")));
}

#[test]
fn test_permit_projection_builds_worker_roster() {
    let info = project_permit(&sample_permit(), &sample_names());

    assert_eq!(info.permit_id, 40);
    assert_eq!(info.kind, "hot_work");
    assert_eq!(info.approved_by_name, Some(String::from("Jonas Weber")));
    assert_eq!(info.workers.len(), 2);
    assert_eq!(info.workers[0].user_id, 3);
    assert_eq!(info.workers[0].full_name, Some(String::from("Dana Reyes")));
    assert_eq!(info.workers[1].user_id, 4);
    assert_eq!(info.workers[1].full_name, Some(String::from("Jonas Weber")));
}

#[test]
fn test_permit_roster_keeps_unknown_workers() {
    let mut permit = sample_permit();
    permit.worker_ids = vec![3, 99];

    let info = project_permit(&permit, &sample_names());

    // The roster entry survives with no name rather than vanishing.
    assert_eq!(info.workers.len(), 2);
    assert_eq!(info.workers[1].user_id, 99);
    assert_eq!(info.workers[1].full_name, None);
}

#[test]
fn test_unsaved_entity_projects_id_zero() {
    let mut observation = sample_observation();
    observation.observation_id = None;

    let info = project_observation(&observation, &sample_names());

    assert_eq!(info.observation_id, 0);
}

#[test]
fn test_directory_infos_mirror_entities() {
    let plant = Plant {
        plant_id: Some(1),
        name: String::from("Frankfurt Works"),
        code: String::from("FRK1"),
        created_at: String::from(NOW),
        updated_at: String::from(NOW),
    };
    let department = Department {
        department_id: Some(2),
        name: String::from("Maintenance"),
        code: String::from("MAINT"),
        created_at: String::from(NOW),
        updated_at: String::from(NOW),
    };
    let user = UserAccount {
        user_id: Some(3),
        full_name: String::from("Dana Reyes"),
        email: String::from("dana.reyes@example.com"),
        job_title: Some(String::from("Technician")),
        created_at: String::from(NOW),
        updated_at: String::from(NOW),
    };

    let plant_info = PlantInfo::from(&plant);
    assert_eq!(plant_info.plant_id, 1);
    assert_eq!(plant_info.code, "FRK1");

    let department_info = DepartmentInfo::from(&department);
    assert_eq!(department_info.department_id, 2);
    assert_eq!(department_info.name, "Maintenance");

    let user_info = UserAccountInfo::from(&user);
    assert_eq!(user_info.user_id, 3);
    assert_eq!(user_info.email, "dana.reyes@example.com");
    assert_eq!(user_info.job_title, Some(String::from("Technician")));
}
