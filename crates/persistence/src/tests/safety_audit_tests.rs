// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for safety audit persistence operations.

use crate::tests::{create_test_persistence, create_test_safety_audit, seed_directory};
use crate::{NewSafetyAudit, PageSpec, SafetyAuditFilter};
use sitesafe_domain::AuditStatus;

#[test]
fn test_insert_and_get_safety_audit() {
    let mut db = create_test_persistence();
    let (plant_id, department_id, user_id) = seed_directory(&mut db);

    let audit = create_test_safety_audit(plant_id, department_id, user_id);
    let audit_id = db.insert_safety_audit(&NewSafetyAudit::from(&audit)).unwrap();

    let stored = db.get_safety_audit(audit_id).unwrap().unwrap();
    assert_eq!(stored.audit_id, Some(audit_id));
    assert_eq!(stored.audit_number, "AUD-2026-0001");
    assert_eq!(stored.status, AuditStatus::Planned);
    assert_eq!(stored.auditor_id, user_id);
    assert_eq!(stored.scheduled_date, "2026-03-20");
    assert!(stored.score.is_none());
    assert!(stored.completed_at.is_none());
}

#[test]
fn test_audit_completion_records_score_and_summary() {
    let mut db = create_test_persistence();
    let (plant_id, department_id, user_id) = seed_directory(&mut db);

    let audit = create_test_safety_audit(plant_id, department_id, user_id);
    let audit_id = db.insert_safety_audit(&NewSafetyAudit::from(&audit)).unwrap();

    db.update_safety_audit_status(
        audit_id,
        "in_progress",
        None,
        None,
        None,
        None,
        "2026-03-20T08:00:00Z",
        "admin",
    )
    .unwrap();

    db.update_safety_audit_status(
        audit_id,
        "completed",
        Some(String::from("2026-03-20T16:00:00Z")),
        Some(87),
        Some(String::from("Two minor findings, both corrected on the spot.")),
        None,
        "2026-03-20T16:00:00Z",
        "admin",
    )
    .unwrap();

    let stored = db.get_safety_audit(audit_id).unwrap().unwrap();
    assert_eq!(stored.status, AuditStatus::Completed);
    assert_eq!(stored.completed_at.as_deref(), Some("2026-03-20T16:00:00Z"));
    assert_eq!(stored.score, Some(87));
    assert_eq!(
        stored.summary.as_deref(),
        Some("Two minor findings, both corrected on the spot.")
    );
}

#[test]
fn test_audit_status_rollback_clears_completion_fields() {
    let mut db = create_test_persistence();
    let (plant_id, department_id, user_id) = seed_directory(&mut db);

    let audit = create_test_safety_audit(plant_id, department_id, user_id);
    let audit_id = db.insert_safety_audit(&NewSafetyAudit::from(&audit)).unwrap();

    db.update_safety_audit_status(
        audit_id,
        "completed",
        Some(String::from("2026-03-20T16:00:00Z")),
        Some(87),
        Some(String::from("Done.")),
        None,
        "2026-03-20T16:00:00Z",
        "admin",
    )
    .unwrap();

    // Back to in_progress; completion data must clear
    db.update_safety_audit_status(
        audit_id,
        "in_progress",
        None,
        None,
        None,
        None,
        "2026-03-21T08:00:00Z",
        "admin",
    )
    .unwrap();

    let stored = db.get_safety_audit(audit_id).unwrap().unwrap();
    assert_eq!(stored.status, AuditStatus::InProgress);
    assert!(stored.completed_at.is_none());
    assert!(stored.score.is_none());
    assert!(stored.summary.is_none());
}

#[test]
fn test_update_safety_audit_rewrites_editable_fields() {
    let mut db = create_test_persistence();
    let (plant_id, department_id, user_id) = seed_directory(&mut db);

    let mut audit = create_test_safety_audit(plant_id, department_id, user_id);
    let audit_id = db.insert_safety_audit(&NewSafetyAudit::from(&audit)).unwrap();

    audit.title = String::from("Quarterly walkthrough, hall C");
    audit.scheduled_date = String::from("2026-03-27");
    audit.updated_at = String::from("2026-03-02T09:00:00Z");
    audit.updated_by = String::from("admin");

    let rows = db.update_safety_audit(audit_id, &audit).unwrap();
    assert_eq!(rows, 1);

    let stored = db.get_safety_audit(audit_id).unwrap().unwrap();
    assert_eq!(stored.title, "Quarterly walkthrough, hall C");
    assert_eq!(stored.scheduled_date, "2026-03-27");
    assert_eq!(stored.audit_number, "AUD-2026-0001");
}

#[test]
fn test_count_overdue_safety_audits() {
    let mut db = create_test_persistence();
    let (plant_id, department_id, user_id) = seed_directory(&mut db);

    // Planned with a past date: overdue
    let mut late_planned = create_test_safety_audit(plant_id, department_id, user_id);
    late_planned.audit_number = String::from("AUD-2026-0001");
    late_planned.scheduled_date = String::from("2026-03-01");
    db.insert_safety_audit(&NewSafetyAudit::from(&late_planned))
        .unwrap();

    // In progress past its date: overdue
    let mut late_started = create_test_safety_audit(plant_id, department_id, user_id);
    late_started.audit_number = String::from("AUD-2026-0002");
    late_started.scheduled_date = String::from("2026-03-05");
    let started_id = db
        .insert_safety_audit(&NewSafetyAudit::from(&late_started))
        .unwrap();
    db.update_safety_audit_status(
        started_id,
        "in_progress",
        None,
        None,
        None,
        None,
        "2026-03-05T08:00:00Z",
        "admin",
    )
    .unwrap();

    // Completed past its date: no longer overdue
    let mut finished = create_test_safety_audit(plant_id, department_id, user_id);
    finished.audit_number = String::from("AUD-2026-0003");
    finished.scheduled_date = String::from("2026-03-02");
    let finished_id = db
        .insert_safety_audit(&NewSafetyAudit::from(&finished))
        .unwrap();
    db.update_safety_audit_status(
        finished_id,
        "completed",
        Some(String::from("2026-03-02T16:00:00Z")),
        Some(92),
        None,
        None,
        "2026-03-02T16:00:00Z",
        "admin",
    )
    .unwrap();

    // Planned for the future: not overdue
    let mut upcoming = create_test_safety_audit(plant_id, department_id, user_id);
    upcoming.audit_number = String::from("AUD-2026-0004");
    upcoming.scheduled_date = String::from("2026-06-01");
    db.insert_safety_audit(&NewSafetyAudit::from(&upcoming))
        .unwrap();

    let count = db
        .count_overdue_safety_audits(&SafetyAuditFilter::default(), "2026-04-15")
        .unwrap();
    assert_eq!(count, 2);
}

#[test]
fn test_safety_audit_scores_skips_unscored_audits() {
    let mut db = create_test_persistence();
    let (plant_id, department_id, user_id) = seed_directory(&mut db);

    for (n, score) in [(1, Some(80)), (2, None), (3, Some(94))] {
        let mut audit = create_test_safety_audit(plant_id, department_id, user_id);
        audit.audit_number = format!("AUD-2026-{n:04}");
        let audit_id = db.insert_safety_audit(&NewSafetyAudit::from(&audit)).unwrap();
        if let Some(score) = score {
            db.update_safety_audit_status(
                audit_id,
                "completed",
                Some(String::from("2026-03-20T16:00:00Z")),
                Some(score),
                None,
                None,
                "2026-03-20T16:00:00Z",
                "admin",
            )
            .unwrap();
        }
    }

    let mut scores = db.safety_audit_scores(&SafetyAuditFilter::default()).unwrap();
    scores.sort_unstable();
    assert_eq!(scores, vec![80, 94]);
}

#[test]
fn test_list_safety_audits_search_matches_title() {
    let mut db = create_test_persistence();
    let (plant_id, department_id, user_id) = seed_directory(&mut db);

    let mut walkthrough = create_test_safety_audit(plant_id, department_id, user_id);
    walkthrough.audit_number = String::from("AUD-2026-0001");
    db.insert_safety_audit(&NewSafetyAudit::from(&walkthrough))
        .unwrap();

    let mut ladder_check = create_test_safety_audit(plant_id, department_id, user_id);
    ladder_check.audit_number = String::from("AUD-2026-0002");
    ladder_check.title = String::from("Ladder register inspection");
    ladder_check.description = String::from("Annual check of all portable ladders.");
    db.insert_safety_audit(&NewSafetyAudit::from(&ladder_check))
        .unwrap();

    let filter = SafetyAuditFilter {
        search: Some(String::from("ladder")),
        ..SafetyAuditFilter::default()
    };
    let (page, total) = db.list_safety_audits(&filter, &PageSpec::default()).unwrap();

    assert_eq!(total, 1);
    assert_eq!(page[0].audit_number, "AUD-2026-0002");
}

#[test]
fn test_delete_safety_audit() {
    let mut db = create_test_persistence();
    let (plant_id, department_id, user_id) = seed_directory(&mut db);

    let audit = create_test_safety_audit(plant_id, department_id, user_id);
    let audit_id = db.insert_safety_audit(&NewSafetyAudit::from(&audit)).unwrap();

    let rows = db.delete_safety_audit(audit_id).unwrap();
    assert_eq!(rows, 1);
    assert!(db.get_safety_audit(audit_id).unwrap().is_none());
}
