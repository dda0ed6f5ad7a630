// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for permit persistence operations, including the worker roster.

use crate::tests::{TEST_TIMESTAMP, create_test_permit, create_test_persistence, seed_directory};
use crate::{NewPermit, PageSpec, PermitFilter, PersistenceError};
use sitesafe_domain::{PermitKind, PermitStatus};

fn seed_extra_workers(db: &mut crate::Persistence) -> (i64, i64) {
    let first = db
        .insert_user_account(
            "Jonas Weber",
            "jonas.weber@example.com",
            Some(String::from("Welder")),
            TEST_TIMESTAMP,
        )
        .unwrap();
    let second = db
        .insert_user_account(
            "Priya Nair",
            "priya.nair@example.com",
            Some(String::from("Fire watch")),
            TEST_TIMESTAMP,
        )
        .unwrap();
    (first, second)
}

#[test]
fn test_insert_and_get_permit_with_roster() {
    let mut db = create_test_persistence();
    let (plant_id, department_id, user_id) = seed_directory(&mut db);
    let (welder_id, watcher_id) = seed_extra_workers(&mut db);

    let permit = create_test_permit(
        plant_id,
        department_id,
        user_id,
        vec![watcher_id, welder_id],
    );
    let permit_id = db
        .insert_permit(&NewPermit::from(&permit), &permit.worker_ids)
        .unwrap();

    let stored = db.get_permit(permit_id).unwrap().unwrap();
    assert_eq!(stored.permit_id, Some(permit_id));
    assert_eq!(stored.permit_number, "PRM-2026-0001");
    assert_eq!(stored.kind, PermitKind::HotWork);
    assert_eq!(stored.status, PermitStatus::Draft);
    assert_eq!(stored.valid_from, "2026-03-10T06:00:00Z");
    assert_eq!(stored.valid_to, "2026-03-10T18:00:00Z");
    // The roster comes back ordered by user ID
    assert_eq!(stored.worker_ids, vec![welder_id, watcher_id]);
}

#[test]
fn test_insert_permit_with_empty_roster() {
    let mut db = create_test_persistence();
    let (plant_id, department_id, user_id) = seed_directory(&mut db);

    let permit = create_test_permit(plant_id, department_id, user_id, Vec::new());
    let permit_id = db.insert_permit(&NewPermit::from(&permit), &[]).unwrap();

    let stored = db.get_permit(permit_id).unwrap().unwrap();
    assert!(stored.worker_ids.is_empty());
}

#[test]
fn test_insert_permit_with_unknown_worker_rolls_back() {
    let mut db = create_test_persistence();
    let (plant_id, department_id, user_id) = seed_directory(&mut db);

    let permit = create_test_permit(plant_id, department_id, user_id, vec![999]);
    let result = db.insert_permit(&NewPermit::from(&permit), &permit.worker_ids);

    assert!(matches!(result, Err(PersistenceError::ForeignKeyViolation(_))));

    // The permit row itself must not survive the failed roster insert
    let (_, total) = db
        .list_permits(&PermitFilter::default(), &PageSpec::default())
        .unwrap();
    assert_eq!(total, 0);
}

#[test]
fn test_update_permit_replaces_roster() {
    let mut db = create_test_persistence();
    let (plant_id, department_id, user_id) = seed_directory(&mut db);
    let (welder_id, watcher_id) = seed_extra_workers(&mut db);

    let mut permit = create_test_permit(plant_id, department_id, user_id, vec![welder_id]);
    let permit_id = db
        .insert_permit(&NewPermit::from(&permit), &permit.worker_ids)
        .unwrap();

    // Swap the roster to the other two workers
    permit.worker_ids = vec![watcher_id, user_id];
    permit.updated_at = String::from("2026-03-02T09:00:00Z");
    permit.updated_by = String::from("admin");

    let rows = db.update_permit(permit_id, &permit).unwrap();
    assert_eq!(rows, 1);

    let stored = db.get_permit(permit_id).unwrap().unwrap();
    assert_eq!(stored.worker_ids, vec![user_id, watcher_id]);
}

#[test]
fn test_update_nonexistent_permit_affects_zero_rows() {
    let mut db = create_test_persistence();
    let (plant_id, department_id, user_id) = seed_directory(&mut db);

    let permit = create_test_permit(plant_id, department_id, user_id, Vec::new());

    let rows = db.update_permit(999, &permit).unwrap();
    assert_eq!(rows, 0);
}

#[test]
fn test_permit_approval_sets_approval_fields() {
    let mut db = create_test_persistence();
    let (plant_id, department_id, user_id) = seed_directory(&mut db);

    let permit = create_test_permit(plant_id, department_id, user_id, Vec::new());
    let permit_id = db.insert_permit(&NewPermit::from(&permit), &[]).unwrap();

    db.update_permit_status(
        permit_id,
        "pending_approval",
        None,
        None,
        None,
        None,
        "2026-03-02T09:00:00Z",
        "dana.reyes",
    )
    .unwrap();

    db.update_permit_status(
        permit_id,
        "approved",
        Some(user_id),
        Some(String::from("2026-03-03T11:00:00Z")),
        Some(String::from("Fire watch confirmed for the full window.")),
        None,
        "2026-03-03T11:00:00Z",
        "admin",
    )
    .unwrap();

    let stored = db.get_permit(permit_id).unwrap().unwrap();
    assert_eq!(stored.status, PermitStatus::Approved);
    assert_eq!(stored.approved_by, Some(user_id));
    assert_eq!(stored.approved_at.as_deref(), Some("2026-03-03T11:00:00Z"));
    assert_eq!(
        stored.approval_notes.as_deref(),
        Some("Fire watch confirmed for the full window.")
    );
}

#[test]
fn test_permit_bounce_to_draft_clears_approval_fields() {
    let mut db = create_test_persistence();
    let (plant_id, department_id, user_id) = seed_directory(&mut db);

    let permit = create_test_permit(plant_id, department_id, user_id, Vec::new());
    let permit_id = db.insert_permit(&NewPermit::from(&permit), &[]).unwrap();

    db.update_permit_status(
        permit_id,
        "approved",
        Some(user_id),
        Some(String::from("2026-03-03T11:00:00Z")),
        None,
        None,
        "2026-03-03T11:00:00Z",
        "admin",
    )
    .unwrap();

    // Back to draft; the approval stamp must clear
    db.update_permit_status(
        permit_id,
        "draft",
        None,
        None,
        None,
        None,
        "2026-03-04T08:00:00Z",
        "admin",
    )
    .unwrap();

    let stored = db.get_permit(permit_id).unwrap().unwrap();
    assert_eq!(stored.status, PermitStatus::Draft);
    assert!(stored.approved_by.is_none());
    assert!(stored.approved_at.is_none());
}

#[test]
fn test_list_permits_attaches_rosters() {
    let mut db = create_test_persistence();
    let (plant_id, department_id, user_id) = seed_directory(&mut db);
    let (welder_id, watcher_id) = seed_extra_workers(&mut db);

    let first = create_test_permit(plant_id, department_id, user_id, vec![welder_id, watcher_id]);
    let first_id = db
        .insert_permit(&NewPermit::from(&first), &first.worker_ids)
        .unwrap();

    let mut second = create_test_permit(plant_id, department_id, user_id, Vec::new());
    second.permit_number = String::from("PRM-2026-0002");
    second.kind = PermitKind::Electrical;
    let second_id = db
        .insert_permit(&NewPermit::from(&second), &second.worker_ids)
        .unwrap();

    let (page, total) = db
        .list_permits(&PermitFilter::default(), &PageSpec::default())
        .unwrap();
    assert_eq!(total, 2);

    let first_row = page.iter().find(|p| p.permit_id == Some(first_id)).unwrap();
    assert_eq!(first_row.worker_ids, vec![welder_id, watcher_id]);

    let second_row = page.iter().find(|p| p.permit_id == Some(second_id)).unwrap();
    assert!(second_row.worker_ids.is_empty());
}

#[test]
fn test_list_permits_filters_by_kind() {
    let mut db = create_test_persistence();
    let (plant_id, department_id, user_id) = seed_directory(&mut db);

    for (n, kind) in [
        (1, PermitKind::HotWork),
        (2, PermitKind::ConfinedSpace),
        (3, PermitKind::HotWork),
    ] {
        let mut permit = create_test_permit(plant_id, department_id, user_id, Vec::new());
        permit.permit_number = format!("PRM-2026-{n:04}");
        permit.kind = kind;
        db.insert_permit(&NewPermit::from(&permit), &[]).unwrap();
    }

    let filter = PermitFilter {
        kinds: vec![String::from("hot_work")],
        ..PermitFilter::default()
    };
    let (page, total) = db.list_permits(&filter, &PageSpec::default()).unwrap();

    assert_eq!(total, 2);
    assert!(page.iter().all(|p| p.kind == PermitKind::HotWork));
}

#[test]
fn test_count_permits_by_status_and_kind() {
    let mut db = create_test_persistence();
    let (plant_id, department_id, user_id) = seed_directory(&mut db);

    for (n, kind) in [
        (1, PermitKind::HotWork),
        (2, PermitKind::WorkAtHeight),
        (3, PermitKind::HotWork),
    ] {
        let mut permit = create_test_permit(plant_id, department_id, user_id, Vec::new());
        permit.permit_number = format!("PRM-2026-{n:04}");
        permit.kind = kind;
        db.insert_permit(&NewPermit::from(&permit), &[]).unwrap();
    }

    let by_status = db.count_permits_by_status(&PermitFilter::default()).unwrap();
    assert!(by_status.contains(&(String::from("draft"), 3)));

    let by_kind = db.count_permits_by_kind(&PermitFilter::default()).unwrap();
    assert!(by_kind.contains(&(String::from("hot_work"), 2)));
    assert!(by_kind.contains(&(String::from("work_at_height"), 1)));
}

#[test]
fn test_delete_permit_removes_roster() {
    let mut db = create_test_persistence();
    let (plant_id, department_id, user_id) = seed_directory(&mut db);
    let (welder_id, _) = seed_extra_workers(&mut db);

    let permit = create_test_permit(plant_id, department_id, user_id, vec![welder_id]);
    let permit_id = db
        .insert_permit(&NewPermit::from(&permit), &permit.worker_ids)
        .unwrap();

    let rows = db.delete_permit(permit_id).unwrap();
    assert_eq!(rows, 1);
    assert!(db.get_permit(permit_id).unwrap().is_none());

    // The roster rows are gone too, so the worker can be deleted
    let deleted = db.delete_user_account(welder_id).unwrap();
    assert_eq!(deleted, 1);
}
