// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Permit service tests covering creation, worker rosters, the
//! approval lifecycle, deletion, and statistics.

use sitesafe::{PermitInfo, PermitStatistics};

use crate::{
    ApiError, AuditEventInfo, CreatePermitRequest, PermitStatusRequest, SearchFilter,
    UpdatePermitRequest, create_permit, delete_permit, permit_history, permit_statistics,
    update_permit, update_permit_status,
};

use super::helpers::{TestSite, create_test_site, permit_request};

fn advance(
    site: &mut TestSite,
    permit_id: i64,
    status: &str,
    approved_by: Option<i64>,
) -> PermitInfo {
    let request: PermitStatusRequest = PermitStatusRequest {
        status: String::from(status),
        approved_by,
        approval_notes: None,
        note: None,
        performed_by: String::from("rosa.vega"),
    };
    update_permit_status(&mut site.persistence, permit_id, request)
        .expect("transition should succeed")
        .expect("permit should exist")
}

// ============================================================================
// Creation Tests
// ============================================================================

#[test]
fn test_create_permit_assigns_number_and_draft_status() {
    let mut site: TestSite = create_test_site();
    let request: CreatePermitRequest = permit_request(&site);

    let created: PermitInfo =
        create_permit(&mut site.persistence, request).expect("create should succeed");

    assert!(created.permit_number.starts_with("PRM-"));
    assert!(created.permit_number.ends_with("-0001"));
    assert_eq!(created.status, "draft");
    assert_eq!(created.requested_by_name.as_deref(), Some("Rosa Vega"));
    assert_eq!(created.approved_by, None);
    assert_eq!(created.approved_at, None);
    assert_eq!(created.workers.len(), 1);
    assert_eq!(created.workers[0].user_id, site.assignee_id);
    assert_eq!(created.workers[0].full_name.as_deref(), Some("Omar Haddad"));
}

#[test]
fn test_create_permit_rejects_reversed_validity_window() {
    let mut site: TestSite = create_test_site();
    let mut request: CreatePermitRequest = permit_request(&site);
    request.valid_from = String::from("2026-03-01T16:00:00Z");
    request.valid_to = String::from("2026-03-01T07:00:00Z");

    match create_permit(&mut site.persistence, request) {
        Err(ApiError::DomainRuleViolation { rule, .. }) => {
            assert_eq!(rule, "validity_window");
        }
        other => panic!("Expected DomainRuleViolation for reversed window, got {other:?}"),
    }
}

#[test]
fn test_create_permit_rejects_duplicate_workers() {
    let mut site: TestSite = create_test_site();
    let mut request: CreatePermitRequest = permit_request(&site);
    request.worker_ids = vec![site.assignee_id, site.assignee_id];

    match create_permit(&mut site.persistence, request) {
        Err(ApiError::InvalidInput { field, .. }) => assert_eq!(field, "worker_ids"),
        other => panic!("Expected InvalidInput for duplicate workers, got {other:?}"),
    }
}

#[test]
fn test_create_permit_rejects_unknown_worker() {
    let mut site: TestSite = create_test_site();
    let mut request: CreatePermitRequest = permit_request(&site);
    request.worker_ids = vec![site.assignee_id, 9999];

    match create_permit(&mut site.persistence, request) {
        Err(ApiError::ResourceNotFound { message, .. }) => {
            assert!(message.contains("9999"));
        }
        other => panic!("Expected ResourceNotFound for unknown worker, got {other:?}"),
    }
}

// ============================================================================
// Approval Lifecycle Tests
// ============================================================================

#[test]
fn test_permit_approval_requires_approver() {
    let mut site: TestSite = create_test_site();
    let request: CreatePermitRequest = permit_request(&site);
    let created: PermitInfo =
        create_permit(&mut site.persistence, request).expect("create should succeed");
    advance(&mut site, created.permit_id, "pending_approval", None);

    let approve_request: PermitStatusRequest = PermitStatusRequest {
        status: String::from("approved"),
        approved_by: None,
        approval_notes: None,
        note: None,
        performed_by: String::from("rosa.vega"),
    };

    match update_permit_status(&mut site.persistence, created.permit_id, approve_request) {
        Err(ApiError::InvalidInput { field, message }) => {
            assert_eq!(field, "approved_by");
            assert!(message.contains("required when approving"));
        }
        other => panic!("Expected InvalidInput for missing approver, got {other:?}"),
    }
}

#[test]
fn test_permit_approval_stamps_approver_and_time() {
    let mut site: TestSite = create_test_site();
    let request: CreatePermitRequest = permit_request(&site);
    let created: PermitInfo =
        create_permit(&mut site.persistence, request).expect("create should succeed");
    advance(&mut site, created.permit_id, "pending_approval", None);

    let approve_request: PermitStatusRequest = PermitStatusRequest {
        status: String::from("approved"),
        approved_by: Some(site.reporter_id),
        approval_notes: Some(String::from("Fire watch assigned for the full window")),
        note: None,
        performed_by: String::from("rosa.vega"),
    };
    let approved: PermitInfo =
        update_permit_status(&mut site.persistence, created.permit_id, approve_request)
            .expect("transition should succeed")
            .expect("permit should exist");

    assert_eq!(approved.status, "approved");
    assert_eq!(approved.approved_by, Some(site.reporter_id));
    assert_eq!(approved.approved_by_name.as_deref(), Some("Rosa Vega"));
    assert!(approved.approved_at.is_some());
    assert_eq!(
        approved.approval_notes.as_deref(),
        Some("Fire watch assigned for the full window")
    );
}

#[test]
fn test_permit_rejects_approver_outside_approval() {
    let mut site: TestSite = create_test_site();
    let request: CreatePermitRequest = permit_request(&site);
    let created: PermitInfo =
        create_permit(&mut site.persistence, request).expect("create should succeed");

    let submit_request: PermitStatusRequest = PermitStatusRequest {
        status: String::from("pending_approval"),
        approved_by: Some(site.reporter_id),
        approval_notes: None,
        note: None,
        performed_by: String::from("rosa.vega"),
    };

    match update_permit_status(&mut site.persistence, created.permit_id, submit_request) {
        Err(ApiError::InvalidInput { field, message }) => {
            assert_eq!(field, "approved_by");
            assert!(message.contains("only recorded when approving"));
        }
        other => panic!("Expected InvalidInput for early approver, got {other:?}"),
    }
}

#[test]
fn test_permit_rejects_unknown_approver() {
    let mut site: TestSite = create_test_site();
    let request: CreatePermitRequest = permit_request(&site);
    let created: PermitInfo =
        create_permit(&mut site.persistence, request).expect("create should succeed");
    advance(&mut site, created.permit_id, "pending_approval", None);

    let approve_request: PermitStatusRequest = PermitStatusRequest {
        status: String::from("approved"),
        approved_by: Some(9999),
        approval_notes: None,
        note: None,
        performed_by: String::from("rosa.vega"),
    };

    match update_permit_status(&mut site.persistence, created.permit_id, approve_request) {
        Err(ApiError::ResourceNotFound { resource_type, .. }) => {
            assert_eq!(resource_type, "User account");
        }
        other => panic!("Expected ResourceNotFound for unknown approver, got {other:?}"),
    }
}

#[test]
fn test_permit_can_return_to_draft_for_rework() {
    let mut site: TestSite = create_test_site();
    let request: CreatePermitRequest = permit_request(&site);
    let created: PermitInfo =
        create_permit(&mut site.persistence, request).expect("create should succeed");
    advance(&mut site, created.permit_id, "pending_approval", None);

    let reworked: PermitInfo = advance(&mut site, created.permit_id, "draft", None);

    assert_eq!(reworked.status, "draft");
    assert_eq!(reworked.approved_by, None);
    assert_eq!(reworked.approved_at, None);
    assert_eq!(reworked.closed_at, None);
}

#[test]
fn test_permit_expiry_stamps_closed_at() {
    let mut site: TestSite = create_test_site();
    let request: CreatePermitRequest = permit_request(&site);
    let created: PermitInfo =
        create_permit(&mut site.persistence, request).expect("create should succeed");

    let approver_id: i64 = site.reporter_id;
    advance(&mut site, created.permit_id, "pending_approval", None);
    advance(&mut site, created.permit_id, "approved", Some(approver_id));
    advance(&mut site, created.permit_id, "active", None);
    let expired: PermitInfo = advance(&mut site, created.permit_id, "expired", None);

    assert_eq!(expired.status, "expired");
    assert!(expired.closed_at.is_some());
    // Approval details stay on the record after expiry.
    assert_eq!(expired.approved_by, Some(site.reporter_id));
}

#[test]
fn test_cancelled_permit_is_terminal() {
    let mut site: TestSite = create_test_site();
    let request: CreatePermitRequest = permit_request(&site);
    let created: PermitInfo =
        create_permit(&mut site.persistence, request).expect("create should succeed");

    let cancelled: PermitInfo = advance(&mut site, created.permit_id, "cancelled", None);
    assert_eq!(cancelled.status, "cancelled");
    assert!(cancelled.closed_at.is_some());

    let revive_request: PermitStatusRequest = PermitStatusRequest {
        status: String::from("draft"),
        approved_by: None,
        approval_notes: None,
        note: None,
        performed_by: String::from("rosa.vega"),
    };
    match update_permit_status(&mut site.persistence, created.permit_id, revive_request) {
        Err(ApiError::DomainRuleViolation { rule, .. }) => {
            assert_eq!(rule, "status_lifecycle");
        }
        other => panic!("Expected DomainRuleViolation for reviving, got {other:?}"),
    }
}

// ============================================================================
// Update and Deletion Tests
// ============================================================================

#[test]
fn test_update_permit_replaces_worker_roster() {
    let mut site: TestSite = create_test_site();
    let request: CreatePermitRequest = permit_request(&site);
    let created: PermitInfo =
        create_permit(&mut site.persistence, request).expect("create should succeed");

    let update: UpdatePermitRequest = UpdatePermitRequest {
        title: None,
        description: None,
        kind: None,
        plant_id: None,
        department_id: None,
        requested_by: None,
        valid_from: None,
        valid_to: None,
        worker_ids: Some(vec![site.reporter_id]),
        updated_by: String::from("rosa.vega"),
    };
    let updated: PermitInfo = update_permit(&mut site.persistence, created.permit_id, update)
        .expect("update should succeed")
        .expect("permit should exist");

    assert_eq!(updated.workers.len(), 1);
    assert_eq!(updated.workers[0].user_id, site.reporter_id);
    assert_eq!(updated.workers[0].full_name.as_deref(), Some("Rosa Vega"));
}

#[test]
fn test_update_permit_rejects_reversed_window_after_merge() {
    let mut site: TestSite = create_test_site();
    let request: CreatePermitRequest = permit_request(&site);
    let created: PermitInfo =
        create_permit(&mut site.persistence, request).expect("create should succeed");

    // The stored window opens at 07:00, so this end predates the start.
    let update: UpdatePermitRequest = UpdatePermitRequest {
        title: None,
        description: None,
        kind: None,
        plant_id: None,
        department_id: None,
        requested_by: None,
        valid_from: None,
        valid_to: Some(String::from("2026-03-01T06:00:00Z")),
        worker_ids: None,
        updated_by: String::from("rosa.vega"),
    };

    match update_permit(&mut site.persistence, created.permit_id, update) {
        Err(ApiError::DomainRuleViolation { rule, .. }) => {
            assert_eq!(rule, "validity_window");
        }
        other => panic!("Expected DomainRuleViolation for reversed window, got {other:?}"),
    }
}

#[test]
fn test_delete_permit_keeps_audit_history() {
    let mut site: TestSite = create_test_site();
    let request: CreatePermitRequest = permit_request(&site);
    let created: PermitInfo =
        create_permit(&mut site.persistence, request).expect("create should succeed");

    delete_permit(&mut site.persistence, created.permit_id, "rosa.vega")
        .expect("delete should succeed")
        .expect("permit should exist");

    let events: Vec<AuditEventInfo> = permit_history(&mut site.persistence, created.permit_id)
        .expect("history should succeed")
        .expect("history should survive deletion");
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].action, "create");
    assert_eq!(events[1].action, "delete");
    assert_eq!(events[1].from_status.as_deref(), Some("draft"));
}

// ============================================================================
// Statistics Tests
// ============================================================================

#[test]
fn test_permit_statistics_counts_by_kind() {
    let mut site: TestSite = create_test_site();
    let first_request: CreatePermitRequest = permit_request(&site);
    let mut second_request: CreatePermitRequest = permit_request(&site);
    second_request.kind = String::from("electrical");
    second_request.worker_ids = vec![site.reporter_id];

    create_permit(&mut site.persistence, first_request).expect("create should succeed");
    let second: PermitInfo =
        create_permit(&mut site.persistence, second_request).expect("create should succeed");
    advance(&mut site, second.permit_id, "pending_approval", None);

    let statistics: PermitStatistics =
        permit_statistics(&mut site.persistence, &SearchFilter::default())
            .expect("statistics should succeed");

    assert_eq!(statistics.total, 2);
    assert_eq!(statistics.draft, 1);
    assert_eq!(statistics.pending_approval, 1);
    assert_eq!(statistics.by_kind.get("hot_work"), Some(&1));
    assert_eq!(statistics.by_kind.get("electrical"), Some(&1));
}
