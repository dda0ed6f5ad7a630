// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Observation service tests covering creation, field updates, status
//! transitions, deletion, history, and statistics.

use sitesafe::{ObservationInfo, ObservationStatistics};

use crate::{
    ApiError, AuditEventInfo, CreateObservationRequest, ObservationStatusRequest, PagedResult,
    SearchFilter, UpdateObservationRequest, create_observation, delete_observation,
    get_observation, list_observations, observation_history, observation_statistics,
    update_observation, update_observation_status,
};

use super::helpers::{TestSite, create_test_site, observation_request};

// ============================================================================
// Creation Tests
// ============================================================================

#[test]
fn test_create_observation_assigns_ticket_number_and_open_status() {
    let mut site: TestSite = create_test_site();
    let request: CreateObservationRequest = observation_request(&site);

    let created: ObservationInfo =
        create_observation(&mut site.persistence, request).expect("create should succeed");

    assert!(created.ticket_number.starts_with("OBS-"));
    assert!(created.ticket_number.ends_with("-0001"));
    assert_eq!(created.status, "open");
    assert_eq!(created.closed_at, None);
    assert_eq!(created.created_by, "rosa.vega");
}

#[test]
fn test_create_observation_resolves_directory_names() {
    let mut site: TestSite = create_test_site();
    let request: CreateObservationRequest = observation_request(&site);

    let created: ObservationInfo =
        create_observation(&mut site.persistence, request).expect("create should succeed");

    assert_eq!(created.plant_name.as_deref(), Some("North Plant"));
    assert_eq!(created.department_name.as_deref(), Some("Maintenance"));
    assert_eq!(created.reported_by_name.as_deref(), Some("Rosa Vega"));
    assert_eq!(created.assigned_to_name.as_deref(), Some("Omar Haddad"));
}

#[test]
fn test_create_observation_derives_sla_from_priority() {
    let mut site: TestSite = create_test_site();
    let mut request: CreateObservationRequest = observation_request(&site);
    request.priority = String::from("critical");

    let created: ObservationInfo =
        create_observation(&mut site.persistence, request).expect("create should succeed");

    assert_eq!(created.priority, "critical");
    assert_eq!(created.sla_hours, 4);
}

#[test]
fn test_ticket_numbers_increment_within_a_year() {
    let mut site: TestSite = create_test_site();
    let first_request: CreateObservationRequest = observation_request(&site);
    let second_request: CreateObservationRequest = observation_request(&site);

    let first: ObservationInfo =
        create_observation(&mut site.persistence, first_request).expect("create should succeed");
    let second: ObservationInfo =
        create_observation(&mut site.persistence, second_request).expect("create should succeed");

    assert!(first.ticket_number.ends_with("-0001"));
    assert!(second.ticket_number.ends_with("-0002"));
}

#[test]
fn test_create_observation_rejects_unknown_kind() {
    let mut site: TestSite = create_test_site();
    let mut request: CreateObservationRequest = observation_request(&site);
    request.kind = String::from("speculative");

    match create_observation(&mut site.persistence, request) {
        Err(ApiError::InvalidInput { field, message }) => {
            assert_eq!(field, "kind");
            assert!(message.contains("speculative"));
        }
        other => panic!("Expected InvalidInput for unknown kind, got {other:?}"),
    }
}

#[test]
fn test_create_observation_rejects_unknown_priority() {
    let mut site: TestSite = create_test_site();
    let mut request: CreateObservationRequest = observation_request(&site);
    request.priority = String::from("urgent");

    match create_observation(&mut site.persistence, request) {
        Err(ApiError::InvalidInput { field, .. }) => assert_eq!(field, "priority"),
        other => panic!("Expected InvalidInput for unknown priority, got {other:?}"),
    }
}

#[test]
fn test_create_observation_rejects_empty_title() {
    let mut site: TestSite = create_test_site();
    let mut request: CreateObservationRequest = observation_request(&site);
    request.title = String::from("   ");

    match create_observation(&mut site.persistence, request) {
        Err(ApiError::InvalidInput { field, message }) => {
            assert_eq!(field, "title");
            assert!(message.contains("must not be empty"));
        }
        other => panic!("Expected InvalidInput for empty title, got {other:?}"),
    }
}

#[test]
fn test_create_observation_rejects_unknown_plant() {
    let mut site: TestSite = create_test_site();
    let mut request: CreateObservationRequest = observation_request(&site);
    request.plant_id = 9999;

    match create_observation(&mut site.persistence, request) {
        Err(ApiError::ResourceNotFound { resource_type, .. }) => {
            assert_eq!(resource_type, "Plant");
        }
        other => panic!("Expected ResourceNotFound for unknown plant, got {other:?}"),
    }
}

#[test]
fn test_create_observation_rejects_unknown_assignee() {
    let mut site: TestSite = create_test_site();
    let mut request: CreateObservationRequest = observation_request(&site);
    request.assigned_to = Some(9999);

    match create_observation(&mut site.persistence, request) {
        Err(ApiError::ResourceNotFound { resource_type, .. }) => {
            assert_eq!(resource_type, "User account");
        }
        other => panic!("Expected ResourceNotFound for unknown assignee, got {other:?}"),
    }
}

#[test]
fn test_create_observation_rejects_malformed_due_date() {
    let mut site: TestSite = create_test_site();
    let mut request: CreateObservationRequest = observation_request(&site);
    request.due_date = Some(String::from("04/01/2026"));

    match create_observation(&mut site.persistence, request) {
        Err(ApiError::InvalidInput { field, .. }) => assert_eq!(field, "date"),
        other => panic!("Expected InvalidInput for malformed due date, got {other:?}"),
    }
}

#[test]
fn test_create_observation_records_creation_event() {
    let mut site: TestSite = create_test_site();
    let request: CreateObservationRequest = observation_request(&site);

    let created: ObservationInfo =
        create_observation(&mut site.persistence, request).expect("create should succeed");
    let events: Vec<AuditEventInfo> =
        observation_history(&mut site.persistence, created.observation_id)
            .expect("history should succeed")
            .expect("history should be present");

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, "create");
    assert_eq!(events[0].actor, "rosa.vega");
    assert_eq!(events[0].to_status.as_deref(), Some("open"));
    let details: &str = events[0].details.as_deref().unwrap_or_default();
    assert!(details.contains(&created.ticket_number));
}

// ============================================================================
// Retrieval Tests
// ============================================================================

#[test]
fn test_get_observation_returns_none_for_unknown_id() {
    let mut site: TestSite = create_test_site();

    let found: Option<ObservationInfo> =
        get_observation(&mut site.persistence, 9999).expect("lookup should succeed");

    assert!(found.is_none());
}

// ============================================================================
// Update Tests
// ============================================================================

#[test]
fn test_update_observation_changes_only_submitted_fields() {
    let mut site: TestSite = create_test_site();
    let request: CreateObservationRequest = observation_request(&site);
    let created: ObservationInfo =
        create_observation(&mut site.persistence, request).expect("create should succeed");

    let update: UpdateObservationRequest = UpdateObservationRequest {
        title: Some(String::from("Blocked fire exit in bay 3")),
        description: None,
        kind: None,
        hazard_category: None,
        priority: None,
        plant_id: None,
        department_id: None,
        reported_by: None,
        assigned_to: None,
        due_date: None,
        updated_by: String::from("omar.haddad"),
    };
    let updated: ObservationInfo =
        update_observation(&mut site.persistence, created.observation_id, update)
            .expect("update should succeed")
            .expect("observation should exist");

    assert_eq!(updated.title, "Blocked fire exit in bay 3");
    assert_eq!(updated.description, created.description);
    assert_eq!(updated.kind, created.kind);
    assert_eq!(updated.priority, created.priority);
    assert_eq!(updated.updated_by, "omar.haddad");
}

#[test]
fn test_update_observation_rejects_unknown_priority() {
    let mut site: TestSite = create_test_site();
    let request: CreateObservationRequest = observation_request(&site);
    let created: ObservationInfo =
        create_observation(&mut site.persistence, request).expect("create should succeed");

    let update: UpdateObservationRequest = UpdateObservationRequest {
        title: None,
        description: None,
        kind: None,
        hazard_category: None,
        priority: Some(String::from("urgent")),
        plant_id: None,
        department_id: None,
        reported_by: None,
        assigned_to: None,
        due_date: None,
        updated_by: String::from("omar.haddad"),
    };

    match update_observation(&mut site.persistence, created.observation_id, update) {
        Err(ApiError::InvalidInput { field, .. }) => assert_eq!(field, "priority"),
        other => panic!("Expected InvalidInput for unknown priority, got {other:?}"),
    }
}

#[test]
fn test_update_observation_returns_none_for_unknown_id() {
    let mut site: TestSite = create_test_site();

    let update: UpdateObservationRequest = UpdateObservationRequest {
        title: Some(String::from("Does not matter")),
        description: None,
        kind: None,
        hazard_category: None,
        priority: None,
        plant_id: None,
        department_id: None,
        reported_by: None,
        assigned_to: None,
        due_date: None,
        updated_by: String::from("omar.haddad"),
    };
    let updated: Option<ObservationInfo> =
        update_observation(&mut site.persistence, 9999, update).expect("update should succeed");

    assert!(updated.is_none());
}

// ============================================================================
// Status Transition Tests
// ============================================================================

#[test]
fn test_close_observation_stamps_closed_at_and_stores_notes() {
    let mut site: TestSite = create_test_site();
    let request: CreateObservationRequest = observation_request(&site);
    let created: ObservationInfo =
        create_observation(&mut site.persistence, request).expect("create should succeed");

    let status_request: ObservationStatusRequest = ObservationStatusRequest {
        status: String::from("closed"),
        resolution_notes: Some(String::from("Pallets relocated to the staging bay")),
        note: Some(String::from("Verified on the evening round")),
        performed_by: String::from("omar.haddad"),
    };
    let closed: ObservationInfo =
        update_observation_status(&mut site.persistence, created.observation_id, status_request)
            .expect("transition should succeed")
            .expect("observation should exist");

    assert_eq!(closed.status, "closed");
    assert!(closed.closed_at.is_some());
    assert_eq!(
        closed.resolution_notes.as_deref(),
        Some("Pallets relocated to the staging bay")
    );
}

#[test]
fn test_observation_rejects_transition_out_of_closed() {
    let mut site: TestSite = create_test_site();
    let request: CreateObservationRequest = observation_request(&site);
    let created: ObservationInfo =
        create_observation(&mut site.persistence, request).expect("create should succeed");

    let close_request: ObservationStatusRequest = ObservationStatusRequest {
        status: String::from("closed"),
        resolution_notes: None,
        note: None,
        performed_by: String::from("omar.haddad"),
    };
    update_observation_status(&mut site.persistence, created.observation_id, close_request)
        .expect("transition should succeed")
        .expect("observation should exist");

    let reopen_request: ObservationStatusRequest = ObservationStatusRequest {
        status: String::from("in_progress"),
        resolution_notes: None,
        note: None,
        performed_by: String::from("omar.haddad"),
    };
    match update_observation_status(&mut site.persistence, created.observation_id, reopen_request) {
        Err(ApiError::DomainRuleViolation { rule, message }) => {
            assert_eq!(rule, "status_lifecycle");
            assert!(message.contains("closed"));
        }
        other => panic!("Expected DomainRuleViolation for reopening, got {other:?}"),
    }

    // The rejected transition must not touch the row or the trail.
    let unchanged: ObservationInfo =
        get_observation(&mut site.persistence, created.observation_id)
            .expect("get should succeed")
            .expect("observation should exist");
    assert_eq!(unchanged.status, "closed");
    let events: Vec<AuditEventInfo> =
        observation_history(&mut site.persistence, created.observation_id)
            .expect("history should succeed")
            .expect("observation should have history");
    assert_eq!(events.len(), 2);
}

#[test]
fn test_observation_resolution_notes_survive_later_transitions() {
    let mut site: TestSite = create_test_site();
    let request: CreateObservationRequest = observation_request(&site);
    let created: ObservationInfo =
        create_observation(&mut site.persistence, request).expect("create should succeed");

    let start_request: ObservationStatusRequest = ObservationStatusRequest {
        status: String::from("in_progress"),
        resolution_notes: Some(String::from("Work order raised")),
        note: None,
        performed_by: String::from("omar.haddad"),
    };
    update_observation_status(&mut site.persistence, created.observation_id, start_request)
        .expect("transition should succeed")
        .expect("observation should exist");

    // Absent notes on the closing request keep the stored value.
    let close_request: ObservationStatusRequest = ObservationStatusRequest {
        status: String::from("closed"),
        resolution_notes: None,
        note: None,
        performed_by: String::from("omar.haddad"),
    };
    let closed: ObservationInfo =
        update_observation_status(&mut site.persistence, created.observation_id, close_request)
            .expect("transition should succeed")
            .expect("observation should exist");

    assert_eq!(closed.resolution_notes.as_deref(), Some("Work order raised"));
}

#[test]
fn test_observation_status_event_records_endpoints() {
    let mut site: TestSite = create_test_site();
    let request: CreateObservationRequest = observation_request(&site);
    let created: ObservationInfo =
        create_observation(&mut site.persistence, request).expect("create should succeed");

    let status_request: ObservationStatusRequest = ObservationStatusRequest {
        status: String::from("under_review"),
        resolution_notes: None,
        note: Some(String::from("Waiting on supervisor sign-off")),
        performed_by: String::from("omar.haddad"),
    };
    update_observation_status(&mut site.persistence, created.observation_id, status_request)
        .expect("transition should succeed")
        .expect("observation should exist");

    let events: Vec<AuditEventInfo> =
        observation_history(&mut site.persistence, created.observation_id)
            .expect("history should succeed")
            .expect("history should be present");

    assert_eq!(events.len(), 2);
    let transition: &AuditEventInfo = &events[1];
    assert_eq!(transition.action, "update_status");
    assert_eq!(transition.from_status.as_deref(), Some("open"));
    assert_eq!(transition.to_status.as_deref(), Some("under_review"));
    assert_eq!(
        transition.note.as_deref(),
        Some("Waiting on supervisor sign-off")
    );
}

#[test]
fn test_update_observation_status_returns_none_for_unknown_id() {
    let mut site: TestSite = create_test_site();

    let status_request: ObservationStatusRequest = ObservationStatusRequest {
        status: String::from("closed"),
        resolution_notes: None,
        note: None,
        performed_by: String::from("omar.haddad"),
    };
    let result: Option<ObservationInfo> =
        update_observation_status(&mut site.persistence, 9999, status_request)
            .expect("transition should succeed");

    assert!(result.is_none());
}

// ============================================================================
// Deletion and History Tests
// ============================================================================

#[test]
fn test_delete_observation_keeps_audit_history() {
    let mut site: TestSite = create_test_site();
    let request: CreateObservationRequest = observation_request(&site);
    let created: ObservationInfo =
        create_observation(&mut site.persistence, request).expect("create should succeed");

    delete_observation(&mut site.persistence, created.observation_id, "rosa.vega")
        .expect("delete should succeed")
        .expect("observation should exist");

    let found: Option<ObservationInfo> =
        get_observation(&mut site.persistence, created.observation_id)
            .expect("lookup should succeed");
    assert!(found.is_none());

    let events: Vec<AuditEventInfo> =
        observation_history(&mut site.persistence, created.observation_id)
            .expect("history should succeed")
            .expect("history should survive deletion");
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].action, "create");
    assert_eq!(events[1].action, "delete");
    assert_eq!(events[1].from_status.as_deref(), Some("open"));
}

#[test]
fn test_delete_observation_returns_none_for_unknown_id() {
    let mut site: TestSite = create_test_site();

    let result: Option<()> = delete_observation(&mut site.persistence, 9999, "rosa.vega")
        .expect("delete should succeed");

    assert!(result.is_none());
}

#[test]
fn test_observation_history_returns_none_for_unknown_id() {
    let mut site: TestSite = create_test_site();

    let history: Option<Vec<AuditEventInfo>> =
        observation_history(&mut site.persistence, 9999).expect("history should succeed");

    assert!(history.is_none());
}

// ============================================================================
// Statistics Tests
// ============================================================================

#[test]
fn test_observation_statistics_counts_by_status_and_hazard() {
    let mut site: TestSite = create_test_site();
    let first_request: CreateObservationRequest = observation_request(&site);
    let mut second_request: CreateObservationRequest = observation_request(&site);
    second_request.hazard_category = String::from("chemical");

    create_observation(&mut site.persistence, first_request).expect("create should succeed");
    let second: ObservationInfo =
        create_observation(&mut site.persistence, second_request).expect("create should succeed");

    let close_request: ObservationStatusRequest = ObservationStatusRequest {
        status: String::from("closed"),
        resolution_notes: None,
        note: None,
        performed_by: String::from("omar.haddad"),
    };
    update_observation_status(&mut site.persistence, second.observation_id, close_request)
        .expect("transition should succeed")
        .expect("observation should exist");

    let statistics: ObservationStatistics =
        observation_statistics(&mut site.persistence, &SearchFilter::default())
            .expect("statistics should succeed");

    assert_eq!(statistics.total, 2);
    assert_eq!(statistics.open, 1);
    assert_eq!(statistics.closed, 1);
    assert_eq!(statistics.in_progress, 0);
    assert_eq!(statistics.by_hazard_category.get("fire"), Some(&1));
    assert_eq!(statistics.by_hazard_category.get("chemical"), Some(&1));
}

#[test]
fn test_observation_statistics_counts_overdue_open_items() {
    let mut site: TestSite = create_test_site();
    let mut overdue_request: CreateObservationRequest = observation_request(&site);
    overdue_request.due_date = Some(String::from("2020-01-01"));
    let mut future_request: CreateObservationRequest = observation_request(&site);
    future_request.due_date = Some(String::from("2999-12-31"));
    let mut closed_request: CreateObservationRequest = observation_request(&site);
    closed_request.due_date = Some(String::from("2020-01-01"));

    create_observation(&mut site.persistence, overdue_request).expect("create should succeed");
    create_observation(&mut site.persistence, future_request).expect("create should succeed");
    let closed: ObservationInfo =
        create_observation(&mut site.persistence, closed_request).expect("create should succeed");

    // A closed item is never overdue, no matter its due date.
    let close_request: ObservationStatusRequest = ObservationStatusRequest {
        status: String::from("closed"),
        resolution_notes: None,
        note: None,
        performed_by: String::from("omar.haddad"),
    };
    update_observation_status(&mut site.persistence, closed.observation_id, close_request)
        .expect("transition should succeed")
        .expect("observation should exist");

    let statistics: ObservationStatistics =
        observation_statistics(&mut site.persistence, &SearchFilter::default())
            .expect("statistics should succeed");

    assert_eq!(statistics.overdue, 1);
}

// ============================================================================
// Listing Tests
// ============================================================================

#[test]
fn test_list_observations_pages_results() {
    let mut site: TestSite = create_test_site();
    for _ in 0..3 {
        let request: CreateObservationRequest = observation_request(&site);
        create_observation(&mut site.persistence, request).expect("create should succeed");
    }

    let first_page_filter: SearchFilter = SearchFilter {
        page: Some(1),
        page_size: Some(2),
        ..SearchFilter::default()
    };
    let first_page: PagedResult<ObservationInfo> =
        list_observations(&mut site.persistence, &first_page_filter)
            .expect("listing should succeed");

    assert_eq!(first_page.data.len(), 2);
    assert_eq!(first_page.total_count, 3);
    assert_eq!(first_page.total_pages, 2);
    assert!(first_page.has_next_page);
    assert!(!first_page.has_previous_page);

    let second_page_filter: SearchFilter = SearchFilter {
        page: Some(2),
        page_size: Some(2),
        ..SearchFilter::default()
    };
    let second_page: PagedResult<ObservationInfo> =
        list_observations(&mut site.persistence, &second_page_filter)
            .expect("listing should succeed");

    assert_eq!(second_page.data.len(), 1);
    assert!(!second_page.has_next_page);
    assert!(second_page.has_previous_page);
}

#[test]
fn test_list_observations_filters_by_status() {
    let mut site: TestSite = create_test_site();
    let open_request: CreateObservationRequest = observation_request(&site);
    let closing_request: CreateObservationRequest = observation_request(&site);

    create_observation(&mut site.persistence, open_request).expect("create should succeed");
    let closing: ObservationInfo =
        create_observation(&mut site.persistence, closing_request).expect("create should succeed");

    let close_request: ObservationStatusRequest = ObservationStatusRequest {
        status: String::from("closed"),
        resolution_notes: None,
        note: None,
        performed_by: String::from("omar.haddad"),
    };
    update_observation_status(&mut site.persistence, closing.observation_id, close_request)
        .expect("transition should succeed")
        .expect("observation should exist");

    let filter: SearchFilter = SearchFilter {
        statuses: vec![String::from("closed")],
        ..SearchFilter::default()
    };
    let listed: PagedResult<ObservationInfo> =
        list_observations(&mut site.persistence, &filter).expect("listing should succeed");

    assert_eq!(listed.total_count, 1);
    assert_eq!(listed.data[0].status, "closed");
}

#[test]
fn test_list_observations_rejects_unknown_status_filter() {
    let mut site: TestSite = create_test_site();

    let filter: SearchFilter = SearchFilter {
        statuses: vec![String::from("destroyed")],
        ..SearchFilter::default()
    };

    match list_observations(&mut site.persistence, &filter) {
        Err(ApiError::InvalidInput { field, .. }) => assert_eq!(field, "status"),
        other => panic!("Expected InvalidInput for unknown status filter, got {other:?}"),
    }
}

#[test]
fn test_list_observations_searches_title_and_description() {
    let mut site: TestSite = create_test_site();
    let first_request: CreateObservationRequest = observation_request(&site);
    let mut second_request: CreateObservationRequest = observation_request(&site);
    second_request.title = String::from("Missing guard rail");
    second_request.description = String::from("Mezzanine edge exposed near the packing line");

    create_observation(&mut site.persistence, first_request).expect("create should succeed");
    create_observation(&mut site.persistence, second_request).expect("create should succeed");

    let filter: SearchFilter = SearchFilter {
        search: Some(String::from("guard rail")),
        ..SearchFilter::default()
    };
    let listed: PagedResult<ObservationInfo> =
        list_observations(&mut site.persistence, &filter).expect("listing should succeed");

    assert_eq!(listed.total_count, 1);
    assert_eq!(listed.data[0].title, "Missing guard rail");
}
