// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for listing mechanics shared across entities: page math,
//! page-size clamping, sort columns, date bounds, and query-string
//! filter deserialization.

use sitesafe::ObservationInfo;

use crate::{
    CreateObservationRequest, PagedResult, SearchFilter, create_observation, list_observations,
};

use super::helpers::{TestSite, create_test_site, observation_request};

// ============================================================================
// Page Math Tests
// ============================================================================

#[test]
fn test_paged_result_computes_page_math() {
    let result: PagedResult<i64> = PagedResult::new(vec![1, 2, 3], 45, 2, 20);

    assert_eq!(result.total_count, 45);
    assert_eq!(result.current_page, 2);
    assert_eq!(result.page_size, 20);
    assert_eq!(result.total_pages, 3);
    assert!(result.has_next_page);
    assert!(result.has_previous_page);
}

#[test]
fn test_paged_result_marks_first_and_last_pages() {
    let first: PagedResult<i64> = PagedResult::new(vec![1], 45, 1, 20);
    assert!(first.has_next_page);
    assert!(!first.has_previous_page);

    let last: PagedResult<i64> = PagedResult::new(vec![1], 45, 3, 20);
    assert!(!last.has_next_page);
    assert!(last.has_previous_page);
}

#[test]
fn test_paged_result_handles_empty_set() {
    let empty: PagedResult<i64> = PagedResult::new(Vec::new(), 0, 1, 20);

    assert_eq!(empty.total_pages, 0);
    assert!(!empty.has_next_page);
    assert!(!empty.has_previous_page);
}

// ============================================================================
// Live Listing Tests
// ============================================================================

#[test]
fn test_page_size_is_clamped_and_page_defaults() {
    let mut site: TestSite = create_test_site();
    let request: CreateObservationRequest = observation_request(&site);
    create_observation(&mut site.persistence, request).expect("create should succeed");

    let filter: SearchFilter = SearchFilter {
        page: None,
        page_size: Some(500),
        ..SearchFilter::default()
    };
    let listed: PagedResult<ObservationInfo> =
        list_observations(&mut site.persistence, &filter).expect("listing should succeed");

    assert_eq!(listed.current_page, 1);
    assert_eq!(listed.page_size, 100);
}

#[test]
fn test_sort_by_title_ascending() {
    let mut site: TestSite = create_test_site();
    let first_request: CreateObservationRequest = observation_request(&site);
    let mut second_request: CreateObservationRequest = observation_request(&site);
    second_request.title = String::from("Absent machine guard");

    create_observation(&mut site.persistence, first_request).expect("create should succeed");
    create_observation(&mut site.persistence, second_request).expect("create should succeed");

    let filter: SearchFilter = SearchFilter {
        sort_by: Some(String::from("title")),
        sort_descending: Some(false),
        ..SearchFilter::default()
    };
    let listed: PagedResult<ObservationInfo> =
        list_observations(&mut site.persistence, &filter).expect("listing should succeed");

    assert_eq!(listed.data[0].title, "Absent machine guard");
    assert_eq!(listed.data[1].title, "Blocked fire exit");
}

#[test]
fn test_unknown_sort_column_falls_back_to_created_at() {
    let mut site: TestSite = create_test_site();
    let request: CreateObservationRequest = observation_request(&site);
    create_observation(&mut site.persistence, request).expect("create should succeed");

    let filter: SearchFilter = SearchFilter {
        sort_by: Some(String::from("shoe_size")),
        ..SearchFilter::default()
    };
    let listed: PagedResult<ObservationInfo> =
        list_observations(&mut site.persistence, &filter).expect("listing should succeed");

    assert_eq!(listed.total_count, 1);
}

#[test]
fn test_date_filters_bound_listings_by_creation_time() {
    let mut site: TestSite = create_test_site();
    let request: CreateObservationRequest = observation_request(&site);
    create_observation(&mut site.persistence, request).expect("create should succeed");

    let excluded: SearchFilter = SearchFilter {
        date_from: Some(String::from("9999-01-01")),
        ..SearchFilter::default()
    };
    let none: PagedResult<ObservationInfo> =
        list_observations(&mut site.persistence, &excluded).expect("listing should succeed");
    assert_eq!(none.total_count, 0);

    let included: SearchFilter = SearchFilter {
        date_to: Some(String::from("9999-01-01")),
        ..SearchFilter::default()
    };
    let all: PagedResult<ObservationInfo> =
        list_observations(&mut site.persistence, &included).expect("listing should succeed");
    assert_eq!(all.total_count, 1);
}

// ============================================================================
// Filter Deserialization Tests
// ============================================================================

#[test]
fn test_list_filters_deserialize_from_comma_separated_values() {
    let filter: SearchFilter = serde_json::from_value(serde_json::json!({
        "statuses": "open, in_progress",
        "kinds": "near_miss",
    }))
    .expect("filter should deserialize");

    assert_eq!(filter.statuses, vec!["open", "in_progress"]);
    assert_eq!(filter.kinds, vec!["near_miss"]);
    assert!(filter.priorities.is_empty());
    assert!(filter.severities.is_empty());
    assert_eq!(filter.page, None);
}

#[test]
fn test_list_filters_drop_empty_segments() {
    let filter: SearchFilter = serde_json::from_value(serde_json::json!({
        "statuses": "open,,closed, ",
    }))
    .expect("filter should deserialize");

    assert_eq!(filter.statuses, vec!["open", "closed"]);
}
