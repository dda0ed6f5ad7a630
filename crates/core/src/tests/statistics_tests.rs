// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    audit_statistics, average_score, incident_statistics, observation_statistics,
    permit_statistics,
};

fn rows(pairs: &[(&str, i64)]) -> Vec<(String, i64)> {
    pairs
        .iter()
        .map(|(bucket, count)| (String::from(*bucket), *count))
        .collect()
}

#[test]
fn test_observation_statistics_pivots_status_buckets() {
    let by_status = rows(&[("open", 3), ("in_progress", 2), ("closed", 1)]);
    let by_hazard = rows(&[("housekeeping", 4), ("ppe", 2)]);

    let stats = observation_statistics(&by_status, &by_hazard, 2);

    assert_eq!(stats.total, 6);
    assert_eq!(stats.open, 3);
    assert_eq!(stats.in_progress, 2);
    assert_eq!(stats.under_review, 0);
    assert_eq!(stats.closed, 1);
    assert_eq!(stats.overdue, 2);
    assert_eq!(stats.by_hazard_category.get("housekeeping"), Some(&4));
    assert_eq!(stats.by_hazard_category.get("ppe"), Some(&2));
}

#[test]
fn test_unknown_status_bucket_is_ignored() {
    let by_status = rows(&[("open", 3), ("pending", 9)]);

    let stats = observation_statistics(&by_status, &[], 0);

    // "pending" is not an observation status; it must not leak into the total.
    assert_eq!(stats.total, 3);
    assert_eq!(stats.open, 3);
}

#[test]
fn test_empty_rows_produce_zeroed_statistics() {
    let stats = observation_statistics(&[], &[], 0);

    assert_eq!(stats.total, 0);
    assert_eq!(stats.overdue, 0);
    assert!(stats.by_hazard_category.is_empty());
}

#[test]
fn test_incident_statistics_carries_severity_and_kind_maps() {
    let by_status = rows(&[("reported", 2), ("under_investigation", 1), ("closed", 1)]);
    let by_severity = rows(&[("minor", 2), ("critical", 2)]);
    let by_kind = rows(&[("first_aid", 3), ("environmental", 1)]);

    let stats = incident_statistics(&by_status, &by_severity, &by_kind);

    assert_eq!(stats.total, 4);
    assert_eq!(stats.reported, 2);
    assert_eq!(stats.under_investigation, 1);
    assert_eq!(stats.investigation_complete, 0);
    assert_eq!(stats.closed, 1);
    assert_eq!(stats.by_severity.get("critical"), Some(&2));
    assert_eq!(stats.by_kind.get("first_aid"), Some(&3));
}

#[test]
fn test_audit_statistics_averages_recorded_scores() {
    let by_status = rows(&[("planned", 2), ("completed", 2)]);

    let stats = audit_statistics(&by_status, 1, &[80, 90]);

    assert_eq!(stats.total, 4);
    assert_eq!(stats.planned, 2);
    assert_eq!(stats.completed, 2);
    assert_eq!(stats.overdue, 1);
    let average = match stats.average_score {
        Some(average) => average,
        None => panic!("Expected an average over two recorded scores"),
    };
    assert!((average - 85.0).abs() < f64::EPSILON);
}

#[test]
fn test_audit_statistics_without_scores_has_no_average() {
    let stats = audit_statistics(&rows(&[("planned", 3)]), 0, &[]);

    assert_eq!(stats.total, 3);
    assert_eq!(stats.average_score, None);
}

#[test]
fn test_average_score_is_none_for_empty_input() {
    assert_eq!(average_score(&[]), None);
}

#[test]
fn test_permit_statistics_pivots_all_six_statuses() {
    let by_status = rows(&[
        ("draft", 1),
        ("pending_approval", 2),
        ("approved", 3),
        ("active", 4),
        ("expired", 5),
        ("cancelled", 6),
    ]);
    let by_kind = rows(&[("hot_work", 12), ("confined_space", 9)]);

    let stats = permit_statistics(&by_status, &by_kind);

    assert_eq!(stats.total, 21);
    assert_eq!(stats.draft, 1);
    assert_eq!(stats.pending_approval, 2);
    assert_eq!(stats.approved, 3);
    assert_eq!(stats.active, 4);
    assert_eq!(stats.expired, 5);
    assert_eq!(stats.cancelled, 6);
    assert_eq!(stats.by_kind.get("hot_work"), Some(&12));
}
