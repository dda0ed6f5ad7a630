// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Dashboard statistics assembled from grouped counts.
//!
//! Storage reports `(bucket, count)` rows; the functions here pivot them
//! into fixed per-status fields so the response shape never depends on
//! which statuses happen to have rows. A bucket that does not parse as a
//! known status is skipped, and totals are the sum of the recognized
//! buckets.

use std::collections::BTreeMap;

use sitesafe_domain::{
    AuditStatus, IncidentStatus, ObservationStatus, PermitStatus, StatusLifecycle,
};

/// Observation counts by status and hazard category.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ObservationStatistics {
    pub total: i64,
    pub open: i64,
    pub in_progress: i64,
    pub under_review: i64,
    pub closed: i64,
    /// Observations past their due date and not yet closed.
    pub overdue: i64,
    /// Counts keyed by free-text hazard category.
    pub by_hazard_category: BTreeMap<String, i64>,
}

/// Incident counts by status, severity, and kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IncidentStatistics {
    pub total: i64,
    pub reported: i64,
    pub under_investigation: i64,
    pub investigation_complete: i64,
    pub closed: i64,
    pub by_severity: BTreeMap<String, i64>,
    pub by_kind: BTreeMap<String, i64>,
}

/// Safety audit counts by status, plus the mean recorded score.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AuditStatistics {
    pub total: i64,
    pub planned: i64,
    pub in_progress: i64,
    pub completed: i64,
    pub report_submitted: i64,
    pub closed: i64,
    /// Audits past their scheduled date with fieldwork not finished.
    pub overdue: i64,
    /// Mean of recorded scores, absent when no audit has a score.
    pub average_score: Option<f64>,
}

/// Permit counts by status and kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PermitStatistics {
    pub total: i64,
    pub draft: i64,
    pub pending_approval: i64,
    pub approved: i64,
    pub active: i64,
    pub expired: i64,
    pub cancelled: i64,
    pub by_kind: BTreeMap<String, i64>,
}

fn category_map(rows: &[(String, i64)]) -> BTreeMap<String, i64> {
    rows.iter().cloned().collect()
}

/// Pivots observation count rows into dashboard statistics.
#[must_use]
pub fn observation_statistics(
    by_status: &[(String, i64)],
    by_hazard_category: &[(String, i64)],
    overdue: i64,
) -> ObservationStatistics {
    let mut stats = ObservationStatistics {
        overdue,
        by_hazard_category: category_map(by_hazard_category),
        ..ObservationStatistics::default()
    };

    for (status, count) in by_status {
        let Ok(parsed) = ObservationStatus::parse_str(status) else {
            continue;
        };
        match parsed {
            ObservationStatus::Open => stats.open = *count,
            ObservationStatus::InProgress => stats.in_progress = *count,
            ObservationStatus::UnderReview => stats.under_review = *count,
            ObservationStatus::Closed => stats.closed = *count,
        }
        stats.total += *count;
    }

    stats
}

/// Pivots incident count rows into dashboard statistics.
#[must_use]
pub fn incident_statistics(
    by_status: &[(String, i64)],
    by_severity: &[(String, i64)],
    by_kind: &[(String, i64)],
) -> IncidentStatistics {
    let mut stats = IncidentStatistics {
        by_severity: category_map(by_severity),
        by_kind: category_map(by_kind),
        ..IncidentStatistics::default()
    };

    for (status, count) in by_status {
        let Ok(parsed) = IncidentStatus::parse_str(status) else {
            continue;
        };
        match parsed {
            IncidentStatus::Reported => stats.reported = *count,
            IncidentStatus::UnderInvestigation => stats.under_investigation = *count,
            IncidentStatus::InvestigationComplete => stats.investigation_complete = *count,
            IncidentStatus::Closed => stats.closed = *count,
        }
        stats.total += *count;
    }

    stats
}

/// Pivots safety audit count rows into dashboard statistics.
#[must_use]
pub fn audit_statistics(
    by_status: &[(String, i64)],
    overdue: i64,
    scores: &[i32],
) -> AuditStatistics {
    let mut stats = AuditStatistics {
        overdue,
        average_score: average_score(scores),
        ..AuditStatistics::default()
    };

    for (status, count) in by_status {
        let Ok(parsed) = AuditStatus::parse_str(status) else {
            continue;
        };
        match parsed {
            AuditStatus::Planned => stats.planned = *count,
            AuditStatus::InProgress => stats.in_progress = *count,
            AuditStatus::Completed => stats.completed = *count,
            AuditStatus::ReportSubmitted => stats.report_submitted = *count,
            AuditStatus::Closed => stats.closed = *count,
        }
        stats.total += *count;
    }

    stats
}

/// Pivots permit count rows into dashboard statistics.
#[must_use]
pub fn permit_statistics(
    by_status: &[(String, i64)],
    by_kind: &[(String, i64)],
) -> PermitStatistics {
    let mut stats = PermitStatistics {
        by_kind: category_map(by_kind),
        ..PermitStatistics::default()
    };

    for (status, count) in by_status {
        let Ok(parsed) = PermitStatus::parse_str(status) else {
            continue;
        };
        match parsed {
            PermitStatus::Draft => stats.draft = *count,
            PermitStatus::PendingApproval => stats.pending_approval = *count,
            PermitStatus::Approved => stats.approved = *count,
            PermitStatus::Active => stats.active = *count,
            PermitStatus::Expired => stats.expired = *count,
            PermitStatus::Cancelled => stats.cancelled = *count,
        }
        stats.total += *count;
    }

    stats
}

/// Mean of recorded scores, `None` when none are recorded.
#[must_use]
pub fn average_score(scores: &[i32]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    let sum: i64 = scores.iter().map(|&score| i64::from(score)).sum();
    #[allow(clippy::cast_precision_loss)]
    let average = sum as f64 / scores.len() as f64;
    Some(average)
}
