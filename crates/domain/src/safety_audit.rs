// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Safety audit types and lifecycle.
//!
//! A safety audit is a scheduled compliance review. Unlike the other
//! lifecycles, audits progress through a strict chain: fieldwork must
//! finish before a report exists, and the report must be submitted
//! before close-out. The score is recorded when fieldwork completes.

use crate::error::DomainError;
use crate::lifecycle::StatusLifecycle;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Safety audit lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    /// Scheduled, fieldwork not begun
    Planned,
    /// Fieldwork underway
    InProgress,
    /// Fieldwork done, score recorded
    Completed,
    /// Audit report submitted for review
    ReportSubmitted,
    /// Closed
    Closed,
}

impl StatusLifecycle for AuditStatus {
    const ENTITY: &'static str = "audit";

    const ALL: &'static [Self] = &[
        Self::Planned,
        Self::InProgress,
        Self::Completed,
        Self::ReportSubmitted,
        Self::Closed,
    ];

    fn initial() -> Self {
        Self::Planned
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::ReportSubmitted => "report_submitted",
            Self::Closed => "closed",
        }
    }

    fn allowed_transitions(&self) -> &'static [Self] {
        // Strict forward chain, no skipping
        match self {
            Self::Planned => &[Self::InProgress],
            Self::InProgress => &[Self::Completed],
            Self::Completed => &[Self::ReportSubmitted],
            Self::ReportSubmitted => &[Self::Closed],
            Self::Closed => &[],
        }
    }
}

impl FromStr for AuditStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// A scheduled compliance audit.
///
/// `audit_id` is `None` until persisted. `score` and `completed_at` are
/// recorded when fieldwork completes; `closed_at` on entering the
/// terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetyAudit {
    pub audit_id: Option<i64>,
    pub audit_number: String,
    pub title: String,
    pub description: String,
    pub status: AuditStatus,
    pub plant_id: i64,
    pub department_id: i64,
    pub auditor_id: i64,
    pub scheduled_date: String,
    pub completed_at: Option<String>,
    pub score: Option<i32>,
    pub summary: Option<String>,
    pub closed_at: Option<String>,
    pub created_at: String,
    pub created_by: String,
    pub updated_at: String,
    pub updated_by: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_string_round_trip() {
        for status in AuditStatus::ALL {
            let s = status.as_str();
            match AuditStatus::parse_str(s) {
                Ok(parsed) => assert_eq!(*status, parsed),
                Err(e) => panic!("Failed to parse status string: {s}: {e}"),
            }
        }
    }

    #[test]
    fn test_initial_status() {
        assert_eq!(AuditStatus::initial(), AuditStatus::Planned);
    }

    #[test]
    fn test_chain_progression() {
        assert!(
            AuditStatus::Planned
                .validate_transition(AuditStatus::InProgress)
                .is_ok()
        );
        assert!(
            AuditStatus::InProgress
                .validate_transition(AuditStatus::Completed)
                .is_ok()
        );
        assert!(
            AuditStatus::Completed
                .validate_transition(AuditStatus::ReportSubmitted)
                .is_ok()
        );
        assert!(
            AuditStatus::ReportSubmitted
                .validate_transition(AuditStatus::Closed)
                .is_ok()
        );
    }

    #[test]
    fn test_skipping_a_stage_is_rejected() {
        assert!(
            AuditStatus::Planned
                .validate_transition(AuditStatus::Completed)
                .is_err()
        );
        assert!(
            AuditStatus::InProgress
                .validate_transition(AuditStatus::Closed)
                .is_err()
        );
    }

    #[test]
    fn test_backward_movement_is_rejected() {
        assert!(
            AuditStatus::Completed
                .validate_transition(AuditStatus::InProgress)
                .is_err()
        );
        assert!(
            AuditStatus::ReportSubmitted
                .validate_transition(AuditStatus::Completed)
                .is_err()
        );
    }

    #[test]
    fn test_no_transitions_from_closed() {
        for target in AuditStatus::ALL {
            assert!(AuditStatus::Closed.validate_transition(*target).is_err());
        }
    }
}
