// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Work permit types and the approval lifecycle.
//!
//! A permit is a time-boxed authorization for hazardous work. It must be
//! approved before it can go active, and it can be cancelled from any
//! non-terminal state. Approval metadata is stamped when approval is
//! granted and cleared if the permit is sent back to draft.

use crate::error::DomainError;
use crate::lifecycle::StatusLifecycle;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Permit lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermitStatus {
    /// Being drafted by the requester
    Draft,
    /// Submitted, awaiting an approval decision
    PendingApproval,
    /// Approved but work has not started
    Approved,
    /// Work authorized and underway
    Active,
    /// Validity window elapsed
    Expired,
    /// Withdrawn or rejected
    Cancelled,
}

impl StatusLifecycle for PermitStatus {
    const ENTITY: &'static str = "permit";

    const ALL: &'static [Self] = &[
        Self::Draft,
        Self::PendingApproval,
        Self::Approved,
        Self::Active,
        Self::Expired,
        Self::Cancelled,
    ];

    fn initial() -> Self {
        Self::Draft
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::PendingApproval => "pending_approval",
            Self::Approved => "approved",
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Cancelled => "cancelled",
        }
    }

    fn allowed_transitions(&self) -> &'static [Self] {
        match self {
            Self::Draft => &[Self::PendingApproval, Self::Cancelled],
            // A rejected permit goes back to draft for rework
            Self::PendingApproval => &[Self::Approved, Self::Draft, Self::Cancelled],
            Self::Approved => &[Self::Active, Self::Cancelled],
            Self::Active => &[Self::Expired, Self::Cancelled],
            Self::Expired | Self::Cancelled => &[],
        }
    }
}

impl FromStr for PermitStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// The kind of work the permit authorizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermitKind {
    HotWork,
    ConfinedSpace,
    WorkAtHeight,
    Electrical,
    Excavation,
    General,
}

impl PermitKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::HotWork => "hot_work",
            Self::ConfinedSpace => "confined_space",
            Self::WorkAtHeight => "work_at_height",
            Self::Electrical => "electrical",
            Self::Excavation => "excavation",
            Self::General => "general",
        }
    }

    /// Parses a kind from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownKind` if the string is not a valid kind.
    pub fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "hot_work" => Ok(Self::HotWork),
            "confined_space" => Ok(Self::ConfinedSpace),
            "work_at_height" => Ok(Self::WorkAtHeight),
            "electrical" => Ok(Self::Electrical),
            "excavation" => Ok(Self::Excavation),
            "general" => Ok(Self::General),
            _ => Err(DomainError::UnknownKind {
                kind: "permit kind".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for PermitKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// A time-boxed work authorization.
///
/// `permit_id` is `None` until persisted. `approved_by`, `approved_at`
/// and `approval_notes` are stamped on approval and cleared when a
/// pending permit is sent back to draft. `worker_ids` lists the user
/// accounts authorized to work under the permit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permit {
    pub permit_id: Option<i64>,
    pub permit_number: String,
    pub title: String,
    pub description: String,
    pub kind: PermitKind,
    pub status: PermitStatus,
    pub plant_id: i64,
    pub department_id: i64,
    pub requested_by: i64,
    pub approved_by: Option<i64>,
    pub approved_at: Option<String>,
    pub approval_notes: Option<String>,
    pub valid_from: String,
    pub valid_to: String,
    pub worker_ids: Vec<i64>,
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
        for status in PermitStatus::ALL {
            let s = status.as_str();
            match PermitStatus::parse_str(s) {
                Ok(parsed) => assert_eq!(*status, parsed),
                Err(e) => panic!("Failed to parse status string: {s}: {e}"),
            }
        }
    }

    #[test]
    fn test_initial_status() {
        assert_eq!(PermitStatus::initial(), PermitStatus::Draft);
    }

    #[test]
    fn test_terminal_states() {
        assert!(PermitStatus::Expired.is_terminal());
        assert!(PermitStatus::Cancelled.is_terminal());
        assert!(!PermitStatus::Active.is_terminal());
    }

    #[test]
    fn test_approval_path() {
        assert!(
            PermitStatus::Draft
                .validate_transition(PermitStatus::PendingApproval)
                .is_ok()
        );
        assert!(
            PermitStatus::PendingApproval
                .validate_transition(PermitStatus::Approved)
                .is_ok()
        );
        assert!(
            PermitStatus::Approved
                .validate_transition(PermitStatus::Active)
                .is_ok()
        );
        assert!(
            PermitStatus::Active
                .validate_transition(PermitStatus::Expired)
                .is_ok()
        );
    }

    #[test]
    fn test_rejection_returns_to_draft() {
        assert!(
            PermitStatus::PendingApproval
                .validate_transition(PermitStatus::Draft)
                .is_ok()
        );
    }

    #[test]
    fn test_cancellable_from_all_non_terminal_states() {
        for status in [
            PermitStatus::Draft,
            PermitStatus::PendingApproval,
            PermitStatus::Approved,
            PermitStatus::Active,
        ] {
            assert!(
                status.validate_transition(PermitStatus::Cancelled).is_ok(),
                "{} permit should be cancellable",
                status.as_str()
            );
        }
    }

    #[test]
    fn test_activation_requires_approval() {
        assert!(
            PermitStatus::Draft
                .validate_transition(PermitStatus::Active)
                .is_err()
        );
        assert!(
            PermitStatus::PendingApproval
                .validate_transition(PermitStatus::Active)
                .is_err()
        );
    }

    #[test]
    fn test_no_transitions_from_terminal_states() {
        for terminal in [PermitStatus::Expired, PermitStatus::Cancelled] {
            for target in PermitStatus::ALL {
                assert!(terminal.validate_transition(*target).is_err());
            }
        }
    }

    #[test]
    fn test_kind_round_trip() {
        for kind in [
            PermitKind::HotWork,
            PermitKind::ConfinedSpace,
            PermitKind::WorkAtHeight,
            PermitKind::Electrical,
            PermitKind::Excavation,
            PermitKind::General,
        ] {
            assert_eq!(PermitKind::parse_str(kind.as_str()), Ok(kind));
        }
    }
}
