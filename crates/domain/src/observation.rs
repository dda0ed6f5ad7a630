// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Safety observation types and lifecycle.
//!
//! An observation is a logged safety concern (unsafe act or condition,
//! near miss, good practice). Observations move through review states
//! and close; closing is an explicit action, never automatic.

use crate::error::DomainError;
use crate::lifecycle::StatusLifecycle;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Observation lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationStatus {
    /// Logged and awaiting action
    Open,
    /// Corrective work underway
    InProgress,
    /// Corrective work done, awaiting reviewer sign-off
    UnderReview,
    /// Resolved and closed
    Closed,
}

impl StatusLifecycle for ObservationStatus {
    const ENTITY: &'static str = "observation";

    const ALL: &'static [Self] = &[Self::Open, Self::InProgress, Self::UnderReview, Self::Closed];

    fn initial() -> Self {
        Self::Open
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::UnderReview => "under_review",
            Self::Closed => "closed",
        }
    }

    fn allowed_transitions(&self) -> &'static [Self] {
        match self {
            Self::Open => &[Self::InProgress, Self::UnderReview, Self::Closed],
            Self::InProgress => &[Self::UnderReview, Self::Closed],
            // A reviewer can bounce the observation back for more work
            Self::UnderReview => &[Self::InProgress, Self::Closed],
            Self::Closed => &[],
        }
    }
}

impl FromStr for ObservationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// Classification of what was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationKind {
    /// A person doing something unsafe
    UnsafeAct,
    /// An unsafe state of equipment or environment
    UnsafeCondition,
    /// An event that could have caused harm but did not
    NearMiss,
    /// A positive practice worth recording
    GoodPractice,
}

impl ObservationKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UnsafeAct => "unsafe_act",
            Self::UnsafeCondition => "unsafe_condition",
            Self::NearMiss => "near_miss",
            Self::GoodPractice => "good_practice",
        }
    }

    /// Parses a kind from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownKind` if the string is not a valid kind.
    pub fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "unsafe_act" => Ok(Self::UnsafeAct),
            "unsafe_condition" => Ok(Self::UnsafeCondition),
            "near_miss" => Ok(Self::NearMiss),
            "good_practice" => Ok(Self::GoodPractice),
            _ => Err(DomainError::UnknownKind {
                kind: "observation kind".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for ObservationKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// Observation priority with its SLA resolution target.
///
/// The SLA hours are informational data surfaced to clients; overdue
/// classification is computed from the due date alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    /// Returns the string representation of the priority.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Parses a priority from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownKind` if the string is not a valid priority.
    pub fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(DomainError::UnknownKind {
                kind: "priority".to_string(),
                value: s.to_string(),
            }),
        }
    }

    /// Target hours to resolution for this priority.
    #[must_use]
    pub const fn sla_hours(&self) -> u32 {
        match self {
            Self::Low => 72,
            Self::Medium => 48,
            Self::High => 24,
            Self::Critical => 4,
        }
    }
}

impl FromStr for Priority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// A logged safety observation.
///
/// `observation_id` is `None` until the observation is persisted.
/// Timestamps are ISO-8601 text, UTC; `closed_at` is set exactly when
/// the status enters its terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub observation_id: Option<i64>,
    pub ticket_number: String,
    pub title: String,
    pub description: String,
    pub kind: ObservationKind,
    pub hazard_category: String,
    pub priority: Priority,
    pub status: ObservationStatus,
    pub plant_id: i64,
    pub department_id: i64,
    pub reported_by: i64,
    pub assigned_to: Option<i64>,
    pub due_date: Option<String>,
    pub resolution_notes: Option<String>,
    pub closed_at: Option<String>,
    pub created_at: String,
    pub created_by: String,
    pub updated_at: String,
    pub updated_by: String,
}
