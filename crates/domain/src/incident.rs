// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Incident types and the investigation lifecycle.
//!
//! An incident is a logged occurrence. Closing requires either an
//! immediate close from the reported state (no investigation warranted)
//! or a completed investigation; an investigation in flight cannot be
//! closed out from under the investigator.

use crate::error::DomainError;
use crate::lifecycle::StatusLifecycle;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Incident lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    /// Logged, not yet triaged
    Reported,
    /// Investigation assigned and underway
    UnderInvestigation,
    /// Investigation findings recorded, awaiting close-out
    InvestigationComplete,
    /// Closed
    Closed,
}

impl StatusLifecycle for IncidentStatus {
    const ENTITY: &'static str = "incident";

    const ALL: &'static [Self] = &[
        Self::Reported,
        Self::UnderInvestigation,
        Self::InvestigationComplete,
        Self::Closed,
    ];

    fn initial() -> Self {
        Self::Reported
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Reported => "reported",
            Self::UnderInvestigation => "under_investigation",
            Self::InvestigationComplete => "investigation_complete",
            Self::Closed => "closed",
        }
    }

    fn allowed_transitions(&self) -> &'static [Self] {
        match self {
            Self::Reported => &[Self::UnderInvestigation, Self::Closed],
            // An active investigation must record findings before close-out
            Self::UnderInvestigation => &[Self::InvestigationComplete],
            // Close-out review can send the investigation back
            Self::InvestigationComplete => &[Self::UnderInvestigation, Self::Closed],
            Self::Closed => &[],
        }
    }
}

impl FromStr for IncidentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// Classification of the incident outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentKind {
    /// Injury treated with first aid only
    FirstAid,
    /// Injury causing time away from work
    LostTimeInjury,
    /// A death
    Fatality,
    /// Damage to equipment or property
    PropertyDamage,
    /// A release or other environmental harm
    Environmental,
    /// An event that could have caused harm but did not
    NearMiss,
}

impl IncidentKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FirstAid => "first_aid",
            Self::LostTimeInjury => "lost_time_injury",
            Self::Fatality => "fatality",
            Self::PropertyDamage => "property_damage",
            Self::Environmental => "environmental",
            Self::NearMiss => "near_miss",
        }
    }

    /// Parses a kind from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownKind` if the string is not a valid kind.
    pub fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "first_aid" => Ok(Self::FirstAid),
            "lost_time_injury" => Ok(Self::LostTimeInjury),
            "fatality" => Ok(Self::Fatality),
            "property_damage" => Ok(Self::PropertyDamage),
            "environmental" => Ok(Self::Environmental),
            "near_miss" => Ok(Self::NearMiss),
            _ => Err(DomainError::UnknownKind {
                kind: "incident kind".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for IncidentKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// How badly the incident turned out (actual consequence, not potential).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Minor,
    Moderate,
    Serious,
    Critical,
}

impl Severity {
    /// Returns the string representation of the severity.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Minor => "minor",
            Self::Moderate => "moderate",
            Self::Serious => "serious",
            Self::Critical => "critical",
        }
    }

    /// Parses a severity from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownKind` if the string is not a valid severity.
    pub fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "minor" => Ok(Self::Minor),
            "moderate" => Ok(Self::Moderate),
            "serious" => Ok(Self::Serious),
            "critical" => Ok(Self::Critical),
            _ => Err(DomainError::UnknownKind {
                kind: "severity".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for Severity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// A logged incident.
///
/// `incident_id` is `None` until persisted. `investigated_by`,
/// `findings` and `root_cause` are filled in as the investigation
/// progresses; `closed_at` is set exactly on entering the terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Incident {
    pub incident_id: Option<i64>,
    pub incident_number: String,
    pub title: String,
    pub description: String,
    pub kind: IncidentKind,
    pub severity: Severity,
    pub status: IncidentStatus,
    pub plant_id: i64,
    pub department_id: i64,
    pub occurred_at: String,
    pub reported_by: i64,
    pub investigated_by: Option<i64>,
    pub findings: Option<String>,
    pub root_cause: Option<String>,
    pub closed_at: Option<String>,
    pub created_at: String,
    pub created_by: String,
    pub updated_at: String,
    pub updated_by: String,
}
