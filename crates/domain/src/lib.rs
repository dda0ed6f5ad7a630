// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod incident;
mod lifecycle;
mod observation;
mod permit;
mod safety_audit;
mod sequence;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use incident::{Incident, IncidentKind, IncidentStatus, Severity};
pub use lifecycle::StatusLifecycle;
pub use observation::{Observation, ObservationKind, ObservationStatus, Priority};
pub use permit::{Permit, PermitKind, PermitStatus};
pub use safety_audit::{AuditStatus, SafetyAudit};

// Re-export public types
pub use sequence::{
    AUDIT_PREFIX, INCIDENT_PREFIX, OBSERVATION_PREFIX, PERMIT_PREFIX, format_sequence_number,
};
pub use types::{Department, Plant, UserAccount};
pub use validation::{
    parse_date, parse_timestamp, validate_actor, validate_code, validate_email,
    validate_required_text, validate_score, validate_validity_window,
};
