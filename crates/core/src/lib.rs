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

mod audit_trail;
mod error;
mod paging;
mod projection;
mod statistics;
mod transition;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use audit_trail::{creation_event, deletion_event, import_event, status_event, update_event};
pub use error::CoreError;
pub use paging::{
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, normalize_page, normalize_page_size, offset, total_pages,
};
pub use projection::{
    DepartmentInfo, IncidentInfo, NameIndex, ObservationInfo, PermitInfo, PermitWorkerInfo,
    PlantInfo, SafetyAuditInfo, UserAccountInfo, project_incident, project_observation,
    project_permit, project_safety_audit,
};
pub use statistics::{
    AuditStatistics, IncidentStatistics, ObservationStatistics, PermitStatistics, audit_statistics,
    average_score, incident_statistics, observation_statistics, permit_statistics,
};
pub use transition::{
    ApprovalEffect, AuditTransitionPlan, PermitTransitionPlan, TransitionPlan,
    plan_audit_transition, plan_permit_transition, plan_transition,
};
