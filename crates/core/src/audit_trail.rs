// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event construction.
//!
//! Every successful state change produces exactly one audit event, and
//! all events are built here so the shapes stay uniform: creation events
//! carry the initial status, status events carry both endpoints, delete
//! events carry the last status, field updates carry none.

use sitesafe_audit::{Action, Actor, AuditEvent, EntityRef, StatusChange};

/// Builds the event recorded when an entity is created.
///
/// `initial_status` is `None` for reference entities (plants,
/// departments, user accounts), which have no lifecycle.
#[must_use]
pub fn creation_event(
    actor: Actor,
    entity: EntityRef,
    details: String,
    initial_status: Option<&str>,
    now: &str,
) -> AuditEvent {
    let change: Option<StatusChange> =
        initial_status.map(|status| StatusChange::new(None, Some(status.to_string())));
    AuditEvent::new(
        actor,
        entity,
        Action::new(String::from("create"), Some(details)),
        change,
        None,
        now.to_string(),
    )
}

/// Builds the event recorded for a field-only update.
#[must_use]
pub fn update_event(actor: Actor, entity: EntityRef, details: String, now: &str) -> AuditEvent {
    AuditEvent::new(
        actor,
        entity,
        Action::new(String::from("update"), Some(details)),
        None,
        None,
        now.to_string(),
    )
}

/// Builds the event recorded for a status transition.
#[must_use]
pub fn status_event(
    actor: Actor,
    entity: EntityRef,
    from: &str,
    to: &str,
    note: Option<String>,
    now: &str,
) -> AuditEvent {
    AuditEvent::new(
        actor,
        entity,
        Action::new(
            String::from("update_status"),
            Some(format!("Changed status from {from} to {to}")),
        ),
        Some(StatusChange::new(
            Some(from.to_string()),
            Some(to.to_string()),
        )),
        note,
        now.to_string(),
    )
}

/// Builds the event recorded when an entity is deleted.
///
/// The event survives the row: audit trails are retained after deletion.
#[must_use]
pub fn deletion_event(
    actor: Actor,
    entity: EntityRef,
    details: String,
    last_status: Option<&str>,
    now: &str,
) -> AuditEvent {
    let change: Option<StatusChange> =
        last_status.map(|status| StatusChange::new(Some(status.to_string()), None));
    AuditEvent::new(
        actor,
        entity,
        Action::new(String::from("delete"), Some(details)),
        change,
        None,
        now.to_string(),
    )
}

/// Builds the single event recorded for a bulk import.
///
/// Batch events are not about one row; the entity ref carries id 0.
#[must_use]
pub fn import_event(actor: Actor, entity: EntityRef, details: String, now: &str) -> AuditEvent {
    AuditEvent::new(
        actor,
        entity,
        Action::new(String::from("import"), Some(details)),
        None,
        None,
        now.to_string(),
    )
}
