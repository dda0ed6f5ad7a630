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
    clippy::all
)]

/// The entity families an audit event can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Observation,
    Incident,
    SafetyAudit,
    Permit,
    Plant,
    Department,
    UserAccount,
}

impl EntityKind {
    /// Returns the string representation used for persistence.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Observation => "observation",
            Self::Incident => "incident",
            Self::SafetyAudit => "safety_audit",
            Self::Permit => "permit",
            Self::Plant => "plant",
            Self::Department => "department",
            Self::UserAccount => "user_account",
        }
    }
}

/// Represents the entity performing an action.
///
/// An actor is the acting-user string carried on the mutating request.
/// There is no authentication layer; the string is recorded as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The identifier for this actor.
    pub id: String,
}

impl Actor {
    /// Creates a new Actor.
    #[must_use]
    pub const fn new(id: String) -> Self {
        Self { id }
    }
}

/// Identifies the entity an event is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityRef {
    /// The entity family.
    pub kind: EntityKind,
    /// The entity's row id.
    pub id: i64,
}

impl EntityRef {
    /// Creates a new `EntityRef`.
    #[must_use]
    pub const fn new(kind: EntityKind, id: i64) -> Self {
        Self { kind, id }
    }
}

/// Represents the specific action performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// The verb (e.g., "create", "update_status", "delete").
    pub name: String,
    /// Optional additional details about the action.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the action
    /// * `details` - Optional additional details
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// The status movement captured by an event, when there was one.
///
/// On creation `from` is `None` and `to` is the initial status; on
/// deletion `to` is `None`. Field-only updates carry no status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    /// The status before the change.
    pub from: Option<String>,
    /// The status after the change.
    pub to: Option<String>,
}

impl StatusChange {
    /// Creates a new `StatusChange`.
    #[must_use]
    pub const fn new(from: Option<String>, to: Option<String>) -> Self {
        Self { from, to }
    }
}

/// An immutable audit event.
///
/// Every successful state change must produce exactly one audit event.
/// Audit events are immutable once created and capture:
/// - Who performed the action (actor)
/// - What entity it targeted (entity)
/// - What was done (action)
/// - The status movement, if any (change)
/// - A free-text note from the request, if any (note)
/// - When it was recorded (`recorded_at`, RFC 3339 UTC)
///
/// Events outlive their entity: deleting an entity retains its trail,
/// including the delete event itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// The actor who initiated this state change.
    pub actor: Actor,
    /// The entity the event is about.
    pub entity: EntityRef,
    /// The action that was performed.
    pub action: Action,
    /// The status movement, when the action changed status.
    pub change: Option<StatusChange>,
    /// Optional free-text note from the request.
    pub note: Option<String>,
    /// When the event was recorded.
    pub recorded_at: String,
}

impl AuditEvent {
    /// Creates a new `AuditEvent`.
    ///
    /// Once created, an audit event is immutable.
    #[must_use]
    pub const fn new(
        actor: Actor,
        entity: EntityRef,
        action: Action,
        change: Option<StatusChange>,
        note: Option<String>,
        recorded_at: String,
    ) -> Self {
        Self {
            actor,
            entity,
            action,
            change,
            note,
            recorded_at,
        }
    }
}
