// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared status lifecycle behavior.
//!
//! Every lifecycle entity (observation, incident, safety audit, permit)
//! carries a status drawn from a closed enum. Legal transitions are a
//! per-state table, not a convention: no status write may bypass
//! [`StatusLifecycle::validate_transition`].

use crate::error::DomainError;

/// Common contract for entity status enums.
///
/// Implementors supply the state set, the entry state, and the per-state
/// transition table; terminality and transition validation are derived
/// from the table. Terminal states are exactly those with an empty table.
pub trait StatusLifecycle: Copy + Eq + Sized + 'static {
    /// Entity family name used in error messages (e.g. "observation").
    const ENTITY: &'static str;

    /// Every member of the status set, in declaration order.
    const ALL: &'static [Self];

    /// The status assigned at creation.
    fn initial() -> Self;

    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    fn as_str(&self) -> &'static str;

    /// Legal next states from this status.
    fn allowed_transitions(&self) -> &'static [Self];

    /// Parses a status from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownStatus` if the string is not a member
    /// of the status set.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        Self::ALL
            .iter()
            .find(|status| status.as_str() == s)
            .copied()
            .ok_or_else(|| DomainError::UnknownStatus {
                entity: Self::ENTITY.to_string(),
                value: s.to_string(),
            })
    }

    /// Returns true if this status is terminal (no transitions out).
    fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }

    /// Validates a transition from this status to another.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if the current
    /// status is terminal or the target is not in the transition table.
    fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        // Cannot transition from terminal states
        if self.is_terminal() {
            return Err(DomainError::InvalidStatusTransition {
                entity: Self::ENTITY.to_string(),
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "cannot transition from terminal state".to_string(),
            });
        }

        if self.allowed_transitions().contains(&new_status) {
            Ok(())
        } else {
            let allowed: Vec<&str> = self
                .allowed_transitions()
                .iter()
                .map(StatusLifecycle::as_str)
                .collect();
            Err(DomainError::InvalidStatusTransition {
                entity: Self::ENTITY.to_string(),
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: format!("allowed transitions: {}", allowed.join(", ")),
            })
        }
    }
}
