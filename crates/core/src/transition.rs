// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Transition planning.
//!
//! A plan is computed before anything is persisted: the lifecycle table
//! is consulted, and the fields coupled to the new status (close-out,
//! completion, approval stamps) come back as explicit effects for the
//! caller to apply. Planning is pure; the caller supplies `now`.

use crate::error::CoreError;
use sitesafe_domain::{AuditStatus, PermitStatus, StatusLifecycle, validate_score};

/// The validated effects of a status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPlan<S> {
    /// The status before the change.
    pub from: S,
    /// The status after the change.
    pub to: S,
    /// Set exactly when `to` is terminal.
    pub closed_at: Option<String>,
}

/// Plans a status transition for any lifecycle entity.
///
/// # Arguments
///
/// * `current` - The entity's persisted status
/// * `requested` - The target status
/// * `now` - The current instant, RFC 3339 UTC
///
/// # Errors
///
/// Returns `CoreError::DomainViolation` if the transition is not in the
/// lifecycle table.
pub fn plan_transition<S: StatusLifecycle>(
    current: S,
    requested: S,
    now: &str,
) -> Result<TransitionPlan<S>, CoreError> {
    current.validate_transition(requested)?;

    let closed_at: Option<String> = if requested.is_terminal() {
        Some(now.to_string())
    } else {
        None
    };

    Ok(TransitionPlan {
        from: current,
        to: requested,
        closed_at,
    })
}

/// A planned audit transition with its completion effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditTransitionPlan {
    pub plan: TransitionPlan<AuditStatus>,
    /// Set exactly when the audit enters `completed`.
    pub completed_at: Option<String>,
    /// The score to record, present exactly on completion.
    pub score: Option<i32>,
}

/// Plans an audit status transition.
///
/// Completing an audit requires a score (0-100); supplying a score on
/// any other transition is rejected.
///
/// # Errors
///
/// Returns `CoreError::DomainViolation` if the transition is illegal or
/// the score is out of range, and `CoreError::StatusDataMismatch` if the
/// score is missing on completion or supplied on a non-completing
/// transition.
pub fn plan_audit_transition(
    current: AuditStatus,
    requested: AuditStatus,
    score: Option<i32>,
    now: &str,
) -> Result<AuditTransitionPlan, CoreError> {
    let plan: TransitionPlan<AuditStatus> = plan_transition(current, requested, now)?;

    if requested == AuditStatus::Completed {
        let Some(score_value) = score else {
            return Err(CoreError::StatusDataMismatch {
                field: String::from("score"),
                message: String::from("required when completing an audit"),
            });
        };
        validate_score(score_value)?;

        return Ok(AuditTransitionPlan {
            plan,
            completed_at: Some(now.to_string()),
            score: Some(score_value),
        });
    }

    if score.is_some() {
        return Err(CoreError::StatusDataMismatch {
            field: String::from("score"),
            message: String::from("only recorded when completing an audit"),
        });
    }

    Ok(AuditTransitionPlan {
        plan,
        completed_at: None,
        score: None,
    })
}

/// Approval-field effects of a permit transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalEffect {
    /// Approval fields untouched.
    None,
    /// Stamp approval metadata (entering `approved`).
    Grant {
        approved_by: i64,
        approved_at: String,
        approval_notes: Option<String>,
    },
    /// Clear approval metadata (bounced back to `draft`).
    Clear,
}

/// A planned permit transition with its approval effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermitTransitionPlan {
    pub plan: TransitionPlan<PermitStatus>,
    pub approval: ApprovalEffect,
}

/// Plans a permit status transition.
///
/// Entering `approved` requires the approving user; supplying one on
/// any other transition is rejected. A permit sent back to `draft` has
/// its approval metadata cleared.
///
/// # Errors
///
/// Returns `CoreError::DomainViolation` if the transition is illegal,
/// and `CoreError::StatusDataMismatch` if the approval fields do not
/// match the transition.
pub fn plan_permit_transition(
    current: PermitStatus,
    requested: PermitStatus,
    approved_by: Option<i64>,
    approval_notes: Option<String>,
    now: &str,
) -> Result<PermitTransitionPlan, CoreError> {
    let plan: TransitionPlan<PermitStatus> = plan_transition(current, requested, now)?;

    if requested == PermitStatus::Approved {
        let Some(approver) = approved_by else {
            return Err(CoreError::StatusDataMismatch {
                field: String::from("approved_by"),
                message: String::from("required when approving a permit"),
            });
        };

        return Ok(PermitTransitionPlan {
            plan,
            approval: ApprovalEffect::Grant {
                approved_by: approver,
                approved_at: now.to_string(),
                approval_notes,
            },
        });
    }

    if approved_by.is_some() || approval_notes.is_some() {
        return Err(CoreError::StatusDataMismatch {
            field: String::from("approved_by"),
            message: String::from("only recorded when approving a permit"),
        });
    }

    let approval: ApprovalEffect = if requested == PermitStatus::Draft {
        ApprovalEffect::Clear
    } else {
        ApprovalEffect::None
    };

    Ok(PermitTransitionPlan { plan, approval })
}
