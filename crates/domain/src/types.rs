// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reference entities: plants, departments, and user accounts.
//!
//! Lifecycle entities reference exactly one plant and one department,
//! and refer to user accounts for person roles (reporter, assignee,
//! investigator, auditor, requester, approver, permit workers).
//! Departments are org-wide, not nested under plants.

/// A physical site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plant {
    /// `None` until the plant is persisted.
    pub plant_id: Option<i64>,
    /// Display name.
    pub name: String,
    /// Short unique site code (e.g. "FRK1").
    pub code: String,
    pub created_at: String,
    pub updated_at: String,
}

/// An organizational unit, shared across plants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Department {
    /// `None` until the department is persisted.
    pub department_id: Option<i64>,
    /// Display name.
    pub name: String,
    /// Short unique code (e.g. "MAINT").
    pub code: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A person referenced by lifecycle entities.
///
/// User accounts exist so DTOs can denormalize display names; they carry
/// no credentials. The audit-stamp fields on entities (`created_by`,
/// `updated_by`) are free-form actor strings, not account references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    /// `None` until the account is persisted.
    pub user_id: Option<i64>,
    pub full_name: String,
    /// Unique, structurally validated (must contain a local part and domain).
    pub email: String,
    pub job_title: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}
