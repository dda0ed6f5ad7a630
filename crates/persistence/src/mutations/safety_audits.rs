// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Safety audit mutations.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::{debug, info};

use sitesafe_domain::SafetyAudit;

use crate::backend::PersistenceBackend;
use crate::data_models::NewSafetyAudit;
use crate::diesel_schema::safety_audits;
use crate::error::PersistenceError;

backend_fn! {
/// Inserts a new safety audit and returns its ID.
///
/// # Errors
///
/// Returns an error if the insert fails, including when the audit
/// number collides with an existing one.
pub fn insert_safety_audit(
    conn: &mut _,
    new_audit: &NewSafetyAudit,
) -> Result<i64, PersistenceError> {
    info!(
        "Creating safety audit {} at plant ID {}",
        new_audit.audit_number, new_audit.plant_id
    );

    diesel::insert_into(safety_audits::table)
        .values(new_audit)
        .execute(conn)?;

    let audit_id: i64 = conn.last_insert_id()?;

    info!(audit_id, "Safety audit created successfully");
    Ok(audit_id)
}
}

backend_fn! {
/// Rewrites a safety audit's editable fields. The audit number, status,
/// and completion fields are untouched.
///
/// Returns the number of rows affected (zero when the audit does not
/// exist).
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_safety_audit(
    conn: &mut _,
    audit_id: i64,
    audit: &SafetyAudit,
) -> Result<usize, PersistenceError> {
    debug!("Updating safety audit ID: {}", audit_id);

    let rows_affected: usize = diesel::update(safety_audits::table)
        .filter(safety_audits::audit_id.eq(audit_id))
        .set((
            safety_audits::title.eq(audit.title.as_str()),
            safety_audits::description.eq(audit.description.as_str()),
            safety_audits::plant_id.eq(audit.plant_id),
            safety_audits::department_id.eq(audit.department_id),
            safety_audits::auditor_id.eq(audit.auditor_id),
            safety_audits::scheduled_date.eq(audit.scheduled_date.as_str()),
            safety_audits::updated_at.eq(audit.updated_at.as_str()),
            safety_audits::updated_by.eq(audit.updated_by.as_str()),
        ))
        .execute(conn)?;

    Ok(rows_affected)
}
}

backend_fn! {
/// Moves a safety audit to a new status, writing the coupled completion
/// fields alongside it. The caller passes the final merged values;
/// `None` clears a column.
///
/// Returns the number of rows affected (zero when the audit does not
/// exist).
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `audit_id` - The safety audit ID
/// * `status` - The new status label
/// * `completed_at` - Final completion timestamp value
/// * `score` - Final score value (0-100)
/// * `summary` - Final report summary text
/// * `closed_at` - Final closure timestamp value
/// * `updated_at` - The update timestamp
/// * `updated_by` - The acting user
///
/// # Errors
///
/// Returns an error if the database update fails.
#[allow(clippy::too_many_arguments)]
pub fn update_safety_audit_status(
    conn: &mut _,
    audit_id: i64,
    status: &str,
    completed_at: Option<String>,
    score: Option<i32>,
    summary: Option<String>,
    closed_at: Option<String>,
    updated_at: &str,
    updated_by: &str,
) -> Result<usize, PersistenceError> {
    info!("Moving safety audit ID {} to status: {}", audit_id, status);

    let rows_affected: usize = diesel::update(safety_audits::table)
        .filter(safety_audits::audit_id.eq(audit_id))
        .set((
            safety_audits::status.eq(status),
            safety_audits::completed_at.eq(completed_at),
            safety_audits::score.eq(score),
            safety_audits::summary.eq(summary),
            safety_audits::closed_at.eq(closed_at),
            safety_audits::updated_at.eq(updated_at),
            safety_audits::updated_by.eq(updated_by),
        ))
        .execute(conn)?;

    Ok(rows_affected)
}
}

backend_fn! {
/// Deletes a safety audit.
///
/// Returns the number of rows affected (zero when the audit does not
/// exist). Audit events referencing the audit are retained.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_safety_audit(conn: &mut _, audit_id: i64) -> Result<usize, PersistenceError> {
    info!("Deleting safety audit ID: {}", audit_id);

    let rows_affected: usize = diesel::delete(safety_audits::table)
        .filter(safety_audits::audit_id.eq(audit_id))
        .execute(conn)?;

    Ok(rows_affected)
}
}
