// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Permit mutations.
//!
//! The permit row and its worker roster live in separate tables, so
//! inserts, full updates, and deletes run inside a transaction to keep
//! the pair consistent.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::{debug, info};

use sitesafe_domain::Permit;

use crate::backend::PersistenceBackend;
use crate::data_models::NewPermit;
use crate::diesel_schema::{permit_workers, permits};
use crate::error::PersistenceError;

backend_fn! {
/// Inserts a new permit with its worker roster and returns the permit ID.
///
/// # Errors
///
/// Returns an error if the insert fails, including when the permit
/// number collides with an existing one or a worker reference is
/// invalid.
pub fn insert_permit(
    conn: &mut _,
    new_permit: &NewPermit,
    worker_ids: &[i64],
) -> Result<i64, PersistenceError> {
    info!(
        "Creating permit {} at plant ID {} with {} workers",
        new_permit.permit_number,
        new_permit.plant_id,
        worker_ids.len()
    );

    let permit_id: i64 = conn.transaction::<i64, PersistenceError, _>(|conn| {
        diesel::insert_into(permits::table)
            .values(new_permit)
            .execute(conn)?;

        let permit_id: i64 = conn.last_insert_id()?;

        if !worker_ids.is_empty() {
            let roster: Vec<_> = worker_ids
                .iter()
                .map(|user_id| {
                    (
                        permit_workers::permit_id.eq(permit_id),
                        permit_workers::user_id.eq(*user_id),
                    )
                })
                .collect();
            diesel::insert_into(permit_workers::table)
                .values(roster)
                .execute(conn)?;
        }

        Ok(permit_id)
    })?;

    info!(permit_id, "Permit created successfully");
    Ok(permit_id)
}
}

backend_fn! {
/// Rewrites a permit's editable fields and replaces its worker roster.
/// The permit number, status, and approval fields are untouched.
///
/// Returns the number of rows affected (zero when the permit does not
/// exist, in which case the roster is left alone).
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_permit(
    conn: &mut _,
    permit_id: i64,
    permit: &Permit,
) -> Result<usize, PersistenceError> {
    debug!("Updating permit ID: {}", permit_id);

    conn.transaction::<usize, PersistenceError, _>(|conn| {
        let rows_affected: usize = diesel::update(permits::table)
            .filter(permits::permit_id.eq(permit_id))
            .set((
                permits::title.eq(permit.title.as_str()),
                permits::description.eq(permit.description.as_str()),
                permits::kind.eq(permit.kind.as_str()),
                permits::plant_id.eq(permit.plant_id),
                permits::department_id.eq(permit.department_id),
                permits::requested_by.eq(permit.requested_by),
                permits::valid_from.eq(permit.valid_from.as_str()),
                permits::valid_to.eq(permit.valid_to.as_str()),
                permits::updated_at.eq(permit.updated_at.as_str()),
                permits::updated_by.eq(permit.updated_by.as_str()),
            ))
            .execute(conn)?;

        if rows_affected == 0 {
            return Ok(0);
        }

        diesel::delete(permit_workers::table)
            .filter(permit_workers::permit_id.eq(permit_id))
            .execute(conn)?;

        if !permit.worker_ids.is_empty() {
            let roster: Vec<_> = permit
                .worker_ids
                .iter()
                .map(|user_id| {
                    (
                        permit_workers::permit_id.eq(permit_id),
                        permit_workers::user_id.eq(*user_id),
                    )
                })
                .collect();
            diesel::insert_into(permit_workers::table)
                .values(roster)
                .execute(conn)?;
        }

        Ok(rows_affected)
    })
}
}

backend_fn! {
/// Moves a permit to a new status, writing the coupled approval fields
/// alongside it. The caller passes the final merged values; `None`
/// clears a column, which is how a permit sent back to draft sheds its
/// approval.
///
/// Returns the number of rows affected (zero when the permit does not
/// exist).
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `permit_id` - The permit ID
/// * `status` - The new status label
/// * `approved_by` - Final approver reference
/// * `approved_at` - Final approval timestamp value
/// * `approval_notes` - Final approval notes text
/// * `closed_at` - Final closure timestamp value
/// * `updated_at` - The update timestamp
/// * `updated_by` - The acting user
///
/// # Errors
///
/// Returns an error if the database update fails.
#[allow(clippy::too_many_arguments)]
pub fn update_permit_status(
    conn: &mut _,
    permit_id: i64,
    status: &str,
    approved_by: Option<i64>,
    approved_at: Option<String>,
    approval_notes: Option<String>,
    closed_at: Option<String>,
    updated_at: &str,
    updated_by: &str,
) -> Result<usize, PersistenceError> {
    info!("Moving permit ID {} to status: {}", permit_id, status);

    let rows_affected: usize = diesel::update(permits::table)
        .filter(permits::permit_id.eq(permit_id))
        .set((
            permits::status.eq(status),
            permits::approved_by.eq(approved_by),
            permits::approved_at.eq(approved_at),
            permits::approval_notes.eq(approval_notes),
            permits::closed_at.eq(closed_at),
            permits::updated_at.eq(updated_at),
            permits::updated_by.eq(updated_by),
        ))
        .execute(conn)?;

    Ok(rows_affected)
}
}

backend_fn! {
/// Deletes a permit and its worker roster.
///
/// Returns the number of rows affected for the permit row itself (zero
/// when the permit does not exist). Audit events referencing the permit
/// are retained.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_permit(conn: &mut _, permit_id: i64) -> Result<usize, PersistenceError> {
    info!("Deleting permit ID: {}", permit_id);

    conn.transaction::<usize, PersistenceError, _>(|conn| {
        diesel::delete(permit_workers::table)
            .filter(permit_workers::permit_id.eq(permit_id))
            .execute(conn)?;

        let rows_affected: usize = diesel::delete(permits::table)
            .filter(permits::permit_id.eq(permit_id))
            .execute(conn)?;

        Ok(rows_affected)
    })
}
}
