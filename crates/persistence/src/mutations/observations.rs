// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Observation mutations.
//!
//! Status changes are applied through `update_observation_status`, which
//! writes the status together with its coupled closure fields in one
//! statement. The caller passes the final merged values; `None` clears a
//! column.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::{debug, info};

use sitesafe_domain::Observation;

use crate::backend::PersistenceBackend;
use crate::data_models::NewObservation;
use crate::diesel_schema::observations;
use crate::error::PersistenceError;

backend_fn! {
/// Inserts a new observation and returns its ID.
///
/// # Errors
///
/// Returns an error if the insert fails, including when the ticket
/// number collides with an existing one.
pub fn insert_observation(
    conn: &mut _,
    new_observation: &NewObservation,
) -> Result<i64, PersistenceError> {
    info!(
        "Creating observation {} at plant ID {}",
        new_observation.ticket_number, new_observation.plant_id
    );

    diesel::insert_into(observations::table)
        .values(new_observation)
        .execute(conn)?;

    let observation_id: i64 = conn.last_insert_id()?;

    info!(observation_id, "Observation created successfully");
    Ok(observation_id)
}
}

backend_fn! {
/// Rewrites an observation's editable fields. The ticket number, status,
/// and closure fields are untouched; status moves through
/// `update_observation_status` only.
///
/// Returns the number of rows affected (zero when the observation does
/// not exist).
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_observation(
    conn: &mut _,
    observation_id: i64,
    observation: &Observation,
) -> Result<usize, PersistenceError> {
    debug!("Updating observation ID: {}", observation_id);

    let rows_affected: usize = diesel::update(observations::table)
        .filter(observations::observation_id.eq(observation_id))
        .set((
            observations::title.eq(observation.title.as_str()),
            observations::description.eq(observation.description.as_str()),
            observations::kind.eq(observation.kind.as_str()),
            observations::hazard_category.eq(observation.hazard_category.as_str()),
            observations::priority.eq(observation.priority.as_str()),
            observations::plant_id.eq(observation.plant_id),
            observations::department_id.eq(observation.department_id),
            observations::reported_by.eq(observation.reported_by),
            observations::assigned_to.eq(observation.assigned_to),
            observations::due_date.eq(observation.due_date.clone()),
            observations::updated_at.eq(observation.updated_at.as_str()),
            observations::updated_by.eq(observation.updated_by.as_str()),
        ))
        .execute(conn)?;

    Ok(rows_affected)
}
}

backend_fn! {
/// Moves an observation to a new status, writing the coupled closure
/// fields alongside it. Passing `None` clears a column, which is how a
/// reopened observation sheds its resolution.
///
/// Returns the number of rows affected (zero when the observation does
/// not exist).
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `observation_id` - The observation ID
/// * `status` - The new status label
/// * `resolution_notes` - Final resolution notes value
/// * `closed_at` - Final closure timestamp value
/// * `updated_at` - The update timestamp
/// * `updated_by` - The acting user
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_observation_status(
    conn: &mut _,
    observation_id: i64,
    status: &str,
    resolution_notes: Option<String>,
    closed_at: Option<String>,
    updated_at: &str,
    updated_by: &str,
) -> Result<usize, PersistenceError> {
    info!(
        "Moving observation ID {} to status: {}",
        observation_id, status
    );

    let rows_affected: usize = diesel::update(observations::table)
        .filter(observations::observation_id.eq(observation_id))
        .set((
            observations::status.eq(status),
            observations::resolution_notes.eq(resolution_notes),
            observations::closed_at.eq(closed_at),
            observations::updated_at.eq(updated_at),
            observations::updated_by.eq(updated_by),
        ))
        .execute(conn)?;

    Ok(rows_affected)
}
}

backend_fn! {
/// Deletes an observation.
///
/// Returns the number of rows affected (zero when the observation does
/// not exist). Audit events referencing the observation are retained.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_observation(conn: &mut _, observation_id: i64) -> Result<usize, PersistenceError> {
    info!("Deleting observation ID: {}", observation_id);

    let rows_affected: usize = diesel::delete(observations::table)
        .filter(observations::observation_id.eq(observation_id))
        .execute(conn)?;

    Ok(rows_affected)
}
}
