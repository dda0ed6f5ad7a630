// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Incident mutations.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::{debug, info};

use sitesafe_domain::Incident;

use crate::backend::PersistenceBackend;
use crate::data_models::NewIncident;
use crate::diesel_schema::incidents;
use crate::error::PersistenceError;

backend_fn! {
/// Inserts a new incident and returns its ID.
///
/// # Errors
///
/// Returns an error if the insert fails, including when the incident
/// number collides with an existing one.
pub fn insert_incident(
    conn: &mut _,
    new_incident: &NewIncident,
) -> Result<i64, PersistenceError> {
    info!(
        "Creating incident {} at plant ID {}",
        new_incident.incident_number, new_incident.plant_id
    );

    diesel::insert_into(incidents::table)
        .values(new_incident)
        .execute(conn)?;

    let incident_id: i64 = conn.last_insert_id()?;

    info!(incident_id, "Incident created successfully");
    Ok(incident_id)
}
}

backend_fn! {
/// Rewrites an incident's editable fields. The incident number, status,
/// and investigation fields are untouched.
///
/// Returns the number of rows affected (zero when the incident does not
/// exist).
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_incident(
    conn: &mut _,
    incident_id: i64,
    incident: &Incident,
) -> Result<usize, PersistenceError> {
    debug!("Updating incident ID: {}", incident_id);

    let rows_affected: usize = diesel::update(incidents::table)
        .filter(incidents::incident_id.eq(incident_id))
        .set((
            incidents::title.eq(incident.title.as_str()),
            incidents::description.eq(incident.description.as_str()),
            incidents::kind.eq(incident.kind.as_str()),
            incidents::severity.eq(incident.severity.as_str()),
            incidents::plant_id.eq(incident.plant_id),
            incidents::department_id.eq(incident.department_id),
            incidents::occurred_at.eq(incident.occurred_at.as_str()),
            incidents::reported_by.eq(incident.reported_by),
            incidents::updated_at.eq(incident.updated_at.as_str()),
            incidents::updated_by.eq(incident.updated_by.as_str()),
        ))
        .execute(conn)?;

    Ok(rows_affected)
}
}

backend_fn! {
/// Moves an incident to a new status, writing the coupled investigation
/// fields alongside it. The caller passes the final merged values;
/// `None` clears a column.
///
/// Returns the number of rows affected (zero when the incident does not
/// exist).
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `incident_id` - The incident ID
/// * `status` - The new status label
/// * `investigated_by` - Final investigator reference
/// * `findings` - Final findings text
/// * `root_cause` - Final root cause text
/// * `closed_at` - Final closure timestamp value
/// * `updated_at` - The update timestamp
/// * `updated_by` - The acting user
///
/// # Errors
///
/// Returns an error if the database update fails.
#[allow(clippy::too_many_arguments)]
pub fn update_incident_status(
    conn: &mut _,
    incident_id: i64,
    status: &str,
    investigated_by: Option<i64>,
    findings: Option<String>,
    root_cause: Option<String>,
    closed_at: Option<String>,
    updated_at: &str,
    updated_by: &str,
) -> Result<usize, PersistenceError> {
    info!("Moving incident ID {} to status: {}", incident_id, status);

    let rows_affected: usize = diesel::update(incidents::table)
        .filter(incidents::incident_id.eq(incident_id))
        .set((
            incidents::status.eq(status),
            incidents::investigated_by.eq(investigated_by),
            incidents::findings.eq(findings),
            incidents::root_cause.eq(root_cause),
            incidents::closed_at.eq(closed_at),
            incidents::updated_at.eq(updated_at),
            incidents::updated_by.eq(updated_by),
        ))
        .execute(conn)?;

    Ok(rows_affected)
}
}

backend_fn! {
/// Deletes an incident.
///
/// Returns the number of rows affected (zero when the incident does not
/// exist). Audit events referencing the incident are retained.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_incident(conn: &mut _, incident_id: i64) -> Result<usize, PersistenceError> {
    info!("Deleting incident ID: {}", incident_id);

    let rows_affected: usize = diesel::delete(incidents::table)
        .filter(incidents::incident_id.eq(incident_id))
        .execute(conn)?;

    Ok(rows_affected)
}
}
