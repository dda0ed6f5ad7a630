// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit trail mutations.
//!
//! Events are append-only. Nothing updates or deletes a recorded event;
//! the trail outlives the entity it describes.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::data_models::NewAuditEvent;
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

backend_fn! {
/// Appends an audit event and returns its ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn record_event(conn: &mut _, event: &NewAuditEvent) -> Result<i64, PersistenceError> {
    debug!(
        "Recording audit event: {} on {} ID {}",
        event.action, event.entity_kind, event.entity_id
    );

    diesel::insert_into(audit_events::table)
        .values(event)
        .execute(conn)?;

    let audit_event_id: i64 = conn.last_insert_id()?;

    debug!(audit_event_id, "Audit event recorded");
    Ok(audit_event_id)
}
}
