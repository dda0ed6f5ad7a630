// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit trail queries.
//!
//! Events are returned oldest-first so a trail reads as a chronology.
//! Events survive deletion of the entity they describe.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::debug;

use crate::data_models::AuditEventRow;
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

backend_fn! {
/// Retrieves the audit trail for one entity, ordered by recording time
/// with event ID as the tiebreaker.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `entity_kind` - The entity kind label (e.g. "observation")
/// * `entity_id` - The entity's ID
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn events_for_entity(
    conn: &mut _,
    entity_kind: &str,
    entity_id: i64,
) -> Result<Vec<AuditEventRow>, PersistenceError> {
    debug!(
        "Loading audit trail for {} ID {}",
        entity_kind, entity_id
    );

    Ok(audit_events::table
        .filter(audit_events::entity_kind.eq(entity_kind))
        .filter(audit_events::entity_id.eq(entity_id))
        .order(audit_events::recorded_at.asc())
        .then_order_by(audit_events::audit_event_id.asc())
        .select(AuditEventRow::as_select())
        .load(conn)?)
}
}
