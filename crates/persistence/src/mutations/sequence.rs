// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Sequence counter allocation.
//!
//! Each (prefix, year) pair owns an independent counter starting at 1.
//! Allocation runs update-then-read inside a transaction so two callers
//! can never be handed the same value; a counter row is created lazily
//! on first use. Values are never reused, so a failed create leaves a
//! gap in the issued numbers.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::debug;

use crate::diesel_schema::sequence_counters;
use crate::error::PersistenceError;

backend_fn! {
/// Allocates the next sequence value for a (prefix, year) pair.
///
/// The first allocation for a pair returns 1 and leaves the counter at
/// 2; later allocations increment from there.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `prefix` - The entity prefix (e.g. "OBS")
/// * `year` - The calendar year the number belongs to
///
/// # Errors
///
/// Returns an error if the database transaction fails.
pub fn next_sequence_value(
    conn: &mut _,
    prefix: &str,
    year: i32,
) -> Result<i64, PersistenceError> {
    let value: i64 = conn.transaction::<i64, PersistenceError, _>(|conn| {
        let updated: usize = diesel::update(
            sequence_counters::table
                .filter(sequence_counters::prefix.eq(prefix))
                .filter(sequence_counters::year.eq(year)),
        )
        .set(sequence_counters::next_value.eq(sequence_counters::next_value + 1))
        .execute(conn)?;

        if updated == 0 {
            diesel::insert_into(sequence_counters::table)
                .values((
                    sequence_counters::prefix.eq(prefix),
                    sequence_counters::year.eq(year),
                    sequence_counters::next_value.eq(2_i64),
                ))
                .execute(conn)?;
            return Ok(1);
        }

        let next: i64 = sequence_counters::table
            .filter(sequence_counters::prefix.eq(prefix))
            .filter(sequence_counters::year.eq(year))
            .select(sequence_counters::next_value)
            .first(conn)?;

        Ok(next - 1)
    })?;

    debug!("Allocated sequence value {} for {}-{}", value, prefix, year);
    Ok(value)
}
}
