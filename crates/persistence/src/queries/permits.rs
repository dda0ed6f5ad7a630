// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Permit query operations.
//!
//! Permits carry their authorized worker list from the `permit_workers`
//! table. Single-row gets load workers directly; list queries batch-load
//! workers for the whole page with one `eq_any` query.

use std::collections::HashMap;

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::debug;

use sitesafe_domain::Permit;

use crate::data_models::{PageSpec, PermitFilter, PermitRow};
use crate::diesel_schema::{permit_workers, permits};
use crate::error::PersistenceError;

backend_fn! {
/// Retrieves a permit by ID, including its worker list.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the permit is not found.
pub fn get_permit(conn: &mut _, permit_id: i64) -> Result<Option<Permit>, PersistenceError> {
    debug!("Looking up permit by ID: {}", permit_id);

    let result: Result<PermitRow, diesel::result::Error> = permits::table
        .filter(permits::permit_id.eq(permit_id))
        .select(PermitRow::as_select())
        .first(conn);

    let row: PermitRow = match result {
        Ok(row) => row,
        Err(diesel::result::Error::NotFound) => return Ok(None),
        Err(e) => return Err(PersistenceError::from(e)),
    };

    let worker_ids: Vec<i64> = permit_workers::table
        .filter(permit_workers::permit_id.eq(permit_id))
        .order(permit_workers::user_id.asc())
        .select(permit_workers::user_id)
        .load(conn)?;

    Ok(Some(row.into_domain(worker_ids)?))
}
}

backend_fn! {
/// Lists permits matching the filter, returning one page of rows plus
/// the total match count. Worker lists for the page are loaded with a
/// single batched query.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_permits(
    conn: &mut _,
    filter: &PermitFilter,
    page: &PageSpec,
) -> Result<(Vec<Permit>, i64), PersistenceError> {
    let mut query = permits::table.select(PermitRow::as_select()).into_boxed();
    let mut count_query = permits::table.into_boxed();

    if let Some(plant_id) = filter.plant_id {
        query = query.filter(permits::plant_id.eq(plant_id));
        count_query = count_query.filter(permits::plant_id.eq(plant_id));
    }
    if let Some(department_id) = filter.department_id {
        query = query.filter(permits::department_id.eq(department_id));
        count_query = count_query.filter(permits::department_id.eq(department_id));
    }
    if !filter.statuses.is_empty() {
        query = query.filter(permits::status.eq_any(filter.statuses.clone()));
        count_query = count_query.filter(permits::status.eq_any(filter.statuses.clone()));
    }
    if !filter.kinds.is_empty() {
        query = query.filter(permits::kind.eq_any(filter.kinds.clone()));
        count_query = count_query.filter(permits::kind.eq_any(filter.kinds.clone()));
    }
    if let Some(date_from) = &filter.date_from {
        query = query.filter(permits::created_at.ge(date_from.clone()));
        count_query = count_query.filter(permits::created_at.ge(date_from.clone()));
    }
    if let Some(date_to) = &filter.date_to {
        query = query.filter(permits::created_at.lt(date_to.clone()));
        count_query = count_query.filter(permits::created_at.lt(date_to.clone()));
    }
    if let Some(search) = &filter.search {
        let pattern: String = format!("%{search}%");
        query = query.filter(
            permits::title
                .like(pattern.clone())
                .or(permits::description.like(pattern.clone())),
        );
        count_query = count_query.filter(
            permits::title
                .like(pattern.clone())
                .or(permits::description.like(pattern)),
        );
    }

    let total: i64 = count_query.count().get_result(conn)?;

    query = match (page.sort_by.as_deref(), page.sort_descending) {
        (Some("title"), false) => query.order(permits::title.asc()),
        (Some("title"), true) => query.order(permits::title.desc()),
        (Some("status"), false) => query.order(permits::status.asc()),
        (Some("status"), true) => query.order(permits::status.desc()),
        (Some("valid_from"), false) => query.order(permits::valid_from.asc()),
        (Some("valid_from"), true) => query.order(permits::valid_from.desc()),
        (Some("valid_to"), false) => query.order(permits::valid_to.asc()),
        (Some("valid_to"), true) => query.order(permits::valid_to.desc()),
        (Some("updated_at"), false) => query.order(permits::updated_at.asc()),
        (Some("updated_at"), true) => query.order(permits::updated_at.desc()),
        (_, false) => query.order(permits::created_at.asc()),
        (_, true) => query.order(permits::created_at.desc()),
    };
    query = query.then_order_by(permits::permit_id.desc());

    let rows: Vec<PermitRow> = query.limit(page.limit).offset(page.offset).load(conn)?;

    let page_ids: Vec<i64> = rows.iter().map(|row| row.permit_id).collect();
    let worker_rows: Vec<(i64, i64)> = permit_workers::table
        .filter(permit_workers::permit_id.eq_any(page_ids))
        .order(permit_workers::user_id.asc())
        .select((permit_workers::permit_id, permit_workers::user_id))
        .load(conn)?;

    let mut workers_by_permit: HashMap<i64, Vec<i64>> = HashMap::new();
    for (permit_id, user_id) in worker_rows {
        workers_by_permit.entry(permit_id).or_default().push(user_id);
    }

    let mut results: Vec<Permit> = Vec::with_capacity(rows.len());
    for row in rows {
        let worker_ids: Vec<i64> = workers_by_permit.remove(&row.permit_id).unwrap_or_default();
        results.push(row.into_domain(worker_ids)?);
    }

    Ok((results, total))
}
}

backend_fn! {
/// Counts permits per status within the filter's scope.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_permits_by_status(
    conn: &mut _,
    filter: &PermitFilter,
) -> Result<Vec<(String, i64)>, PersistenceError> {
    let mut query = permits::table
        .group_by(permits::status)
        .select((permits::status, diesel::dsl::count_star()))
        .into_boxed();

    if let Some(plant_id) = filter.plant_id {
        query = query.filter(permits::plant_id.eq(plant_id));
    }
    if let Some(department_id) = filter.department_id {
        query = query.filter(permits::department_id.eq(department_id));
    }
    if let Some(date_from) = &filter.date_from {
        query = query.filter(permits::created_at.ge(date_from.clone()));
    }
    if let Some(date_to) = &filter.date_to {
        query = query.filter(permits::created_at.lt(date_to.clone()));
    }

    Ok(query.load::<(String, i64)>(conn)?)
}
}

backend_fn! {
/// Counts permits per kind within the filter's scope, ordered by kind
/// name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_permits_by_kind(
    conn: &mut _,
    filter: &PermitFilter,
) -> Result<Vec<(String, i64)>, PersistenceError> {
    let mut query = permits::table
        .group_by(permits::kind)
        .select((permits::kind, diesel::dsl::count_star()))
        .into_boxed();

    if let Some(plant_id) = filter.plant_id {
        query = query.filter(permits::plant_id.eq(plant_id));
    }
    if let Some(department_id) = filter.department_id {
        query = query.filter(permits::department_id.eq(department_id));
    }
    if let Some(date_from) = &filter.date_from {
        query = query.filter(permits::created_at.ge(date_from.clone()));
    }
    if let Some(date_to) = &filter.date_to {
        query = query.filter(permits::created_at.lt(date_to.clone()));
    }

    Ok(query.order(permits::kind.asc()).load::<(String, i64)>(conn)?)
}
}
