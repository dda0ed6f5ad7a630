// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Observation query operations.
//!
//! List queries apply the filter to both the page query and the count
//! query so totals always match the visible rows. Statistics queries
//! honor only the scope fields of the filter (plant, department, date
//! range); membership and search filters do not apply there.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::debug;

use sitesafe_domain::Observation;

use crate::data_models::{ObservationFilter, ObservationRow, PageSpec};
use crate::diesel_schema::observations;
use crate::error::PersistenceError;

backend_fn! {
/// Retrieves an observation by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the observation is not found.
pub fn get_observation(
    conn: &mut _,
    observation_id: i64,
) -> Result<Option<Observation>, PersistenceError> {
    debug!("Looking up observation by ID: {}", observation_id);

    let result: Result<ObservationRow, diesel::result::Error> = observations::table
        .filter(observations::observation_id.eq(observation_id))
        .select(ObservationRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(Observation::try_from(row)?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Lists observations matching the filter, returning one page of rows
/// plus the total match count.
///
/// Filters apply in order: plant/department equality, status/kind/priority
/// membership, created-at date range, free-text search over title and
/// description. `LIKE` is case-insensitive under both backends' default
/// collations.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_observations(
    conn: &mut _,
    filter: &ObservationFilter,
    page: &PageSpec,
) -> Result<(Vec<Observation>, i64), PersistenceError> {
    let mut query = observations::table
        .select(ObservationRow::as_select())
        .into_boxed();
    let mut count_query = observations::table.into_boxed();

    if let Some(plant_id) = filter.plant_id {
        query = query.filter(observations::plant_id.eq(plant_id));
        count_query = count_query.filter(observations::plant_id.eq(plant_id));
    }
    if let Some(department_id) = filter.department_id {
        query = query.filter(observations::department_id.eq(department_id));
        count_query = count_query.filter(observations::department_id.eq(department_id));
    }
    if !filter.statuses.is_empty() {
        query = query.filter(observations::status.eq_any(filter.statuses.clone()));
        count_query = count_query.filter(observations::status.eq_any(filter.statuses.clone()));
    }
    if !filter.kinds.is_empty() {
        query = query.filter(observations::kind.eq_any(filter.kinds.clone()));
        count_query = count_query.filter(observations::kind.eq_any(filter.kinds.clone()));
    }
    if !filter.priorities.is_empty() {
        query = query.filter(observations::priority.eq_any(filter.priorities.clone()));
        count_query = count_query.filter(observations::priority.eq_any(filter.priorities.clone()));
    }
    if let Some(date_from) = &filter.date_from {
        query = query.filter(observations::created_at.ge(date_from.clone()));
        count_query = count_query.filter(observations::created_at.ge(date_from.clone()));
    }
    if let Some(date_to) = &filter.date_to {
        query = query.filter(observations::created_at.lt(date_to.clone()));
        count_query = count_query.filter(observations::created_at.lt(date_to.clone()));
    }
    if let Some(search) = &filter.search {
        let pattern: String = format!("%{search}%");
        query = query.filter(
            observations::title
                .like(pattern.clone())
                .or(observations::description.like(pattern.clone())),
        );
        count_query = count_query.filter(
            observations::title
                .like(pattern.clone())
                .or(observations::description.like(pattern)),
        );
    }

    let total: i64 = count_query.count().get_result(conn)?;

    query = match (page.sort_by.as_deref(), page.sort_descending) {
        (Some("title"), false) => query.order(observations::title.asc()),
        (Some("title"), true) => query.order(observations::title.desc()),
        (Some("priority"), false) => query.order(observations::priority.asc()),
        (Some("priority"), true) => query.order(observations::priority.desc()),
        (Some("status"), false) => query.order(observations::status.asc()),
        (Some("status"), true) => query.order(observations::status.desc()),
        (Some("due_date"), false) => query.order(observations::due_date.asc()),
        (Some("due_date"), true) => query.order(observations::due_date.desc()),
        (Some("updated_at"), false) => query.order(observations::updated_at.asc()),
        (Some("updated_at"), true) => query.order(observations::updated_at.desc()),
        (_, false) => query.order(observations::created_at.asc()),
        (_, true) => query.order(observations::created_at.desc()),
    };
    query = query.then_order_by(observations::observation_id.desc());

    let rows: Vec<ObservationRow> = query.limit(page.limit).offset(page.offset).load(conn)?;

    let mut results: Vec<Observation> = Vec::with_capacity(rows.len());
    for row in rows {
        results.push(Observation::try_from(row)?);
    }

    Ok((results, total))
}
}

backend_fn! {
/// Counts observations per status within the filter's scope.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_observations_by_status(
    conn: &mut _,
    filter: &ObservationFilter,
) -> Result<Vec<(String, i64)>, PersistenceError> {
    let mut query = observations::table
        .group_by(observations::status)
        .select((observations::status, diesel::dsl::count_star()))
        .into_boxed();

    if let Some(plant_id) = filter.plant_id {
        query = query.filter(observations::plant_id.eq(plant_id));
    }
    if let Some(department_id) = filter.department_id {
        query = query.filter(observations::department_id.eq(department_id));
    }
    if let Some(date_from) = &filter.date_from {
        query = query.filter(observations::created_at.ge(date_from.clone()));
    }
    if let Some(date_to) = &filter.date_to {
        query = query.filter(observations::created_at.lt(date_to.clone()));
    }

    Ok(query.load::<(String, i64)>(conn)?)
}
}

backend_fn! {
/// Counts observations per hazard category within the filter's scope,
/// ordered by category name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_observations_by_hazard_category(
    conn: &mut _,
    filter: &ObservationFilter,
) -> Result<Vec<(String, i64)>, PersistenceError> {
    let mut query = observations::table
        .group_by(observations::hazard_category)
        .select((observations::hazard_category, diesel::dsl::count_star()))
        .into_boxed();

    if let Some(plant_id) = filter.plant_id {
        query = query.filter(observations::plant_id.eq(plant_id));
    }
    if let Some(department_id) = filter.department_id {
        query = query.filter(observations::department_id.eq(department_id));
    }
    if let Some(date_from) = &filter.date_from {
        query = query.filter(observations::created_at.ge(date_from.clone()));
    }
    if let Some(date_to) = &filter.date_to {
        query = query.filter(observations::created_at.lt(date_to.clone()));
    }

    Ok(query.order(observations::hazard_category.asc()).load::<(String, i64)>(conn)?)
}
}

backend_fn! {
/// Counts overdue observations within the filter's scope.
///
/// An observation is overdue when its due date has passed and it is not
/// closed. Due dates and `today` are ISO-8601 dates, so text comparison
/// orders correctly.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_overdue_observations(
    conn: &mut _,
    filter: &ObservationFilter,
    today: &str,
) -> Result<i64, PersistenceError> {
    let mut query = observations::table
        .filter(observations::due_date.is_not_null())
        .filter(observations::due_date.lt(today.to_string()))
        .filter(observations::status.ne("closed"))
        .into_boxed();

    if let Some(plant_id) = filter.plant_id {
        query = query.filter(observations::plant_id.eq(plant_id));
    }
    if let Some(department_id) = filter.department_id {
        query = query.filter(observations::department_id.eq(department_id));
    }
    if let Some(date_from) = &filter.date_from {
        query = query.filter(observations::created_at.ge(date_from.clone()));
    }
    if let Some(date_to) = &filter.date_to {
        query = query.filter(observations::created_at.lt(date_to.clone()));
    }

    Ok(query.count().get_result(conn)?)
}
}
