// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Incident query operations.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::debug;

use sitesafe_domain::Incident;

use crate::data_models::{IncidentFilter, IncidentRow, PageSpec};
use crate::diesel_schema::incidents;
use crate::error::PersistenceError;

backend_fn! {
/// Retrieves an incident by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the incident is not found.
pub fn get_incident(
    conn: &mut _,
    incident_id: i64,
) -> Result<Option<Incident>, PersistenceError> {
    debug!("Looking up incident by ID: {}", incident_id);

    let result: Result<IncidentRow, diesel::result::Error> = incidents::table
        .filter(incidents::incident_id.eq(incident_id))
        .select(IncidentRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(Incident::try_from(row)?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Lists incidents matching the filter, returning one page of rows plus
/// the total match count.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_incidents(
    conn: &mut _,
    filter: &IncidentFilter,
    page: &PageSpec,
) -> Result<(Vec<Incident>, i64), PersistenceError> {
    let mut query = incidents::table
        .select(IncidentRow::as_select())
        .into_boxed();
    let mut count_query = incidents::table.into_boxed();

    if let Some(plant_id) = filter.plant_id {
        query = query.filter(incidents::plant_id.eq(plant_id));
        count_query = count_query.filter(incidents::plant_id.eq(plant_id));
    }
    if let Some(department_id) = filter.department_id {
        query = query.filter(incidents::department_id.eq(department_id));
        count_query = count_query.filter(incidents::department_id.eq(department_id));
    }
    if !filter.statuses.is_empty() {
        query = query.filter(incidents::status.eq_any(filter.statuses.clone()));
        count_query = count_query.filter(incidents::status.eq_any(filter.statuses.clone()));
    }
    if !filter.kinds.is_empty() {
        query = query.filter(incidents::kind.eq_any(filter.kinds.clone()));
        count_query = count_query.filter(incidents::kind.eq_any(filter.kinds.clone()));
    }
    if !filter.severities.is_empty() {
        query = query.filter(incidents::severity.eq_any(filter.severities.clone()));
        count_query = count_query.filter(incidents::severity.eq_any(filter.severities.clone()));
    }
    if let Some(date_from) = &filter.date_from {
        query = query.filter(incidents::created_at.ge(date_from.clone()));
        count_query = count_query.filter(incidents::created_at.ge(date_from.clone()));
    }
    if let Some(date_to) = &filter.date_to {
        query = query.filter(incidents::created_at.lt(date_to.clone()));
        count_query = count_query.filter(incidents::created_at.lt(date_to.clone()));
    }
    if let Some(search) = &filter.search {
        let pattern: String = format!("%{search}%");
        query = query.filter(
            incidents::title
                .like(pattern.clone())
                .or(incidents::description.like(pattern.clone())),
        );
        count_query = count_query.filter(
            incidents::title
                .like(pattern.clone())
                .or(incidents::description.like(pattern)),
        );
    }

    let total: i64 = count_query.count().get_result(conn)?;

    query = match (page.sort_by.as_deref(), page.sort_descending) {
        (Some("title"), false) => query.order(incidents::title.asc()),
        (Some("title"), true) => query.order(incidents::title.desc()),
        (Some("severity"), false) => query.order(incidents::severity.asc()),
        (Some("severity"), true) => query.order(incidents::severity.desc()),
        (Some("status"), false) => query.order(incidents::status.asc()),
        (Some("status"), true) => query.order(incidents::status.desc()),
        (Some("occurred_at"), false) => query.order(incidents::occurred_at.asc()),
        (Some("occurred_at"), true) => query.order(incidents::occurred_at.desc()),
        (Some("updated_at"), false) => query.order(incidents::updated_at.asc()),
        (Some("updated_at"), true) => query.order(incidents::updated_at.desc()),
        (_, false) => query.order(incidents::created_at.asc()),
        (_, true) => query.order(incidents::created_at.desc()),
    };
    query = query.then_order_by(incidents::incident_id.desc());

    let rows: Vec<IncidentRow> = query.limit(page.limit).offset(page.offset).load(conn)?;

    let mut results: Vec<Incident> = Vec::with_capacity(rows.len());
    for row in rows {
        results.push(Incident::try_from(row)?);
    }

    Ok((results, total))
}
}

backend_fn! {
/// Counts incidents per status within the filter's scope.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_incidents_by_status(
    conn: &mut _,
    filter: &IncidentFilter,
) -> Result<Vec<(String, i64)>, PersistenceError> {
    let mut query = incidents::table
        .group_by(incidents::status)
        .select((incidents::status, diesel::dsl::count_star()))
        .into_boxed();

    if let Some(plant_id) = filter.plant_id {
        query = query.filter(incidents::plant_id.eq(plant_id));
    }
    if let Some(department_id) = filter.department_id {
        query = query.filter(incidents::department_id.eq(department_id));
    }
    if let Some(date_from) = &filter.date_from {
        query = query.filter(incidents::created_at.ge(date_from.clone()));
    }
    if let Some(date_to) = &filter.date_to {
        query = query.filter(incidents::created_at.lt(date_to.clone()));
    }

    Ok(query.load::<(String, i64)>(conn)?)
}
}

backend_fn! {
/// Counts incidents per severity within the filter's scope, ordered by
/// severity name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_incidents_by_severity(
    conn: &mut _,
    filter: &IncidentFilter,
) -> Result<Vec<(String, i64)>, PersistenceError> {
    let mut query = incidents::table
        .group_by(incidents::severity)
        .select((incidents::severity, diesel::dsl::count_star()))
        .into_boxed();

    if let Some(plant_id) = filter.plant_id {
        query = query.filter(incidents::plant_id.eq(plant_id));
    }
    if let Some(department_id) = filter.department_id {
        query = query.filter(incidents::department_id.eq(department_id));
    }
    if let Some(date_from) = &filter.date_from {
        query = query.filter(incidents::created_at.ge(date_from.clone()));
    }
    if let Some(date_to) = &filter.date_to {
        query = query.filter(incidents::created_at.lt(date_to.clone()));
    }

    Ok(query.order(incidents::severity.asc()).load::<(String, i64)>(conn)?)
}
}

backend_fn! {
/// Counts incidents per kind within the filter's scope, ordered by kind
/// name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_incidents_by_kind(
    conn: &mut _,
    filter: &IncidentFilter,
) -> Result<Vec<(String, i64)>, PersistenceError> {
    let mut query = incidents::table
        .group_by(incidents::kind)
        .select((incidents::kind, diesel::dsl::count_star()))
        .into_boxed();

    if let Some(plant_id) = filter.plant_id {
        query = query.filter(incidents::plant_id.eq(plant_id));
    }
    if let Some(department_id) = filter.department_id {
        query = query.filter(incidents::department_id.eq(department_id));
    }
    if let Some(date_from) = &filter.date_from {
        query = query.filter(incidents::created_at.ge(date_from.clone()));
    }
    if let Some(date_to) = &filter.date_to {
        query = query.filter(incidents::created_at.lt(date_to.clone()));
    }

    Ok(query.order(incidents::kind.asc()).load::<(String, i64)>(conn)?)
}
}
