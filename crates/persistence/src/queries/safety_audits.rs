// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Safety audit query operations.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::debug;

use sitesafe_domain::SafetyAudit;

use crate::data_models::{PageSpec, SafetyAuditFilter, SafetyAuditRow};
use crate::diesel_schema::safety_audits;
use crate::error::PersistenceError;

backend_fn! {
/// Retrieves a safety audit by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the audit is not found.
pub fn get_safety_audit(
    conn: &mut _,
    audit_id: i64,
) -> Result<Option<SafetyAudit>, PersistenceError> {
    debug!("Looking up safety audit by ID: {}", audit_id);

    let result: Result<SafetyAuditRow, diesel::result::Error> = safety_audits::table
        .filter(safety_audits::audit_id.eq(audit_id))
        .select(SafetyAuditRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(SafetyAudit::try_from(row)?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Lists safety audits matching the filter, returning one page of rows
/// plus the total match count.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_safety_audits(
    conn: &mut _,
    filter: &SafetyAuditFilter,
    page: &PageSpec,
) -> Result<(Vec<SafetyAudit>, i64), PersistenceError> {
    let mut query = safety_audits::table
        .select(SafetyAuditRow::as_select())
        .into_boxed();
    let mut count_query = safety_audits::table.into_boxed();

    if let Some(plant_id) = filter.plant_id {
        query = query.filter(safety_audits::plant_id.eq(plant_id));
        count_query = count_query.filter(safety_audits::plant_id.eq(plant_id));
    }
    if let Some(department_id) = filter.department_id {
        query = query.filter(safety_audits::department_id.eq(department_id));
        count_query = count_query.filter(safety_audits::department_id.eq(department_id));
    }
    if !filter.statuses.is_empty() {
        query = query.filter(safety_audits::status.eq_any(filter.statuses.clone()));
        count_query = count_query.filter(safety_audits::status.eq_any(filter.statuses.clone()));
    }
    if let Some(date_from) = &filter.date_from {
        query = query.filter(safety_audits::created_at.ge(date_from.clone()));
        count_query = count_query.filter(safety_audits::created_at.ge(date_from.clone()));
    }
    if let Some(date_to) = &filter.date_to {
        query = query.filter(safety_audits::created_at.lt(date_to.clone()));
        count_query = count_query.filter(safety_audits::created_at.lt(date_to.clone()));
    }
    if let Some(search) = &filter.search {
        let pattern: String = format!("%{search}%");
        query = query.filter(
            safety_audits::title
                .like(pattern.clone())
                .or(safety_audits::description.like(pattern.clone())),
        );
        count_query = count_query.filter(
            safety_audits::title
                .like(pattern.clone())
                .or(safety_audits::description.like(pattern)),
        );
    }

    let total: i64 = count_query.count().get_result(conn)?;

    query = match (page.sort_by.as_deref(), page.sort_descending) {
        (Some("title"), false) => query.order(safety_audits::title.asc()),
        (Some("title"), true) => query.order(safety_audits::title.desc()),
        (Some("status"), false) => query.order(safety_audits::status.asc()),
        (Some("status"), true) => query.order(safety_audits::status.desc()),
        (Some("scheduled_date"), false) => query.order(safety_audits::scheduled_date.asc()),
        (Some("scheduled_date"), true) => query.order(safety_audits::scheduled_date.desc()),
        (Some("score"), false) => query.order(safety_audits::score.asc()),
        (Some("score"), true) => query.order(safety_audits::score.desc()),
        (Some("updated_at"), false) => query.order(safety_audits::updated_at.asc()),
        (Some("updated_at"), true) => query.order(safety_audits::updated_at.desc()),
        (_, false) => query.order(safety_audits::created_at.asc()),
        (_, true) => query.order(safety_audits::created_at.desc()),
    };
    query = query.then_order_by(safety_audits::audit_id.desc());

    let rows: Vec<SafetyAuditRow> = query.limit(page.limit).offset(page.offset).load(conn)?;

    let mut results: Vec<SafetyAudit> = Vec::with_capacity(rows.len());
    for row in rows {
        results.push(SafetyAudit::try_from(row)?);
    }

    Ok((results, total))
}
}

backend_fn! {
/// Counts safety audits per status within the filter's scope.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_safety_audits_by_status(
    conn: &mut _,
    filter: &SafetyAuditFilter,
) -> Result<Vec<(String, i64)>, PersistenceError> {
    let mut query = safety_audits::table
        .group_by(safety_audits::status)
        .select((safety_audits::status, diesel::dsl::count_star()))
        .into_boxed();

    if let Some(plant_id) = filter.plant_id {
        query = query.filter(safety_audits::plant_id.eq(plant_id));
    }
    if let Some(department_id) = filter.department_id {
        query = query.filter(safety_audits::department_id.eq(department_id));
    }
    if let Some(date_from) = &filter.date_from {
        query = query.filter(safety_audits::created_at.ge(date_from.clone()));
    }
    if let Some(date_to) = &filter.date_to {
        query = query.filter(safety_audits::created_at.lt(date_to.clone()));
    }

    Ok(query.load::<(String, i64)>(conn)?)
}
}

backend_fn! {
/// Counts overdue safety audits within the filter's scope.
///
/// An audit is overdue when its scheduled date has passed and fieldwork
/// has not finished (status still `planned` or `in_progress`).
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_overdue_safety_audits(
    conn: &mut _,
    filter: &SafetyAuditFilter,
    today: &str,
) -> Result<i64, PersistenceError> {
    let mut query = safety_audits::table
        .filter(safety_audits::scheduled_date.lt(today.to_string()))
        .filter(safety_audits::status.eq_any(vec![
            "planned".to_string(),
            "in_progress".to_string(),
        ]))
        .into_boxed();

    if let Some(plant_id) = filter.plant_id {
        query = query.filter(safety_audits::plant_id.eq(plant_id));
    }
    if let Some(department_id) = filter.department_id {
        query = query.filter(safety_audits::department_id.eq(department_id));
    }
    if let Some(date_from) = &filter.date_from {
        query = query.filter(safety_audits::created_at.ge(date_from.clone()));
    }
    if let Some(date_to) = &filter.date_to {
        query = query.filter(safety_audits::created_at.lt(date_to.clone()));
    }

    Ok(query.count().get_result(conn)?)
}
}

backend_fn! {
/// Loads the recorded scores of safety audits within the filter's scope.
///
/// Only audits that have a score contribute; the mean is computed by the
/// statistics assembly, not in SQL, so both backends behave identically.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn safety_audit_scores(
    conn: &mut _,
    filter: &SafetyAuditFilter,
) -> Result<Vec<i32>, PersistenceError> {
    let mut query = safety_audits::table
        .filter(safety_audits::score.is_not_null())
        .select(safety_audits::score)
        .into_boxed();

    if let Some(plant_id) = filter.plant_id {
        query = query.filter(safety_audits::plant_id.eq(plant_id));
    }
    if let Some(department_id) = filter.department_id {
        query = query.filter(safety_audits::department_id.eq(department_id));
    }
    if let Some(date_from) = &filter.date_from {
        query = query.filter(safety_audits::created_at.ge(date_from.clone()));
    }
    if let Some(date_to) = &filter.date_to {
        query = query.filter(safety_audits::created_at.lt(date_to.clone()));
    }

    let scores: Vec<Option<i32>> = query.load(conn)?;
    Ok(scores.into_iter().flatten().collect())
}
}
