// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reference directory queries: plants, departments, and user accounts.
//!
//! Plants and departments are small enough to list in full; user
//! accounts are paged and searchable. The `*_exists` helpers back
//! referential and uniqueness validation in the service layer.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::debug;

use sitesafe_domain::{Department, Plant, UserAccount};

use crate::data_models::{PageSpec, UserFilter};
use crate::diesel_schema::{departments, plants, user_accounts};
use crate::error::PersistenceError;

backend_fn! {
/// Retrieves a plant by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the plant is not found.
pub fn get_plant(conn: &mut _, plant_id: i64) -> Result<Option<Plant>, PersistenceError> {
    let result: Result<(i64, String, String, String, String), diesel::result::Error> =
        plants::table
            .filter(plants::plant_id.eq(plant_id))
            .select((
                plants::plant_id,
                plants::name,
                plants::code,
                plants::created_at,
                plants::updated_at,
            ))
            .first(conn);

    match result {
        Ok((id, name, code, created_at, updated_at)) => Ok(Some(Plant {
            plant_id: Some(id),
            name,
            code,
            created_at,
            updated_at,
        })),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Lists all plants ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_plants(conn: &mut _) -> Result<Vec<Plant>, PersistenceError> {
    debug!("Listing all plants");

    let rows: Vec<(i64, String, String, String, String)> = plants::table
        .order(plants::name.asc())
        .select((
            plants::plant_id,
            plants::name,
            plants::code,
            plants::created_at,
            plants::updated_at,
        ))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(id, name, code, created_at, updated_at)| Plant {
            plant_id: Some(id),
            name,
            code,
            created_at,
            updated_at,
        })
        .collect())
}
}

backend_fn! {
/// Checks if a plant with the given ID exists.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn plant_exists(conn: &mut _, plant_id: i64) -> Result<bool, PersistenceError> {
    let count: i64 = plants::table
        .filter(plants::plant_id.eq(plant_id))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}
}

backend_fn! {
/// Checks if a plant code is already taken.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `code` - The plant code to check
/// * `exclude_id` - Optional plant ID to exclude from the check
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn plant_code_exists(
    conn: &mut _,
    code: &str,
    exclude_id: Option<i64>,
) -> Result<bool, PersistenceError> {
    let mut query = plants::table.filter(plants::code.eq(code)).into_boxed();

    if let Some(id) = exclude_id {
        query = query.filter(plants::plant_id.ne(id));
    }

    let count = query.count().get_result::<i64>(conn)?;
    Ok(count > 0)
}
}

backend_fn! {
/// Retrieves a department by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the department is not found.
pub fn get_department(
    conn: &mut _,
    department_id: i64,
) -> Result<Option<Department>, PersistenceError> {
    let result: Result<(i64, String, String, String, String), diesel::result::Error> =
        departments::table
            .filter(departments::department_id.eq(department_id))
            .select((
                departments::department_id,
                departments::name,
                departments::code,
                departments::created_at,
                departments::updated_at,
            ))
            .first(conn);

    match result {
        Ok((id, name, code, created_at, updated_at)) => Ok(Some(Department {
            department_id: Some(id),
            name,
            code,
            created_at,
            updated_at,
        })),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Lists all departments ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_departments(conn: &mut _) -> Result<Vec<Department>, PersistenceError> {
    debug!("Listing all departments");

    let rows: Vec<(i64, String, String, String, String)> = departments::table
        .order(departments::name.asc())
        .select((
            departments::department_id,
            departments::name,
            departments::code,
            departments::created_at,
            departments::updated_at,
        ))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(id, name, code, created_at, updated_at)| Department {
            department_id: Some(id),
            name,
            code,
            created_at,
            updated_at,
        })
        .collect())
}
}

backend_fn! {
/// Checks if a department with the given ID exists.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn department_exists(conn: &mut _, department_id: i64) -> Result<bool, PersistenceError> {
    let count: i64 = departments::table
        .filter(departments::department_id.eq(department_id))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}
}

backend_fn! {
/// Checks if a department code is already taken.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `code` - The department code to check
/// * `exclude_id` - Optional department ID to exclude from the check
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn department_code_exists(
    conn: &mut _,
    code: &str,
    exclude_id: Option<i64>,
) -> Result<bool, PersistenceError> {
    let mut query = departments::table
        .filter(departments::code.eq(code))
        .into_boxed();

    if let Some(id) = exclude_id {
        query = query.filter(departments::department_id.ne(id));
    }

    let count = query.count().get_result::<i64>(conn)?;
    Ok(count > 0)
}
}

backend_fn! {
/// Retrieves a user account by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the account is not found.
pub fn get_user_account(
    conn: &mut _,
    user_id: i64,
) -> Result<Option<UserAccount>, PersistenceError> {
    let result: Result<(i64, String, String, Option<String>, String, String), diesel::result::Error> =
        user_accounts::table
            .filter(user_accounts::user_id.eq(user_id))
            .select((
                user_accounts::user_id,
                user_accounts::full_name,
                user_accounts::email,
                user_accounts::job_title,
                user_accounts::created_at,
                user_accounts::updated_at,
            ))
            .first(conn);

    match result {
        Ok((id, full_name, email, job_title, created_at, updated_at)) => Ok(Some(UserAccount {
            user_id: Some(id),
            full_name,
            email,
            job_title,
            created_at,
            updated_at,
        })),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}
}

backend_fn! {
/// Lists user accounts matching the filter, returning one page of rows
/// plus the total match count. Search matches name and email.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_user_accounts(
    conn: &mut _,
    filter: &UserFilter,
    page: &PageSpec,
) -> Result<(Vec<UserAccount>, i64), PersistenceError> {
    let mut query = user_accounts::table
        .select((
            user_accounts::user_id,
            user_accounts::full_name,
            user_accounts::email,
            user_accounts::job_title,
            user_accounts::created_at,
            user_accounts::updated_at,
        ))
        .into_boxed();
    let mut count_query = user_accounts::table.into_boxed();

    if let Some(search) = &filter.search {
        let pattern: String = format!("%{search}%");
        query = query.filter(
            user_accounts::full_name
                .like(pattern.clone())
                .or(user_accounts::email.like(pattern.clone())),
        );
        count_query = count_query.filter(
            user_accounts::full_name
                .like(pattern.clone())
                .or(user_accounts::email.like(pattern)),
        );
    }

    let total: i64 = count_query.count().get_result(conn)?;

    query = match (page.sort_by.as_deref(), page.sort_descending) {
        (Some("full_name"), false) => query.order(user_accounts::full_name.asc()),
        (Some("full_name"), true) => query.order(user_accounts::full_name.desc()),
        (Some("email"), false) => query.order(user_accounts::email.asc()),
        (Some("email"), true) => query.order(user_accounts::email.desc()),
        (Some("updated_at"), false) => query.order(user_accounts::updated_at.asc()),
        (Some("updated_at"), true) => query.order(user_accounts::updated_at.desc()),
        (_, false) => query.order(user_accounts::created_at.asc()),
        (_, true) => query.order(user_accounts::created_at.desc()),
    };
    query = query.then_order_by(user_accounts::user_id.desc());

    let rows: Vec<(i64, String, String, Option<String>, String, String)> =
        query.limit(page.limit).offset(page.offset).load(conn)?;

    let results: Vec<UserAccount> = rows
        .into_iter()
        .map(
            |(id, full_name, email, job_title, created_at, updated_at)| UserAccount {
                user_id: Some(id),
                full_name,
                email,
                job_title,
                created_at,
                updated_at,
            },
        )
        .collect();

    Ok((results, total))
}
}

backend_fn! {
/// Lists every user account's ID and display name.
///
/// Unpaged: this feeds the read-side name index, which must resolve
/// arbitrary referent IDs.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn user_names(conn: &mut _) -> Result<Vec<(i64, String)>, PersistenceError> {
    Ok(user_accounts::table
        .select((user_accounts::user_id, user_accounts::full_name))
        .load(conn)?)
}
}

backend_fn! {
/// Checks if a user account with the given ID exists.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn user_exists(conn: &mut _, user_id: i64) -> Result<bool, PersistenceError> {
    let count: i64 = user_accounts::table
        .filter(user_accounts::user_id.eq(user_id))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}
}

backend_fn! {
/// Returns which of the given user IDs exist, ordered ascending.
/// Callers diff the result against their input to report missing
/// references.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn existing_user_ids(conn: &mut _, user_ids: &[i64]) -> Result<Vec<i64>, PersistenceError> {
    Ok(user_accounts::table
        .filter(user_accounts::user_id.eq_any(user_ids.to_vec()))
        .order(user_accounts::user_id.asc())
        .select(user_accounts::user_id)
        .load(conn)?)
}
}

backend_fn! {
/// Checks if an email address is already taken.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `email` - The email address to check
/// * `exclude_id` - Optional user ID to exclude from the check
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn email_exists(
    conn: &mut _,
    email: &str,
    exclude_id: Option<i64>,
) -> Result<bool, PersistenceError> {
    let mut query = user_accounts::table
        .filter(user_accounts::email.eq(email))
        .into_boxed();

    if let Some(id) = exclude_id {
        query = query.filter(user_accounts::user_id.ne(id));
    }

    let count = query.count().get_result::<i64>(conn)?;
    Ok(count > 0)
}
}
