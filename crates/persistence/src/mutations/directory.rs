// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reference directory mutations: plants, departments, and user accounts.
//!
//! Deleting a referenced plant, department, or user surfaces as a
//! foreign key violation from the backend; the service layer translates
//! that into a domain rule error rather than checking up front.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::diesel_schema::{departments, plants, user_accounts};
use crate::error::PersistenceError;

backend_fn! {
/// Creates a new plant.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `name` - The display name
/// * `code` - The unique site code
/// * `created_at` - The creation timestamp, also used as `updated_at`
///
/// # Errors
///
/// Returns an error if the plant cannot be created or if the code is
/// already taken.
pub fn insert_plant(
    conn: &mut _,
    name: &str,
    code: &str,
    created_at: &str,
) -> Result<i64, PersistenceError> {
    info!("Creating plant with code: {}", code);

    diesel::insert_into(plants::table)
        .values((
            plants::name.eq(name),
            plants::code.eq(code),
            plants::created_at.eq(created_at),
            plants::updated_at.eq(created_at),
        ))
        .execute(conn)?;

    let plant_id: i64 = conn.last_insert_id()?;

    info!(plant_id, "Plant created successfully");
    Ok(plant_id)
}
}

backend_fn! {
/// Updates a plant's name and code.
///
/// Returns the number of rows affected (zero when the plant does not
/// exist).
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_plant(
    conn: &mut _,
    plant_id: i64,
    name: &str,
    code: &str,
    updated_at: &str,
) -> Result<usize, PersistenceError> {
    debug!("Updating plant ID: {}", plant_id);

    let rows_affected: usize = diesel::update(plants::table)
        .filter(plants::plant_id.eq(plant_id))
        .set((
            plants::name.eq(name),
            plants::code.eq(code),
            plants::updated_at.eq(updated_at),
        ))
        .execute(conn)?;

    Ok(rows_affected)
}
}

backend_fn! {
/// Deletes a plant.
///
/// Returns the number of rows affected (zero when the plant does not
/// exist).
///
/// # Errors
///
/// Returns an error if the database delete fails, including when the
/// plant is still referenced by lifecycle entities.
pub fn delete_plant(conn: &mut _, plant_id: i64) -> Result<usize, PersistenceError> {
    info!("Deleting plant ID: {}", plant_id);

    let rows_affected: usize = diesel::delete(plants::table)
        .filter(plants::plant_id.eq(plant_id))
        .execute(conn)?;

    Ok(rows_affected)
}
}

backend_fn! {
/// Creates a new department.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `name` - The display name
/// * `code` - The unique department code
/// * `created_at` - The creation timestamp, also used as `updated_at`
///
/// # Errors
///
/// Returns an error if the department cannot be created or if the code
/// is already taken.
pub fn insert_department(
    conn: &mut _,
    name: &str,
    code: &str,
    created_at: &str,
) -> Result<i64, PersistenceError> {
    info!("Creating department with code: {}", code);

    diesel::insert_into(departments::table)
        .values((
            departments::name.eq(name),
            departments::code.eq(code),
            departments::created_at.eq(created_at),
            departments::updated_at.eq(created_at),
        ))
        .execute(conn)?;

    let department_id: i64 = conn.last_insert_id()?;

    info!(department_id, "Department created successfully");
    Ok(department_id)
}
}

backend_fn! {
/// Updates a department's name and code.
///
/// Returns the number of rows affected (zero when the department does
/// not exist).
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_department(
    conn: &mut _,
    department_id: i64,
    name: &str,
    code: &str,
    updated_at: &str,
) -> Result<usize, PersistenceError> {
    debug!("Updating department ID: {}", department_id);

    let rows_affected: usize = diesel::update(departments::table)
        .filter(departments::department_id.eq(department_id))
        .set((
            departments::name.eq(name),
            departments::code.eq(code),
            departments::updated_at.eq(updated_at),
        ))
        .execute(conn)?;

    Ok(rows_affected)
}
}

backend_fn! {
/// Deletes a department.
///
/// Returns the number of rows affected (zero when the department does
/// not exist).
///
/// # Errors
///
/// Returns an error if the database delete fails, including when the
/// department is still referenced by lifecycle entities.
pub fn delete_department(conn: &mut _, department_id: i64) -> Result<usize, PersistenceError> {
    info!("Deleting department ID: {}", department_id);

    let rows_affected: usize = diesel::delete(departments::table)
        .filter(departments::department_id.eq(department_id))
        .execute(conn)?;

    Ok(rows_affected)
}
}

backend_fn! {
/// Creates a new user account.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `full_name` - The person's display name
/// * `email` - The unique email address
/// * `job_title` - Optional job title
/// * `created_at` - The creation timestamp, also used as `updated_at`
///
/// # Errors
///
/// Returns an error if the account cannot be created or if the email is
/// already taken.
pub fn insert_user_account(
    conn: &mut _,
    full_name: &str,
    email: &str,
    job_title: Option<String>,
    created_at: &str,
) -> Result<i64, PersistenceError> {
    info!("Creating user account for email: {}", email);

    diesel::insert_into(user_accounts::table)
        .values((
            user_accounts::full_name.eq(full_name),
            user_accounts::email.eq(email),
            user_accounts::job_title.eq(job_title),
            user_accounts::created_at.eq(created_at),
            user_accounts::updated_at.eq(created_at),
        ))
        .execute(conn)?;

    let user_id: i64 = conn.last_insert_id()?;

    info!(user_id, "User account created successfully");
    Ok(user_id)
}
}

backend_fn! {
/// Updates a user account's profile fields.
///
/// Returns the number of rows affected (zero when the account does not
/// exist).
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_user_account(
    conn: &mut _,
    user_id: i64,
    full_name: &str,
    email: &str,
    job_title: Option<String>,
    updated_at: &str,
) -> Result<usize, PersistenceError> {
    debug!("Updating user account ID: {}", user_id);

    let rows_affected: usize = diesel::update(user_accounts::table)
        .filter(user_accounts::user_id.eq(user_id))
        .set((
            user_accounts::full_name.eq(full_name),
            user_accounts::email.eq(email),
            user_accounts::job_title.eq(job_title),
            user_accounts::updated_at.eq(updated_at),
        ))
        .execute(conn)?;

    Ok(rows_affected)
}
}

backend_fn! {
/// Deletes a user account.
///
/// Returns the number of rows affected (zero when the account does not
/// exist).
///
/// # Errors
///
/// Returns an error if the database delete fails, including when the
/// account is still referenced by lifecycle entities or permit rosters.
pub fn delete_user_account(conn: &mut _, user_id: i64) -> Result<usize, PersistenceError> {
    info!("Deleting user account ID: {}", user_id);

    let rows_affected: usize = diesel::delete(user_accounts::table)
        .filter(user_accounts::user_id.eq(user_id))
        .execute(conn)?;

    Ok(rows_affected)
}
}
