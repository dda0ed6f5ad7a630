// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! MySQL/MariaDB backend plumbing.
//!
//! This backend exists for deployments that already run MariaDB; it is
//! exercised only by the opt-in validation tests that
//! `cargo xtask test-mariadb` orchestrates (Docker container up, run
//! the `#[ignore]` tests with `DATABASE_URL` and
//! `SITESAFE_TEST_BACKEND=mysql`, container down). Nothing in the
//! standard test run touches it.
//!
//! The migrations in `migrations_mysql/` express the same schema as the
//! SQLite set in MySQL syntax (`AUTO_INCREMENT`, engine defaults).
//! Any schema change lands in both directories, and
//! `cargo xtask verify-migrations` fails the build when the two sets
//! diverge structurally.

use diesel::dsl::sql;
use diesel::sql_types::{BigInt, Integer};
use diesel::{Connection, MysqlConnection, QueryableByName, RunQueryDsl};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use crate::error::PersistenceError;

/// The MySQL migration set, embedded at compile time.
pub const MYSQL_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations_mysql");

#[derive(QueryableByName)]
struct FkChecksRow {
    #[diesel(sql_type = Integer)]
    fk_checks: i32,
}

/// Connects to a MySQL/MariaDB database and brings the schema up to
/// date.
///
/// # Errors
///
/// Returns an error if the connection cannot be established or a
/// migration fails to apply.
pub fn initialize_database(database_url: &str) -> Result<MysqlConnection, PersistenceError> {
    info!("Initializing MySQL database at: {}", database_url);

    let mut conn: MysqlConnection = MysqlConnection::establish(database_url)
        .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))?;

    info!("Running MySQL database migrations");
    conn.run_pending_migrations(MYSQL_MIGRATIONS)
        .map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;

    Ok(conn)
}

/// Reads back whether the session enforces foreign keys.
///
/// InnoDB enforces them by default; this guards against a session
/// started with `foreign_key_checks` disabled.
///
/// # Errors
///
/// Returns `ForeignKeyEnforcementNotEnabled` if checks are off, or a
/// query error if the variable cannot be read.
pub fn verify_foreign_key_enforcement(conn: &mut MysqlConnection) -> Result<(), PersistenceError> {
    let result: Result<FkChecksRow, _> =
        diesel::sql_query("SELECT @@foreign_key_checks AS fk_checks").get_result(conn);

    match result {
        Ok(row) if row.fk_checks == 1 => {
            info!("MySQL foreign key enforcement is enabled");
            Ok(())
        }
        Ok(_) => Err(PersistenceError::ForeignKeyEnforcementNotEnabled),
        Err(e) => Err(PersistenceError::QueryFailed(format!(
            "Failed to verify foreign key enforcement: {e}"
        ))),
    }
}

/// Returns the auto-increment id of the most recent insert on this
/// connection.
///
/// # Errors
///
/// Returns an error if the lookup query fails.
pub fn last_insert_id(conn: &mut MysqlConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("LAST_INSERT_ID()")).get_result(conn)?)
}
