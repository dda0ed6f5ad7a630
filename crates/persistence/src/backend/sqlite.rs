// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! SQLite backend plumbing.
//!
//! SQLite is the default backend: tests run against unique shared
//! in-memory databases, deployments against a WAL-mode file. SQLite
//! ships with foreign key enforcement off, so every connection turns it
//! on explicitly and the adapter verifies it took effect before the
//! connection is used.
//!
//! The raw SQL in this module is confined to what Diesel has no DSL
//! for: PRAGMA statements and `last_insert_rowid()`.

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer, Text};
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use crate::error::PersistenceError;

/// The SQLite migration set, embedded at compile time.
///
/// `migrations_mysql/` must stay schema-equivalent to this set;
/// `cargo xtask verify-migrations` checks the parity structurally.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(QueryableByName)]
struct ForeignKeysRow {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

#[derive(QueryableByName)]
struct JournalModeRow {
    #[diesel(sql_type = Text)]
    journal_mode: String,
}

/// Opens a SQLite database, enables foreign keys, and brings the schema
/// up to date.
///
/// `database_url` may be a file path or a `file:...?mode=memory` URL.
///
/// # Errors
///
/// Returns an error if the connection cannot be established, the
/// foreign-key pragma fails, or a migration fails to apply.
pub fn initialize_database(database_url: &str) -> Result<SqliteConnection, PersistenceError> {
    info!("Initializing SQLite database at: {}", database_url);

    let mut conn: SqliteConnection = SqliteConnection::establish(database_url)
        .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))?;

    // Off by default in SQLite; must be set per connection
    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut conn)
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;

    info!("Running SQLite database migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;

    Ok(conn)
}

/// Switches a file-based database to WAL journaling for better read
/// concurrency, verifying the mode actually changed.
///
/// In-memory databases cannot enter WAL mode; callers only invoke this
/// for file paths.
///
/// # Errors
///
/// Returns an error if the pragma fails or reports a mode other than
/// WAL.
pub fn enable_wal_mode(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    // This PRAGMA reports the resulting mode as a row
    let mode: String = diesel::sql_query("PRAGMA journal_mode = WAL")
        .get_result::<JournalModeRow>(conn)
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?
        .journal_mode;

    if !mode.eq_ignore_ascii_case("wal") {
        return Err(PersistenceError::InitializationError(format!(
            "journal_mode is '{mode}', expected 'wal'"
        )));
    }
    Ok(())
}

/// Reads back whether the connection enforces foreign keys.
///
/// # Errors
///
/// Returns `ForeignKeyEnforcementNotEnabled` if the pragma reports
/// enforcement off.
pub fn verify_foreign_key_enforcement(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    let enabled: i32 = diesel::sql_query("PRAGMA foreign_keys")
        .get_result::<ForeignKeysRow>(conn)?
        .foreign_keys;

    if enabled == 0 {
        return Err(PersistenceError::ForeignKeyEnforcementNotEnabled);
    }

    info!("SQLite foreign key enforcement is enabled");
    Ok(())
}

/// Returns the rowid of the most recent insert on this connection.
///
/// # Errors
///
/// Returns an error if the lookup query fails.
pub fn last_insert_id(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("last_insert_rowid()")).get_result(conn)?)
}
