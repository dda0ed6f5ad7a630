// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-specific connection plumbing.
//!
//! Everything that cannot be said in backend-agnostic Diesel DSL lives
//! here: connection establishment, embedded-migration execution, PRAGMA
//! and system-variable checks, and the last-insert-id lookup. Entity
//! queries and mutations live in `queries/` and `mutations/` and must
//! compile unchanged against both backends.
//!
//! Two backends are supported:
//!
//! - `sqlite` — the default; in-memory for tests, WAL-mode file for
//!   deployments
//! - `mysql` — MySQL/MariaDB, validated through the opt-in
//!   `cargo xtask test-mariadb` suite

pub mod mysql;
pub mod sqlite;

use diesel::{Connection, MysqlConnection, SqliteConnection};

use crate::error::PersistenceError;

/// The small set of operations with no cross-backend Diesel DSL.
///
/// Mutation bodies generated by `backend_fn!` call these through the
/// trait so a single body serves both connection types.
pub trait PersistenceBackend: Connection {
    /// Returns the auto-increment id of the most recent insert on this
    /// connection.
    ///
    /// Inserts must hand the new row id back to the service layer, and
    /// `RETURNING` support differs between the backends, so the id is
    /// read back through each backend's native mechanism instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup query fails.
    fn last_insert_id(&mut self) -> Result<i64, PersistenceError>;

    /// Confirms the connection enforces foreign keys.
    ///
    /// Every lifecycle entity references plants, departments, and user
    /// accounts by id; a connection that does not enforce those
    /// references must be rejected at startup, not discovered later.
    ///
    /// # Errors
    ///
    /// Returns an error if enforcement is off or cannot be determined.
    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError>;
}

impl PersistenceBackend for SqliteConnection {
    fn last_insert_id(&mut self) -> Result<i64, PersistenceError> {
        sqlite::last_insert_id(self)
    }

    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        sqlite::verify_foreign_key_enforcement(self)
    }
}

impl PersistenceBackend for MysqlConnection {
    fn last_insert_id(&mut self) -> Result<i64, PersistenceError> {
        mysql::last_insert_id(self)
    }

    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        mysql::verify_foreign_key_enforcement(self)
    }
}
