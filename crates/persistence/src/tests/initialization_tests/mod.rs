// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend initialization tests.
//!
//! Connection establishment, migration application, and foreign key
//! enforcement are also exercised implicitly by every persistence test
//! that calls `SqlitePersistence::new_in_memory()`; the tests here pin
//! the explicit guarantees.

use crate::SqlitePersistence;
use crate::tests::TEST_TIMESTAMP;

#[test]
fn test_persistence_initialization() {
    let result: Result<SqlitePersistence, crate::PersistenceError> =
        SqlitePersistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    // Each in-memory instance should be isolated
    let mut db1 = SqlitePersistence::new_in_memory().unwrap();
    let mut db2 = SqlitePersistence::new_in_memory().unwrap();

    // Create a plant in db1
    db1.insert_plant("Frankfurt Works", "FRK1", TEST_TIMESTAMP)
        .unwrap();

    // db2 should not see it
    let count1 = db1.list_plants().unwrap().len();
    let count2 = db2.list_plants().unwrap().len();

    assert_eq!(count1, 1, "db1 should have 1 plant");
    assert_eq!(count2, 0, "db2 should have 0 plants (isolated)");
}

#[test]
fn test_migrations_applied_on_initialization() {
    // If migrations didn't run, the schema wouldn't exist and this would fail
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();

    // Verify tables exist by querying them
    let result = persistence.list_plants();

    assert!(
        result.is_ok(),
        "Migrations must have applied for plants table to exist"
    );
}

#[test]
fn test_foreign_key_enforcement_is_active() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();

    // The constructor already ran this check; it must also hold afterwards
    persistence.verify_foreign_key_enforcement().unwrap();
}
