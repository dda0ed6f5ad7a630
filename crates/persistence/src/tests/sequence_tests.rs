// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for sequence counter allocation.

use crate::tests::create_test_persistence;

#[test]
fn test_first_allocation_returns_one() {
    let mut db = create_test_persistence();

    let value = db.next_sequence_value("OBS", 2026).unwrap();
    assert_eq!(value, 1);
}

#[test]
fn test_allocations_are_sequential() {
    let mut db = create_test_persistence();

    assert_eq!(db.next_sequence_value("OBS", 2026).unwrap(), 1);
    assert_eq!(db.next_sequence_value("OBS", 2026).unwrap(), 2);
    assert_eq!(db.next_sequence_value("OBS", 2026).unwrap(), 3);
}

#[test]
fn test_counters_are_independent_per_prefix() {
    let mut db = create_test_persistence();

    assert_eq!(db.next_sequence_value("OBS", 2026).unwrap(), 1);
    assert_eq!(db.next_sequence_value("OBS", 2026).unwrap(), 2);

    // A different prefix starts from scratch
    assert_eq!(db.next_sequence_value("INC", 2026).unwrap(), 1);
    assert_eq!(db.next_sequence_value("PRM", 2026).unwrap(), 1);
}

#[test]
fn test_counters_are_independent_per_year() {
    let mut db = create_test_persistence();

    assert_eq!(db.next_sequence_value("AUD", 2026).unwrap(), 1);
    assert_eq!(db.next_sequence_value("AUD", 2026).unwrap(), 2);

    // The year rollover resets the counter without touching the old one
    assert_eq!(db.next_sequence_value("AUD", 2027).unwrap(), 1);
    assert_eq!(db.next_sequence_value("AUD", 2026).unwrap(), 3);
}
