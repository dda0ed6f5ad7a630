// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Human-readable sequence numbers.
//!
//! Every lifecycle entity gets a server-assigned number of the form
//! `PREFIX-YYYY-NNNN` (e.g. `OBS-2026-0001`). Counters are per prefix
//! per calendar year and reset each year; allocation lives in the
//! persistence layer so concurrent creates never share a number.

/// Prefix for observation ticket numbers.
pub const OBSERVATION_PREFIX: &str = "OBS";
/// Prefix for incident numbers.
pub const INCIDENT_PREFIX: &str = "INC";
/// Prefix for audit numbers.
pub const AUDIT_PREFIX: &str = "AUD";
/// Prefix for permit numbers.
pub const PERMIT_PREFIX: &str = "PRM";

/// Formats a sequence number.
///
/// The counter value is zero-padded to four digits and grows naturally
/// past 9999.
#[must_use]
pub fn format_sequence_number(prefix: &str, year: i32, value: i64) -> String {
    format!("{prefix}-{year}-{value:04}")
}
