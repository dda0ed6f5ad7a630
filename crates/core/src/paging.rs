// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Page-window arithmetic shared by every paged listing.

/// Page size applied when the request does not name one.
pub const DEFAULT_PAGE_SIZE: i64 = 20;
/// Upper bound on requested page sizes.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Normalizes a requested page number (1-based, minimum 1).
#[must_use]
pub fn normalize_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// Normalizes a requested page size (default 20, clamped to 1..=100).
#[must_use]
pub fn normalize_page_size(page_size: Option<i64>) -> i64 {
    page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE)
}

/// Row offset of a (normalized) page.
#[must_use]
pub const fn offset(page: i64, page_size: i64) -> i64 {
    (page - 1) * page_size
}

/// Number of pages needed for `total_count` rows (0 when empty).
#[must_use]
pub const fn total_pages(total_count: i64, page_size: i64) -> i64 {
    if total_count == 0 {
        0
    } else {
        (total_count + page_size - 1) / page_size
    }
}
