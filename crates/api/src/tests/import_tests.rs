// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the CSV user import service: the all-or-nothing contract,
//! conflict handling against stored accounts, and the recorded event.

use sitesafe::UserAccountInfo;
use sitesafe_persistence::AuditEventRow;

use crate::{
    ApiError, ImportUsersRequest, PagedResult, SearchFilter, UserImportResult, get_user_account,
    import_users, list_user_accounts,
};

use super::helpers::{TestSite, create_test_site};

#[test]
fn test_import_users_creates_accounts_and_records_event() {
    let mut site: TestSite = create_test_site();
    let csv_text: String = String::from(
        "full_name,email,job_title\n\
         Nadia Petrov,nadia.petrov@example.com,Safety Officer\n\
         Jon Eriksen,jon.eriksen@example.com,\n",
    );

    let result: UserImportResult = import_users(
        &mut site.persistence,
        ImportUsersRequest {
            csv_text,
            performed_by: String::from("rosa.vega"),
        },
    )
    .expect("import should succeed");

    assert_eq!(result.imported_count, 2);
    assert_eq!(result.user_ids.len(), 2);

    let listed: PagedResult<UserAccountInfo> =
        list_user_accounts(&mut site.persistence, &SearchFilter::default())
            .expect("listing should succeed");
    // Two fixture accounts plus the two imported ones.
    assert_eq!(listed.total_count, 4);

    let events: Vec<AuditEventRow> = site
        .persistence
        .events_for_entity("user_account", 0)
        .expect("events should load");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, "import");
    let details: &str = events[0].details.as_deref().unwrap_or_default();
    assert!(details.contains('2'));
}

#[test]
fn test_import_users_defaults_missing_job_title_column() {
    let mut site: TestSite = create_test_site();
    let csv_text: String = String::from(
        "full_name,email\n\
         Nadia Petrov,nadia.petrov@example.com\n",
    );

    let result: UserImportResult = import_users(
        &mut site.persistence,
        ImportUsersRequest {
            csv_text,
            performed_by: String::from("rosa.vega"),
        },
    )
    .expect("import should succeed");
    assert_eq!(result.imported_count, 1);

    let imported: UserAccountInfo =
        get_user_account(&mut site.persistence, result.user_ids[0])
            .expect("lookup should succeed")
            .expect("account should exist");
    assert_eq!(imported.full_name, "Nadia Petrov");
    assert_eq!(imported.job_title, None);
}

#[test]
fn test_import_users_rejects_file_with_any_invalid_row() {
    let mut site: TestSite = create_test_site();
    let csv_text: String = String::from(
        "full_name,email\n\
         Nadia Petrov,nadia.petrov@example.com\n\
         Jon Eriksen,not-an-email\n",
    );

    match import_users(
        &mut site.persistence,
        ImportUsersRequest {
            csv_text,
            performed_by: String::from("rosa.vega"),
        },
    ) {
        Err(ApiError::InvalidInput { field, message }) => {
            assert_eq!(field, "csv_text");
            assert!(message.contains("row 2:"));
        }
        other => panic!("Expected InvalidInput for invalid row, got {other:?}"),
    }

    // Nothing was imported, including the valid first row.
    let listed: PagedResult<UserAccountInfo> =
        list_user_accounts(&mut site.persistence, &SearchFilter::default())
            .expect("listing should succeed");
    assert_eq!(listed.total_count, 2);
}

#[test]
fn test_import_users_rejects_email_already_stored() {
    let mut site: TestSite = create_test_site();
    let csv_text: String = String::from(
        "full_name,email\n\
         Nadia Petrov,nadia.petrov@example.com\n\
         Rosa Vega,rosa.vega@example.com\n",
    );

    match import_users(
        &mut site.persistence,
        ImportUsersRequest {
            csv_text,
            performed_by: String::from("rosa.vega"),
        },
    ) {
        Err(ApiError::Conflict {
            resource_type,
            message,
        }) => {
            assert_eq!(resource_type, "User account");
            assert!(message.contains("rosa.vega@example.com"));
        }
        other => panic!("Expected Conflict for stored email, got {other:?}"),
    }

    let listed: PagedResult<UserAccountInfo> =
        list_user_accounts(&mut site.persistence, &SearchFilter::default())
            .expect("listing should succeed");
    assert_eq!(listed.total_count, 2);
}

#[test]
fn test_import_users_rejects_empty_actor() {
    let mut site: TestSite = create_test_site();
    let csv_text: String = String::from(
        "full_name,email\n\
         Nadia Petrov,nadia.petrov@example.com\n",
    );

    match import_users(
        &mut site.persistence,
        ImportUsersRequest {
            csv_text,
            performed_by: String::new(),
        },
    ) {
        Err(ApiError::InvalidInput { field, .. }) => assert_eq!(field, "actor"),
        other => panic!("Expected InvalidInput for empty actor, got {other:?}"),
    }
}
