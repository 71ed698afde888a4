//! Tests for the organization service.

use std::sync::Arc;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::MockOrganizationRepository;
use chrono::Utc;
use rstest::rstest;

fn make_service(repo: MockOrganizationRepository) -> OrganizationService<MockOrganizationRepository> {
    OrganizationService::new(Arc::new(repo))
}

fn input(name: &str, address: &str) -> OrganizationInput {
    OrganizationInput {
        name: Some(name.to_owned()),
        address: Some(address.to_owned()),
    }
}

fn stored(id: i32, name: &str, address: &str) -> Organization {
    Organization {
        id: OrganizationId::new(id),
        name: name.to_owned(),
        address: address.to_owned(),
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn create_persists_trimmed_values() {
    let mut repo = MockOrganizationRepository::new();
    repo.expect_insert()
        .withf(|draft| draft.name.as_str() == "Acme" && draft.address.as_str() == "1 Main St")
        .times(1)
        .return_once(|draft| Ok(stored(10, draft.name.as_str(), draft.address.as_str())));

    let service = make_service(repo);
    let created = service
        .create_organization(input("  Acme ", " 1 Main St "))
        .await
        .expect("create succeeds");

    assert_eq!(created.id, OrganizationId::new(10));
    assert_eq!(created.name, "Acme");
}

#[tokio::test]
async fn create_rejects_invalid_input_without_touching_store() {
    let mut repo = MockOrganizationRepository::new();
    repo.expect_insert().never();

    let service = make_service(repo);
    let error = service
        .create_organization(input("", ""))
        .await
        .expect_err("validation");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), "Validation failed");
    assert_eq!(error.field_errors().len(), 2);
}

#[tokio::test]
async fn create_hides_store_detail() {
    let mut repo = MockOrganizationRepository::new();
    repo.expect_insert()
        .times(1)
        .return_once(|_| Err(OrganizationRepositoryError::query("relation does not exist")));

    let service = make_service(repo);
    let error = service
        .create_organization(input("Acme", "1 Main St"))
        .await
        .expect_err("store failure");

    assert_eq!(error.code(), ErrorCode::StoreUnavailable);
    assert_eq!(error.message(), "Failed to create organization");
}

#[tokio::test]
async fn get_missing_is_not_found() {
    let mut repo = MockOrganizationRepository::new();
    repo.expect_find_with_users()
        .times(1)
        .return_once(|_| Ok(None));

    let service = make_service(repo);
    let error = service
        .get_organization(OrganizationId::new(99))
        .await
        .expect_err("missing");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "Organization not found");
}

#[tokio::test]
async fn list_maps_connection_failure() {
    let mut repo = MockOrganizationRepository::new();
    repo.expect_list_with_users()
        .times(1)
        .return_once(|| Err(OrganizationRepositoryError::connection("timed out")));

    let service = make_service(repo);
    let error = service.list_organizations().await.expect_err("failure");

    assert_eq!(error.code(), ErrorCode::StoreUnavailable);
    assert_eq!(error.message(), "Failed to fetch organizations");
}

#[tokio::test]
async fn update_validates_before_existence_check() {
    let mut repo = MockOrganizationRepository::new();
    repo.expect_update().never();

    let service = make_service(repo);
    let error = service
        .update_organization(OrganizationId::new(404), input("Acme", "   "))
        .await
        .expect_err("validation");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.field_errors()[0].field(), "address");
}

#[tokio::test]
async fn update_missing_is_not_found() {
    let mut repo = MockOrganizationRepository::new();
    repo.expect_update().times(1).return_once(|_, _| Ok(None));

    let service = make_service(repo);
    let error = service
        .update_organization(OrganizationId::new(5), input("Acme", "1 Main St"))
        .await
        .expect_err("missing");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn update_returns_stored_record() {
    let mut repo = MockOrganizationRepository::new();
    repo.expect_update()
        .withf(|id, draft| id.get() == 5 && draft.name.as_str() == "Renamed")
        .times(1)
        .return_once(|id, draft| {
            Ok(Some(Organization {
                id,
                name: draft.name.as_str().to_owned(),
                address: draft.address.as_str().to_owned(),
                created_at: Utc::now(),
            }))
        });

    let service = make_service(repo);
    let updated = service
        .update_organization(OrganizationId::new(5), input("Renamed", "2 High St"))
        .await
        .expect("update succeeds");

    assert_eq!(updated.id, OrganizationId::new(5));
    assert_eq!(updated.address, "2 High St");
}

#[rstest]
#[case(OrganizationDeletion::Deleted, None)]
#[case(OrganizationDeletion::NotFound, Some((ErrorCode::NotFound, ORGANIZATION_NOT_FOUND)))]
#[case(
    OrganizationDeletion::HasUsers { user_count: 2 },
    Some((ErrorCode::Conflict, ORGANIZATION_HAS_USERS))
)]
#[tokio::test]
async fn delete_maps_outcomes(
    #[case] outcome: OrganizationDeletion,
    #[case] expected: Option<(ErrorCode, &'static str)>,
) {
    let mut repo = MockOrganizationRepository::new();
    repo.expect_delete_if_unused()
        .times(1)
        .return_once(move |_| Ok(outcome));

    let service = make_service(repo);
    let result = service.delete_organization(OrganizationId::new(1)).await;

    match expected {
        None => assert!(result.is_ok(), "expected success, got {result:?}"),
        Some((code, message)) => {
            let error = result.expect_err("expected failure");
            assert_eq!(error.code(), code);
            assert_eq!(error.message(), message);
        }
    }
}
