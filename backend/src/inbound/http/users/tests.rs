//! Tests for users API handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use mockall::predicate::eq;
use rstest::rstest;
use serde_json::json;

use super::*;
use crate::domain::ports::MockUsersQuery;
use crate::inbound::http::test_utils::{error_fields, init_api, read_json};

#[rstest]
#[case(Some(json!(4)), Some("4"))]
#[case(Some(json!("4")), Some("4"))]
#[case(None, None)]
fn request_org_id_accepts_number_or_string(
    #[case] org_id: Option<Value>,
    #[case] expected: Option<&str>,
) {
    let input = UserInput::from(UserRequest {
        org_id,
        ..UserRequest::default()
    });
    assert_eq!(input.organization_id.as_deref(), expected);
}

#[rstest]
#[actix_web::test]
async fn list_joins_organization_summary() {
    let app = init_api(HttpState::fixtures()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/users").to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    let first = &body["data"][0];
    assert_eq!(first["user_id"], 1);
    assert_eq!(first["org_id"], 1);
    assert_eq!(first["organization"], json!({ "org_id": 1, "name": "Acme" }));
}

#[rstest]
#[case("/api/users/organization/1", 1)]
#[case("/api/users/organization/2", 0)]
#[case("/api/users/organization/nope", 0)]
#[actix_web::test]
async fn by_organization_lists_members_or_nothing(#[case] uri: &str, #[case] expected: usize) {
    let app = init_api(HttpState::fixtures()).await;

    let response =
        actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(expected));
}

#[rstest]
#[actix_web::test]
async fn by_organization_passes_parsed_id_to_query() {
    let mut query = MockUsersQuery::new();
    query
        .expect_list_users_by_organization()
        .with(eq(OrganizationId::new(12)))
        .times(1)
        .return_once(|_| Ok(Vec::new()));
    let state = HttpState {
        users_query: Arc::new(query),
        ..HttpState::fixtures()
    };
    let app = init_api(state).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/users/organization/12")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[rstest]
#[case("/api/users/5")]
#[case("/api/users/x")]
#[actix_web::test]
async fn get_missing_user_is_not_found(#[case] uri: &str) {
    let app = init_api(HttpState::fixtures()).await;

    let response =
        actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request()).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json(response).await;
    assert_eq!(body["message"], "User not found");
}

#[rstest]
#[actix_web::test]
async fn create_normalises_email_and_defaults_role() {
    let app = init_api(HttpState::fixtures()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/users")
            .set_json(json!({ "name": "Sam", "email": " Sam@Acme.TEST ", "org_id": "1" }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    assert_eq!(body["message"], "User created successfully");
    assert_eq!(body["data"]["email"], "sam@acme.test");
    assert_eq!(body["data"]["role"], "Member");
}

#[rstest]
#[actix_web::test]
async fn create_lists_all_invalid_fields() {
    let app = init_api(HttpState::fixtures()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/users")
            .set_json(json!({ "name": "", "email": "nope", "role": "Owner", "org_id": 0 }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(error_fields(&body), vec!["name", "email", "role", "org_id"]);
}

#[rstest]
#[case(json!({ "name": "Sam", "email": "jo@acme.test", "org_id": 1 }), "Email already exists")]
#[case(json!({ "name": "Sam", "email": "sam@acme.test", "org_id": 9 }), "Organization not found")]
#[actix_web::test]
async fn create_rejects_broken_references(#[case] payload: Value, #[case] message: &str) {
    let app = init_api(HttpState::fixtures()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/users")
            .set_json(payload)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert_eq!(body["message"], message);
}

#[rstest]
#[actix_web::test]
async fn update_keeps_own_email() {
    let app = init_api(HttpState::fixtures()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/users/1")
            .set_json(json!({ "name": "Jo", "email": "jo@acme.test", "role": "Member", "org_id": 1 }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["message"], "User updated successfully");
    assert_eq!(body["data"]["role"], "Member");
}

#[rstest]
#[actix_web::test]
async fn delete_confirms_without_data() {
    let app = init_api(HttpState::fixtures()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri("/api/users/1")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(
        body,
        json!({ "status": "success", "message": "User deleted successfully" })
    );
}
