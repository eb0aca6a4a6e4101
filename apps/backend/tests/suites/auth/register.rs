// Self-service registration and password change.

use actix_web::http::{header, StatusCode};
use actix_web::test;
use backend_test_support::problem_details::assert_problem_details_from_service_response;
use calories::entities::users;
use serde_json::{json, Value};

use crate::support::auth::{direct_state, issue_user_pair};
use crate::support::create_test_app;
use crate::support::mock_db::{mock_db, mock_state, user_row};

#[actix_web::test]
async fn register_validates_before_touching_the_database() {
    let app = create_test_app(direct_state()).with_prod_routes().build().await;

    for body in [
        json!({}),
        json!({ "name": "Ada", "email": "ada@example.com" }),
        json!({ "name": "Ada", "email": "not-an-email", "password": "secret1" }),
        json!({ "name": "  ", "email": "ada@example.com", "password": "secret1" }),
        json!({ "name": "Ada", "email": "ada@example.com", "password": "short" }),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_problem_details_from_service_response(
            resp,
            "VALIDATION_ERROR",
            StatusCode::BAD_REQUEST,
            None,
        )
        .await;
    }
}

#[actix_web::test]
async fn register_without_database_is_unavailable() {
    let app = create_test_app(direct_state()).with_prod_routes().build().await;

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "name": "Ada", "email": "ada@example.com", "password": "secret1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "DB_UNAVAILABLE",
        StatusCode::SERVICE_UNAVAILABLE,
        None,
    )
    .await;
}

#[actix_web::test]
async fn register_rejects_a_taken_email() {
    let db = mock_db().append_query_results([vec![user_row(3, "ada@example.com", "secret1")]]);
    let app = create_test_app(mock_state(db)).with_prod_routes().build().await;

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "name": "Ada", "email": "ada@example.com", "password": "another1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "UNIQUE_EMAIL",
        StatusCode::CONFLICT,
        Some("Email already in use"),
    )
    .await;
}

#[actix_web::test]
async fn register_creates_a_user_with_the_default_role() {
    let db = mock_db()
        .append_query_results([Vec::<users::Model>::new()])
        .append_query_results([vec![user_row(11, "ada@example.com", "secret1")]]);
    let app = create_test_app(mock_state(db)).with_prod_routes().build().await;

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "name": "Ada", "email": " ada@example.com ", "password": "secret1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["id"], 11);
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert_eq!(body["user"]["role"], "user");
    assert!(body["user"].get("password").is_none());
}

#[actix_web::test]
async fn password_change_requires_a_session() {
    let app = create_test_app(direct_state()).with_prod_routes().build().await;

    let req = test::TestRequest::put()
        .uri("/api/me/password")
        .set_json(json!({ "current_password": "secret1", "new_password": "secret2" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn short_new_password_is_rejected_before_lookup() {
    let state = direct_state();
    let pair = issue_user_pair(&state, 3).await;
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::put()
        .uri("/api/me/password")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", pair.access)))
        .set_json(json!({ "current_password": "secret1", "new_password": "abc" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "VALIDATION_ERROR",
        StatusCode::BAD_REQUEST,
        Some("at least 6"),
    )
    .await;
}

#[actix_web::test]
async fn wrong_current_password_is_rejected() {
    let db = mock_db().append_query_results([vec![user_row(3, "ada@example.com", "secret1")]]);
    let state = mock_state(db);
    let pair = issue_user_pair(&state, 3).await;
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::put()
        .uri("/api/me/password")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", pair.access)))
        .set_json(json!({ "current_password": "guess123", "new_password": "secret2" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "VALIDATION_ERROR",
        StatusCode::BAD_REQUEST,
        Some("Current password is incorrect"),
    )
    .await;
}

#[actix_web::test]
async fn password_change_for_a_vanished_user_is_404() {
    let db = mock_db().append_query_results([Vec::<users::Model>::new()]);
    let state = mock_state(db);
    let pair = issue_user_pair(&state, 3).await;
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::put()
        .uri("/api/me/password")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", pair.access)))
        .set_json(json!({ "current_password": "secret1", "new_password": "secret2" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "USER_NOT_FOUND",
        StatusCode::NOT_FOUND,
        None,
    )
    .await;
}

#[actix_web::test]
async fn password_change_stores_a_new_hash() {
    let row = user_row(3, "ada@example.com", "secret1");
    let db = mock_db()
        .append_query_results([vec![row.clone()]])
        .append_query_results([vec![row.clone()]])
        .append_query_results([vec![row]]);
    let state = mock_state(db);
    let pair = issue_user_pair(&state, 3).await;
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::put()
        .uri("/api/me/password")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", pair.access)))
        .set_json(json!({ "current_password": "secret1", "new_password": "secret2" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["updated"], true);
}
