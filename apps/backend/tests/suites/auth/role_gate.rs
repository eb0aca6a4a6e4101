// Admin scope: authenticated first, then role-checked.

use actix_web::http::{header, StatusCode};
use actix_web::test;
use backend_test_support::problem_details::assert_problem_details_from_service_response;
use serde_json::Value;

use crate::support::auth::{direct_state, issue_admin_pair, issue_user_pair};
use crate::support::create_test_app;

fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

#[actix_web::test]
async fn admin_role_passes() {
    let state = direct_state();
    let pair = issue_admin_pair(&state, 1).await;
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::get()
        .uri("/api/admin/ping")
        .insert_header(bearer(&pair.access))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["user_id"], 1);
}

#[actix_web::test]
async fn other_role_is_forbidden() {
    let state = direct_state();
    let pair = issue_user_pair(&state, 2).await;
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::get()
        .uri("/api/admin/ping")
        .insert_header(bearer(&pair.access))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.headers().get(header::WWW_AUTHENTICATE).is_none());
    assert_problem_details_from_service_response(resp, "FORBIDDEN", StatusCode::FORBIDDEN, None)
        .await;
}

#[actix_web::test]
async fn unauthenticated_admin_request_is_401_not_403() {
    let app = create_test_app(direct_state()).with_prod_routes().build().await;

    let req = test::TestRequest::get().uri("/api/admin/ping").to_request();
    let resp = test::call_service(&app, req).await;

    assert_problem_details_from_service_response(resp, "UNAUTHORIZED", StatusCode::UNAUTHORIZED, None)
        .await;
}

#[actix_web::test]
async fn refreshed_credential_has_no_role() {
    let state = direct_state();
    let pair = issue_admin_pair(&state, 3).await;
    let renewed = state.sessions.refresh(&pair.refresh).await.unwrap();
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::get()
        .uri("/api/admin/ping")
        .insert_header(bearer(&renewed.access))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri("/api/me")
        .insert_header(bearer(&renewed.access))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
