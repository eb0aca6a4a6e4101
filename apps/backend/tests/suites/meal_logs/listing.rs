// Listing the caller's meal logs.

use actix_web::http::{header, StatusCode};
use actix_web::test;
use backend_test_support::problem_details::assert_problem_details_from_service_response;
use calories::entities::meal_log_items;
use serde_json::Value;
use time::macros::datetime;

use crate::support::auth::{direct_state, issue_user_pair};
use crate::support::create_test_app;
use crate::support::mock_db::{item_row, meal_row, mock_db, mock_state};

fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

#[actix_web::test]
async fn listing_requires_a_session() {
    let app = create_test_app(direct_state()).with_prod_routes().build().await;

    for uri in [
        "/api/meal-logs",
        "/api/meal-logs/date/2024-05-01",
        "/api/meal-logs/range?start=2024-05-01&end=2024-05-02",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[actix_web::test]
async fn invalid_date_is_rejected_before_the_database() {
    let state = direct_state();
    let pair = issue_user_pair(&state, 4).await;
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::get()
        .uri("/api/meal-logs/date/2024-13-01")
        .insert_header(bearer(&pair.access))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "INVALID_DATE",
        StatusCode::BAD_REQUEST,
        Some("2024-13-01"),
    )
    .await;
}

#[actix_web::test]
async fn range_needs_both_ends() {
    let state = direct_state();
    let pair = issue_user_pair(&state, 4).await;
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::get()
        .uri("/api/meal-logs/range?start=2024-05-01")
        .insert_header(bearer(&pair.access))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(resp, "BAD_REQUEST", StatusCode::BAD_REQUEST, None)
        .await;
}

#[actix_web::test]
async fn reversed_range_is_rejected() {
    let state = direct_state();
    let pair = issue_user_pair(&state, 4).await;
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::get()
        .uri("/api/meal-logs/range?start=2024-05-03&end=2024-05-01")
        .insert_header(bearer(&pair.access))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "INVALID_DATE_RANGE",
        StatusCode::BAD_REQUEST,
        None,
    )
    .await;
}

#[actix_web::test]
async fn single_day_range_reaches_the_database() {
    let state = direct_state();
    let pair = issue_user_pair(&state, 4).await;
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::get()
        .uri("/api/meal-logs/range?start=2024-05-01&end=2024-05-01")
        .insert_header(bearer(&pair.access))
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
async fn lists_meals_with_their_items() {
    let db = mock_db()
        .append_query_results([vec![
            meal_row(1, 4, "breakfast", datetime!(2024-05-01 08:00 UTC)),
            meal_row(2, 4, "dinner", datetime!(2024-05-01 19:30 UTC)),
        ]])
        .append_query_results([vec![item_row(10, 1, 7, 120.0), item_row(11, 1, 8, 30.0)]])
        .append_query_results([Vec::<meal_log_items::Model>::new()]);
    let state = mock_state(db);
    let pair = issue_user_pair(&state, 4).await;
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::get()
        .uri("/api/meal-logs")
        .insert_header(bearer(&pair.access))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let meals = body.as_array().unwrap();
    assert_eq!(meals.len(), 2);
    assert_eq!(meals[0]["meal_type"], "breakfast");
    assert_eq!(meals[0]["created_at"], "2024-05-01T08:00:00Z");
    assert_eq!(meals[0]["items"].as_array().unwrap().len(), 2);
    assert_eq!(meals[0]["items"][1]["food_id"], 8);
    assert!(meals[1]["items"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn date_listing_returns_that_day() {
    let db = mock_db()
        .append_query_results([vec![meal_row(5, 4, "lunch", datetime!(2024-05-02 12:00 UTC))]])
        .append_query_results([vec![item_row(20, 5, 3, 200.0)]]);
    let state = mock_state(db);
    let pair = issue_user_pair(&state, 4).await;
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::get()
        .uri("/api/meal-logs/date/2024-05-02")
        .insert_header(bearer(&pair.access))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body[0]["id"], 5);
    assert_eq!(body[0]["user_id"], 4);
    assert_eq!(body[0]["items"][0]["quantity_grams"], 200.0);
}
