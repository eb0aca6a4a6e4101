use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::db::require_db;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::{CurrentUser, MealLogId};
use crate::routes::nutrition::parse_date;
use crate::services::meal_logs::{
    create_meal_log, get_meal_log, list_meal_logs, list_meal_logs_between, NewMealLog,
};
use crate::state::app_state::AppState;

/// Both ends are calendar days and both are included.
#[derive(Debug, Deserialize)]
pub struct DaysQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

async fn create(
    user: CurrentUser,
    body: web::Json<NewMealLog>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let view = create_meal_log(db, user.subject_id, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(view))
}

async fn get(
    user: CurrentUser,
    meal_id: MealLogId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let view = get_meal_log(db, meal_id.0, user.subject_id).await?;
    Ok(HttpResponse::Ok().json(view))
}

async fn list(user: CurrentUser, app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let views = list_meal_logs(db, user.subject_id).await?;
    Ok(HttpResponse::Ok().json(views))
}

async fn by_date(
    user: CurrentUser,
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let date = parse_date(&path)?;
    let db = require_db(&app_state)?;
    let views = list_meal_logs_between(db, user.subject_id, date, date).await?;
    Ok(HttpResponse::Ok().json(views))
}

async fn by_days(
    user: CurrentUser,
    query: web::Query<DaysQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (Some(start), Some(end)) = (query.start.as_deref(), query.end.as_deref()) else {
        return Err(AppError::bad_request(
            ErrorCode::BadRequest,
            "start and end are both required",
        ));
    };
    let (first, last) = (parse_date(start)?, parse_date(end)?);
    if first > last {
        return Err(AppError::invalid(
            ErrorCode::InvalidDateRange,
            format!("start {first} must not be after end {last}"),
        ));
    }

    let db = require_db(&app_state)?;
    let views = list_meal_logs_between(db, user.subject_id, first, last).await?;
    Ok(HttpResponse::Ok().json(views))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // Literal segments first; `{meal_id}` would otherwise claim them.
    cfg.route("/meal-logs", web::post().to(create))
        .route("/meal-logs", web::get().to(list))
        .route("/meal-logs/range", web::get().to(by_days))
        .route("/meal-logs/date/{date}", web::get().to(by_date))
        .route("/meal-logs/{meal_id}", web::get().to(get));
}
