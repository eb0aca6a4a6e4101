use actix_web::{web, HttpResponse};
use serde::Deserialize;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::db::require_db;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::{CurrentUser, MealLogId};
use crate::services::nutrition::{
    daily_dashboard, meal_nutrition, nutrition_for_date, nutrition_for_range, SeaNutritionSource,
};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub date: Option<String>,
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(raw: &str) -> Result<Date, AppError> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]")).map_err(|_| {
        AppError::invalid(
            ErrorCode::InvalidDate,
            format!("Invalid date '{raw}', expected YYYY-MM-DD"),
        )
    })
}

/// Parse a half-open `[start, end)` range; `start` must precede `end`.
pub fn parse_range(start: &str, end: &str) -> Result<(Date, Date), AppError> {
    let (start, end) = (parse_date(start)?, parse_date(end)?);
    if start >= end {
        return Err(AppError::invalid(
            ErrorCode::InvalidDateRange,
            format!("start {start} must be before end {end}"),
        ));
    }
    Ok((start, end))
}

async fn meal(
    user: CurrentUser,
    meal_id: MealLogId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let source = SeaNutritionSource::new(require_db(&app_state)?);
    let detail = meal_nutrition(&source, meal_id.0, user.subject_id).await?;
    Ok(HttpResponse::Ok().json(detail))
}

async fn range(
    user: CurrentUser,
    query: web::Query<RangeQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (start, end) = parse_range(&query.start, &query.end)?;
    let source = SeaNutritionSource::new(require_db(&app_state)?);
    let summary = nutrition_for_range(&source, user.subject_id, start, end).await?;
    Ok(HttpResponse::Ok().json(summary))
}

async fn by_date(
    user: CurrentUser,
    path: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let date = parse_date(&path)?;
    let source = SeaNutritionSource::new(require_db(&app_state)?);
    let summary = nutrition_for_date(&source, user.subject_id, date).await?;
    Ok(HttpResponse::Ok().json(summary))
}

async fn dashboard(
    user: CurrentUser,
    query: web::Query<DashboardQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let date = match query.date.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => OffsetDateTime::now_utc().date(),
    };
    let source = SeaNutritionSource::new(require_db(&app_state)?);
    let view = daily_dashboard(&source, user.subject_id, date).await?;
    Ok(HttpResponse::Ok().json(view))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/nutrition/meals/{meal_id}", web::get().to(meal))
        .route("/nutrition/range", web::get().to(range))
        .route("/nutrition/date/{date}", web::get().to(by_date))
        .route("/dashboard", web::get().to(dashboard));
}
