use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::db::require_db;
use crate::error::AppError;
use crate::extractors::CurrentUser;
use crate::services::users::{change_password, validate_password};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
}

/// Identity the session gate resolved for this request.
async fn me(user: CurrentUser) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "user_id": user.subject_id,
        "email": user.email,
        "role": user.role,
    })))
}

async fn update_password(
    user: CurrentUser,
    body: web::Json<ChangePasswordRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    validate_password(&body.new_password)?;

    let db = require_db(&app_state)?;
    change_password(db, user.subject_id, &body.current_password, &body.new_password).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "updated": true })))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/me", web::get().to(me))
        .route("/me/password", web::put().to(update_password));
}
