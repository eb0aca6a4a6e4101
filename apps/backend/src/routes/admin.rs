use actix_web::{web, HttpResponse};

use crate::error::AppError;
use crate::extractors::CurrentUser;

async fn ping(user: CurrentUser) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "user_id": user.subject_id,
    })))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/ping", web::get().to(ping));
}
