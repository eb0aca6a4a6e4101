use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::error::AppError;
use crate::errors::ErrorCode;

/// Positive meal log id taken from the `{meal_id}` path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MealLogId(pub i64);

fn parse(raw: Option<&str>) -> Result<MealLogId, AppError> {
    let raw = raw.ok_or_else(|| {
        AppError::bad_request(ErrorCode::InvalidMealLogId, "Missing meal_id parameter")
    })?;

    let id = raw.parse::<i64>().map_err(|_| {
        AppError::bad_request(ErrorCode::InvalidMealLogId, format!("Invalid meal id: {raw}"))
    })?;

    if id <= 0 {
        return Err(AppError::bad_request(
            ErrorCode::InvalidMealLogId,
            format!("Meal id must be positive, got: {id}"),
        ));
    }

    Ok(MealLogId(id))
}

impl FromRequest for MealLogId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(parse(req.match_info().get("meal_id")))
    }
}
