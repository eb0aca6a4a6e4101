use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};
use serde::Serialize;

use crate::auth::claims::Claims;
use crate::error::AppError;

/// Caller identity resolved by `SessionGate` and stored in request
/// extensions. Handlers behind the gate take this as an argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUser {
    pub subject_id: i64,
    pub email: Option<String>,
    pub role: Option<String>,
    /// The exact credential presented, so logout can revoke it.
    #[serde(skip)]
    pub credential: String,
}

impl CurrentUser {
    pub fn from_claims(claims: Claims, credential: String) -> Self {
        Self {
            subject_id: claims.subject_id,
            email: claims.email,
            role: claims.role,
            credential,
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.role.as_deref() == Some(role)
    }
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<CurrentUser>()
                .cloned()
                .ok_or_else(AppError::unauthorized),
        )
    }
}
