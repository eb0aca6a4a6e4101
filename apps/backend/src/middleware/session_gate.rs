//! Authentication gate for protected scopes.
//!
//! The deployment's [`AuthMode`] decides the one place a credential is read
//! from: the `Authorization: Bearer` header in direct mode, the `jwt-id`
//! cookie in opaque mode. The other source is ignored, never used as a
//! fallback. Every rejection is the same generic 401; the cause only goes to
//! the security log.

use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{web, Error, HttpMessage, ResponseError};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::auth::error::AuthError;
use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;
use crate::logging::security;
use crate::state::app_state::AppState;
use crate::state::security_config::AuthMode;

pub const ACCESS_COOKIE: &str = "jwt-id";
pub const REFRESH_COOKIE: &str = "refresh-id";

pub struct SessionGate;

impl<S, B> Transform<S, ServiceRequest> for SessionGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionGateMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct SessionGateMiddleware<S> {
    service: Rc<S>,
}

/// Pull the credential for `mode` out of the request, if present.
pub fn presented_credential(req: &ServiceRequest, mode: AuthMode) -> Option<String> {
    match mode {
        AuthMode::Direct => req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .map(str::to_owned),
        AuthMode::Opaque => req
            .cookie(ACCESS_COOKIE)
            .map(|c| c.value().to_owned())
            .filter(|v| !v.is_empty()),
    }
}

fn bearer_token(header_value: &str) -> Option<&str> {
    let mut parts = header_value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Some(token),
        _ => None,
    }
}

impl<S, B> Service<ServiceRequest> for SessionGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let Some(app_state) = req.app_data::<web::Data<AppState>>().cloned() else {
                return Ok(reject(req, AppError::internal("AppState not available")));
            };

            let path = req.path().to_string();
            let Some(credential) = presented_credential(&req, app_state.sessions.mode()) else {
                security::auth_failed("missing_credential", &path);
                return Ok(reject(req, AppError::unauthorized()));
            };

            match app_state.sessions.validate_access(&credential).await {
                Ok(claims) => {
                    req.extensions_mut()
                        .insert(CurrentUser::from_claims(claims, credential));
                    service
                        .call(req)
                        .await
                        .map(ServiceResponse::map_into_left_body)
                }
                Err(err @ AuthError::StorageFailure(_)) => {
                    tracing::error!(error = %err, "credential store unavailable during authentication");
                    Ok(reject(req, AppError::from(err)))
                }
                Err(err) => {
                    security::auth_failed(err.reason(), &path);
                    Ok(reject(req, AppError::from(err)))
                }
            }
        })
    }
}

/// Render a rejection in place, inside the request's trace scope.
pub(crate) fn reject<B>(req: ServiceRequest, err: AppError) -> ServiceResponse<EitherBody<B>> {
    req.into_response(err.error_response()).map_into_right_body()
}
