//! Role check that runs after `SessionGate`.
//!
//! No identity on the request means the gate did not run or rejected the
//! caller: 401. Identity with a different role: 403.

use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;
use crate::logging::security;
use crate::middleware::session_gate::reject;

pub struct RequireRole {
    role: Rc<str>,
}

impl RequireRole {
    pub fn new(role: &str) -> Self {
        Self { role: Rc::from(role) }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            role: Rc::clone(&self.role),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    role: Rc<str>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
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
        let role = Rc::clone(&self.role);

        Box::pin(async move {
            let verdict = match req.extensions().get::<CurrentUser>() {
                None => Err(AppError::unauthorized()),
                Some(user) if user.has_role(&role) => Ok(()),
                Some(user) => {
                    security::access_denied(user.subject_id, &role, req.path());
                    Err(AppError::forbidden())
                }
            };

            match verdict {
                Ok(()) => service
                    .call(req)
                    .await
                    .map(ServiceResponse::map_into_left_body),
                Err(err) => Ok(reject(req, err)),
            }
        })
    }
}
