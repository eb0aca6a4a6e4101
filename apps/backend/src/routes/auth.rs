use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::{web, HttpRequest, HttpResponse, HttpResponseBuilder};
use serde::{Deserialize, Serialize};

use crate::auth::error::AuthError;
use crate::auth::session::{CredentialPair, Revocation};
use crate::db::require_db;
use crate::error::AppError;
use crate::extractors::CurrentUser;
use crate::logging::security;
use crate::middleware::session_gate::{ACCESS_COOKIE, REFRESH_COOKIE};
use crate::middleware::SessionGate;
use crate::services::users::{self, authenticate, find_user};
use crate::state::app_state::AppState;
use crate::state::security_config::{AuthMode, RefreshIdentity};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
}

/// Body for login and refresh. Tokens only appear in direct mode; in
/// opaque mode the handles travel as HttpOnly cookies.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSummary>,
    pub expires_in: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

fn session_cookie(name: &'static str, value: String, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build(name, value)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::seconds(max_age_secs))
        .finish()
}

fn removal_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::build(name, "").path("/").http_only(true).finish();
    cookie.make_removal();
    cookie
}

/// Render a freshly issued pair the way the deployment's mode requires.
fn issue_response(
    app_state: &AppState,
    mut builder: HttpResponseBuilder,
    pair: CredentialPair,
    user: Option<UserSummary>,
) -> HttpResponse {
    match app_state.sessions.mode() {
        AuthMode::Opaque => {
            let refresh_ttl = app_state.security.refresh_ttl.as_secs() as i64;
            builder
                .cookie(session_cookie(ACCESS_COOKIE, pair.access, pair.expires_in))
                .cookie(session_cookie(REFRESH_COOKIE, pair.refresh, refresh_ttl))
                .json(SessionResponse {
                    user,
                    expires_in: pair.expires_in,
                    access_token: None,
                    refresh_token: None,
                })
        }
        AuthMode::Direct => builder.json(SessionResponse {
            user,
            expires_in: pair.expires_in,
            access_token: Some(pair.access),
            refresh_token: Some(pair.refresh),
        }),
    }
}

async fn login(
    body: web::Json<LoginRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    if body.email.trim().is_empty() || body.password.is_empty() {
        security::login_failed("missing_fields", Some(&body.email));
        return Err(AppError::unauthorized());
    }

    let db = require_db(&app_state)?;
    let Some(user) = authenticate(db, &body.email, &body.password).await? else {
        security::login_failed("invalid_credentials", Some(&body.email));
        return Err(AppError::unauthorized());
    };

    let pair = app_state
        .sessions
        .generate_pair(user.id, Some(&user.email), Some(&user.role))
        .await?;

    let summary = UserSummary {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
    };
    Ok(issue_response(
        &app_state,
        HttpResponse::Ok(),
        pair,
        Some(summary),
    ))
}

/// Self-service sign-up. Input is validated before the database is touched.
async fn register(
    body: web::Json<RegisterRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    users::validate_registration(&body.name, &body.email, &body.password)?;

    let db = require_db(&app_state)?;
    let user = users::register(db, &body.name, &body.email, &body.password).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "user": UserSummary {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    })))
}

async fn refresh(
    req: HttpRequest,
    body: Option<web::Json<RefreshRequest>>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let presented = match app_state.sessions.mode() {
        AuthMode::Opaque => req.cookie(REFRESH_COOKIE).map(|c| c.value().to_owned()),
        AuthMode::Direct => body.and_then(|b| b.into_inner().refresh_token),
    }
    .filter(|v| !v.is_empty());

    let Some(presented) = presented else {
        security::auth_failed("missing_refresh_credential", req.path());
        return Err(AppError::unauthorized());
    };

    let result = match app_state.security.refresh_identity {
        RefreshIdentity::Blank => app_state.sessions.refresh(&presented).await,
        RefreshIdentity::Reload => {
            let claims = match app_state.sessions.validate_refresh(&presented).await {
                Ok(claims) => claims,
                Err(err) => {
                    security::auth_failed(err.reason(), req.path());
                    return Err(err.into());
                }
            };
            let db = require_db(&app_state)?;
            let Some(user) = find_user(db, claims.subject_id).await? else {
                security::auth_failed("subject_gone", req.path());
                return Err(AppError::unauthorized());
            };
            app_state
                .sessions
                .generate_pair(user.id, Some(&user.email), Some(&user.role))
                .await
        }
    };

    match result {
        Ok(pair) => Ok(issue_response(&app_state, HttpResponse::Ok(), pair, None)),
        Err(err) => {
            security::auth_failed(err.reason(), req.path());
            Err(err.into())
        }
    }
}

/// Revoke the credential this request authenticated with. In opaque mode
/// the refresh handle in the `refresh-id` cookie goes too, provided it
/// belongs to the same subject.
async fn logout(
    req: HttpRequest,
    user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    match app_state.sessions.revoke(&user.credential).await? {
        Revocation::Revoked => {
            if let Some(cookie) = req.cookie(REFRESH_COOKIE) {
                revoke_refresh_handle(&app_state, cookie.value(), user.subject_id).await?;
            }
            security::token_revoked(user.subject_id);
            Ok(HttpResponse::Ok()
                .cookie(removal_cookie(ACCESS_COOKIE))
                .cookie(removal_cookie(REFRESH_COOKIE))
                .json(serde_json::json!({ "revoked": true })))
        }
        Revocation::Unsupported => {
            Ok(HttpResponse::Ok().json(serde_json::json!({ "revoked": false })))
        }
    }
}

async fn revoke_refresh_handle(
    app_state: &AppState,
    presented: &str,
    subject_id: i64,
) -> Result<(), AppError> {
    match app_state.sessions.validate_refresh(presented).await {
        Ok(claims) if claims.subject_id == subject_id => {
            app_state.sessions.revoke(presented).await?;
            Ok(())
        }
        Err(err @ AuthError::StorageFailure(_)) => Err(err.into()),
        // Already gone, malformed, or someone else's: nothing to withdraw.
        _ => Ok(()),
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/login", web::post().to(login))
        .route("/register", web::post().to(register))
        .route("/refresh", web::post().to(refresh))
        .service(
            web::resource("/logout")
                .wrap(SessionGate)
                .route(web::post().to(logout)),
        );
}
