use once_cell::sync::Lazy;
use sea_orm::ConnectionTrait;
use tracing::{debug, info};

use crate::auth::password::{hash_password, verify_password};
use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::logging::pii::Redacted;
use crate::repos::users::{self, User};

pub const MIN_PASSWORD_LEN: usize = 6;
pub const DEFAULT_ROLE: &str = "user";

/// Hash checked when the email is unknown, so both outcomes pay for one
/// argon2 verification.
static DUMMY_HASH: Lazy<String> =
    Lazy::new(|| hash_password("calories-dummy-password").unwrap_or_default());

/// Check an email/password pair. Unknown email and wrong password are
/// indistinguishable to the caller.
pub async fn authenticate<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
    password: &str,
) -> Result<Option<User>, DomainError> {
    let user = users::find_by_email(conn, email.trim()).await?;
    if user.is_none() {
        debug!(email = %Redacted(email), "login for unknown email");
    }
    Ok(check_credentials(user, password, verify_password))
}

/// Run `verify` exactly once whether or not the user exists.
fn check_credentials<F>(user: Option<User>, password: &str, verify: F) -> Option<User>
where
    F: Fn(&str, &str) -> bool,
{
    match user {
        Some(user) => verify(password, &user.password_hash).then_some(user),
        None => {
            verify(password, &DUMMY_HASH);
            None
        }
    }
}

pub async fn find_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<User>, DomainError> {
    users::find_by_id(conn, user_id).await
}

pub fn validate_registration(name: &str, email: &str, password: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("name must not be empty"));
    }
    if !looks_like_email(email.trim()) {
        return Err(DomainError::validation("email is not a valid address"));
    }
    validate_password(password)
}

pub fn validate_password(password: &str) -> Result<(), DomainError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

fn hash(password: &str) -> Result<String, DomainError> {
    hash_password(password).map_err(|e| {
        DomainError::infra(InfraErrorKind::Other("PasswordHash".into()), e.to_string())
    })
}

/// Create an account with the default role. The email must be unused.
pub async fn register<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name: &str,
    email: &str,
    password: &str,
) -> Result<User, DomainError> {
    validate_registration(name, email, password)?;
    let email = email.trim();

    if users::find_by_email(conn, email).await?.is_some() {
        return Err(DomainError::conflict(
            ConflictKind::UniqueEmail,
            "Email already in use",
        ));
    }

    let user = users::create(conn, name.trim(), email, hash(password)?, DEFAULT_ROLE).await?;
    info!(user_id = user.id, "user registered");
    Ok(user)
}

/// Replace the caller's password after checking the current one.
pub async fn change_password<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    current_password: &str,
    new_password: &str,
) -> Result<(), DomainError> {
    validate_password(new_password)?;

    let Some(user) = users::find_by_id(conn, user_id).await? else {
        return Err(DomainError::not_found(
            NotFoundKind::User,
            format!("User {user_id} not found"),
        ));
    };
    if !verify_password(current_password, &user.password_hash) {
        return Err(DomainError::validation("Current password is incorrect"));
    }

    if users::update_password(conn, user_id, hash(new_password)?)
        .await?
        .is_none()
    {
        return Err(DomainError::not_found(
            NotFoundKind::User,
            format!("User {user_id} not found"),
        ));
    }
    info!(user_id, "password changed");
    Ok(())
}
