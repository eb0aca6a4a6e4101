use std::time::Duration;

use super::{must_var, opt_var, parse_u64};
use crate::error::AppError;
use crate::state::security_config::{
    AuthMode, RefreshIdentity, SecurityConfig, DEFAULT_ACCESS_TTL, DEFAULT_CLOCK_SKEW,
    DEFAULT_ISSUER, DEFAULT_REFRESH_TTL,
};

pub fn parse_auth_mode(raw: Option<&str>) -> Result<AuthMode, AppError> {
    match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        None | Some("opaque") => Ok(AuthMode::Opaque),
        Some("direct") => Ok(AuthMode::Direct),
        Some(other) => Err(AppError::config(format!(
            "AUTH_MODE must be 'opaque' or 'direct', got '{other}'"
        ))),
    }
}

pub fn parse_refresh_identity(raw: Option<&str>) -> Result<RefreshIdentity, AppError> {
    match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        None | Some("blank") => Ok(RefreshIdentity::Blank),
        Some("reload") => Ok(RefreshIdentity::Reload),
        Some(other) => Err(AppError::config(format!(
            "REFRESH_IDENTITY must be 'blank' or 'reload', got '{other}'"
        ))),
    }
}

/// Build the security config from `JWT_SECRET_KEY` and friends.
pub fn security_from_env() -> Result<SecurityConfig, AppError> {
    let secret = must_var("JWT_SECRET_KEY")?;

    let access = parse_u64(
        "ACCESS_TOKEN_TTL_SECS",
        opt_var("ACCESS_TOKEN_TTL_SECS"),
        DEFAULT_ACCESS_TTL.as_secs(),
    )?;
    let refresh = parse_u64(
        "REFRESH_TOKEN_TTL_SECS",
        opt_var("REFRESH_TOKEN_TTL_SECS"),
        DEFAULT_REFRESH_TTL.as_secs(),
    )?;
    if access == 0 || refresh == 0 {
        return Err(AppError::config("token lifetimes must be positive"));
    }
    let skew = parse_u64(
        "CLOCK_SKEW_SECS",
        opt_var("CLOCK_SKEW_SECS"),
        DEFAULT_CLOCK_SKEW.as_secs(),
    )?;

    Ok(SecurityConfig::new(secret.into_bytes())
        .with_issuer(opt_var("JWT_ISSUER").unwrap_or_else(|| DEFAULT_ISSUER.to_string()))
        .with_ttls(Duration::from_secs(access), Duration::from_secs(refresh))
        .with_clock_skew(Duration::from_secs(skew))
        .with_mode(parse_auth_mode(opt_var("AUTH_MODE").as_deref())?)
        .with_refresh_identity(parse_refresh_identity(
            opt_var("REFRESH_IDENTITY").as_deref(),
        )?))
}
