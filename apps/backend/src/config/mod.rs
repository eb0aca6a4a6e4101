//! Environment-driven configuration.
//!
//! Each loader reads the process environment once at startup. The parsing
//! helpers are pure so they can be tested without touching `std::env`.

pub mod auth;
pub mod db;
pub mod server;
pub mod store;

use std::env;

use crate::error::AppError;

/// Required environment variable; missing or blank is a config error.
pub(crate) fn must_var(name: &str) -> Result<String, AppError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::config(format!("{name} must be set"))),
    }
}

pub(crate) fn opt_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

pub(crate) fn parse_u64(name: &str, raw: Option<String>, default: u64) -> Result<u64, AppError> {
    match raw {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| AppError::config(format!("{name} must be a non-negative integer, got '{raw}'"))),
    }
}
