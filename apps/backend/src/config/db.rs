use super::{must_var, opt_var};
use crate::error::AppError;

/// Postgres connection string. `POSTGRES_DB_CONNECTION_STRING` wins over
/// `DATABASE_URL`.
pub fn db_url() -> Result<String, AppError> {
    match opt_var("POSTGRES_DB_CONNECTION_STRING") {
        Some(url) => Ok(url),
        None => must_var("DATABASE_URL").map_err(|_| {
            AppError::config("POSTGRES_DB_CONNECTION_STRING or DATABASE_URL must be set")
        }),
    }
}
