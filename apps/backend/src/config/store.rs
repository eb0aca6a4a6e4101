use std::time::Duration;

use super::{opt_var, parse_u64};
use crate::error::AppError;

pub const DEFAULT_OP_TIMEOUT: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Redis { url: String },
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub op_timeout: Duration,
}

/// Assemble a redis URL from discrete host/port/password/db parts.
pub fn redis_url_from_parts(
    host: Option<&str>,
    port: Option<&str>,
    password: Option<&str>,
    db: Option<&str>,
) -> String {
    let host = host.unwrap_or("localhost");
    let port = port.unwrap_or("6379");
    let db = db.unwrap_or("0");
    match password {
        Some(pw) => format!("redis://:{pw}@{host}:{port}/{db}"),
        None => format!("redis://{host}:{port}/{db}"),
    }
}

pub fn store_from_env() -> Result<StoreConfig, AppError> {
    let op_timeout = Duration::from_millis(parse_u64(
        "STORE_OP_TIMEOUT_MS",
        opt_var("STORE_OP_TIMEOUT_MS"),
        DEFAULT_OP_TIMEOUT.as_millis() as u64,
    )?);

    let backend = match opt_var("CREDENTIAL_STORE")
        .map(|s| s.to_ascii_lowercase())
        .as_deref()
    {
        None | Some("redis") => {
            let url = opt_var("REDIS_URL").unwrap_or_else(|| {
                redis_url_from_parts(
                    opt_var("REDIS_HOST").as_deref(),
                    opt_var("REDIS_PORT").as_deref(),
                    opt_var("REDIS_PASSWORD").as_deref(),
                    opt_var("REDIS_DB").as_deref(),
                )
            });
            StoreBackend::Redis { url }
        }
        Some("memory") => StoreBackend::Memory,
        Some(other) => {
            return Err(AppError::config(format!(
                "CREDENTIAL_STORE must be 'redis' or 'memory', got '{other}'"
            )))
        }
    };

    Ok(StoreConfig {
        backend,
        op_timeout,
    })
}
