use super::opt_var;
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

pub fn server_from_env() -> Result<ServerConfig, AppError> {
    let host = opt_var("BACKEND_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
    let port = match opt_var("BACKEND_PORT") {
        None => 8080,
        Some(raw) => raw
            .parse::<u16>()
            .map_err(|_| AppError::config(format!("BACKEND_PORT must be a valid port number, got '{raw}'")))?,
    };
    Ok(ServerConfig { host, port })
}
