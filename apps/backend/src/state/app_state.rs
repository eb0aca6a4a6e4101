use sea_orm::DatabaseConnection;

use super::security_config::SecurityConfig;
use crate::auth::session::SessionManager;

/// Application state containing shared resources
#[derive(Debug)]
pub struct AppState {
    /// Database connection (optional for test scenarios)
    pub db: Option<DatabaseConnection>,
    /// Security configuration including JWT settings
    pub security: SecurityConfig,
    /// Issues, validates and revokes credential pairs
    pub sessions: SessionManager,
}

impl AppState {
    pub fn new(db: DatabaseConnection, sessions: SessionManager) -> Self {
        Self {
            db: Some(db),
            security: sessions.security().clone(),
            sessions,
        }
    }

    /// State without a database connection; only session routes work.
    pub fn without_db(sessions: SessionManager) -> Self {
        Self {
            db: None,
            security: sessions.security().clone(),
            sessions,
        }
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }
}
