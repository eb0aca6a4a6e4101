use std::sync::Arc;

use crate::auth::session::SessionManager;
use crate::auth::store::{CredentialStore, MemoryCredentialStore};
use crate::error::AppError;
use crate::infra::db::connect_db;
use crate::state::app_state::AppState;
use crate::state::security_config::{AuthMode, SecurityConfig};

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    security_config: SecurityConfig,
    store: Option<Arc<dyn CredentialStore>>,
    database_url: Option<String>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            security_config: SecurityConfig::default(),
            store: None,
            database_url: None,
        }
    }

    pub fn with_db(mut self, database_url: impl Into<String>) -> Self {
        self.database_url = Some(database_url.into());
        self
    }

    pub fn with_security(mut self, security_config: SecurityConfig) -> Self {
        self.security_config = security_config;
        self
    }

    /// Credential store for opaque mode. Defaults to an in-process store.
    pub fn with_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn build_sessions(&self) -> SessionManager {
        match self.security_config.mode {
            AuthMode::Direct => SessionManager::direct(self.security_config.clone()),
            AuthMode::Opaque => {
                let store = self
                    .store
                    .clone()
                    .unwrap_or_else(|| Arc::new(MemoryCredentialStore::new()));
                SessionManager::opaque(self.security_config.clone(), store)
            }
        }
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let sessions = self.build_sessions();
        match self.database_url {
            Some(url) => Ok(AppState::new(connect_db(&url).await?, sessions)),
            None => Ok(AppState::without_db(sessions)),
        }
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
