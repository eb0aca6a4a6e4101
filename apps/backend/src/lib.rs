#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod entities;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod infra;
pub mod logging;
pub mod middleware;
pub mod repos;
pub mod routes;
pub mod services;
pub mod state;
pub mod trace_ctx;

// Re-exports for public API
pub use auth::session::{CredentialPair, Revocation, SessionManager};
pub use auth::{AuthError, Claims, CredentialStore, MemoryCredentialStore, TokenClass};
pub use error::AppError;
pub use errors::ErrorCode;
pub use extractors::current_user::CurrentUser;
pub use infra::db::connect_db;
pub use infra::state::{build_state, StateBuilder};
pub use middleware::{RequestTrace, RequireRole, SessionGate, StructuredLogger, TraceSpan};
pub use state::app_state::AppState;
pub use state::security_config::{AuthMode, RefreshIdentity, SecurityConfig};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}
