use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use calories::auth::store::{CredentialStore, MemoryCredentialStore, RedisCredentialStore};
use calories::config::auth::security_from_env;
use calories::config::db::db_url;
use calories::config::server::server_from_env;
use calories::config::store::{store_from_env, StoreBackend};
use calories::infra::state::build_state;
use calories::middleware::{RequestTrace, StructuredLogger, TraceSpan};
use calories::routes;
use calories::state::security_config::AuthMode;
use tracing::{error, info, warn};

mod telemetry;

fn fail(what: &str, err: impl std::fmt::Display) -> ! {
    error!(error = %err, "{what}");
    std::process::exit(1);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment
    // (docker env_file, or sourced manually for local runs).
    let server = server_from_env().unwrap_or_else(|e| fail("invalid server config", e));
    let security = security_from_env().unwrap_or_else(|e| fail("invalid auth config", e));
    let database_url = db_url().unwrap_or_else(|e| fail("invalid database config", e));

    let mut builder = build_state().with_db(database_url);

    if security.mode == AuthMode::Opaque {
        let store_config = store_from_env().unwrap_or_else(|e| fail("invalid store config", e));
        let store: Arc<dyn CredentialStore> = match store_config.backend {
            StoreBackend::Redis { url } => Arc::new(
                RedisCredentialStore::connect(&url, store_config.op_timeout)
                    .await
                    .unwrap_or_else(|e| fail("failed to connect credential store", e)),
            ),
            StoreBackend::Memory => {
                warn!("using in-process credential store; sessions do not survive restarts");
                Arc::new(MemoryCredentialStore::new())
            }
        };
        builder = builder.with_store(store);
    } else {
        warn!("direct token mode: logout cannot revoke tokens before they expire");
    }

    let app_state = builder
        .with_security(security)
        .build()
        .await
        .unwrap_or_else(|e| fail("failed to build application state", e));

    info!(host = %server.host, port = server.port, mode = ?app_state.sessions.mode(), "starting calories backend");

    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((server.host.as_str(), server.port))?
    .run()
    .await
}
