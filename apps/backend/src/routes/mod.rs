use actix_web::web;

use crate::middleware::{RequireRole, SessionGate};

pub mod admin;
pub mod auth;
pub mod health;
pub mod meal_logs;
pub mod nutrition;
pub mod private;

/// Register every route with its gates. Shared by `main` and the test
/// app builder so both see the same protection.
///
/// Scope order matters: actix does not fall through from a matched scope,
/// so the narrower `/api/auth` and `/api/admin` scopes come before `/api`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/health").configure(health::configure_routes));

    cfg.service(web::scope("/api/auth").configure(auth::configure_routes));

    cfg.service(
        web::scope("/api/admin")
            .wrap(RequireRole::new("admin"))
            .wrap(SessionGate)
            .configure(admin::configure_routes),
    );

    cfg.service(
        web::scope("/api")
            .wrap(SessionGate)
            .configure(private::configure_routes)
            .configure(meal_logs::configure_routes)
            .configure(nutrition::configure_routes),
    );
}
