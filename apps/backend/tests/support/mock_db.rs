use calories::auth::password::hash_password;
use calories::auth::session::SessionManager;
use calories::entities::{meal_log, meal_log_items, users};
use calories::state::app_state::AppState;
use calories::state::security_config::AuthMode;
use sea_orm::{DatabaseBackend, MockDatabase};
use time::OffsetDateTime;

use crate::support::auth::test_security;

/// Empty Postgres-flavoured mock; queue results on it before use.
pub fn mock_db() -> MockDatabase {
    MockDatabase::new(DatabaseBackend::Postgres)
}

/// Direct-mode state backed by `db`.
pub fn mock_state(db: MockDatabase) -> AppState {
    AppState::new(
        db.into_connection(),
        SessionManager::direct(test_security(AuthMode::Direct)),
    )
}

pub fn user_row(id: i64, email: &str, password: &str) -> users::Model {
    users::Model {
        id,
        name: "Ada".to_string(),
        email: email.to_string(),
        password: hash_password(password).expect("hash"),
        age: None,
        gender: None,
        weight: None,
        height: None,
        goal: None,
        activity_level: None,
        role: "user".to_string(),
        created_at: OffsetDateTime::UNIX_EPOCH,
    }
}

pub fn meal_row(id: i64, user_id: i64, meal_type: &str, created_at: OffsetDateTime) -> meal_log::Model {
    meal_log::Model {
        id,
        user_id,
        meal_type: meal_type.to_string(),
        created_at,
    }
}

pub fn item_row(id: i64, meal_log_id: i64, food_id: i64, quantity_grams: f64) -> meal_log_items::Model {
    meal_log_items::Model {
        id,
        meal_log_id,
        food_id,
        quantity: 1,
        quantity_grams,
    }
}
