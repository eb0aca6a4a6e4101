//! SeaORM adapters. Functions here return `sea_orm::DbErr`; the repos layer
//! maps to `DomainError`.

pub mod foods_sea;
pub mod meal_logs_sea;
pub mod nutrients_sea;
pub mod users_sea;
