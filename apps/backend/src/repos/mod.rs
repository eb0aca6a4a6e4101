//! Repository functions for the domain layer (generic over ConnectionTrait).

pub mod foods;
pub mod meal_logs;
pub mod nutrients;
pub mod users;
