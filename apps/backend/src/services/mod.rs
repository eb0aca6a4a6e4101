pub mod meal_logs;
pub mod nutrition;
pub mod users;
