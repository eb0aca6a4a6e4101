pub mod current_user;
pub mod meal_log_id;

pub use current_user::CurrentUser;
pub use meal_log_id::MealLogId;
