pub mod food;
pub mod food_nutrients;
pub mod meal_log;
pub mod meal_log_items;
pub mod nutrient;
pub mod users;
