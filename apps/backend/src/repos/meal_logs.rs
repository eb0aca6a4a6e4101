use sea_orm::{ConnectionTrait, DatabaseTransaction};
use time::OffsetDateTime;

use crate::adapters::meal_logs_sea::{self, MealLogItemCreate};
use crate::entities::{meal_log, meal_log_items};
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq)]
pub struct MealLog {
    pub id: i64,
    pub user_id: i64,
    pub meal_type: String,
    pub created_at: OffsetDateTime,
}

/// One food-consumption entry.
#[derive(Debug, Clone, PartialEq)]
pub struct MealLogItem {
    pub id: i64,
    pub meal_log_id: i64,
    pub food_id: i64,
    pub quantity: i32,
    pub quantity_grams: f64,
}

impl From<meal_log::Model> for MealLog {
    fn from(model: meal_log::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            meal_type: model.meal_type,
            created_at: model.created_at,
        }
    }
}

impl From<meal_log_items::Model> for MealLogItem {
    fn from(model: meal_log_items::Model) -> Self {
        Self {
            id: model.id,
            meal_log_id: model.meal_log_id,
            food_id: model.food_id,
            quantity: model.quantity,
            quantity_grams: model.quantity_grams,
        }
    }
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<MealLog>, DomainError> {
    Ok(meal_logs_sea::find_by_id(conn, id).await?.map(MealLog::from))
}

pub async fn list_by_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Vec<MealLog>, DomainError> {
    Ok(meal_logs_sea::list_for_user(conn, user_id)
        .await?
        .into_iter()
        .map(MealLog::from)
        .collect())
}

pub async fn list_by_user_and_range<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> Result<Vec<MealLog>, DomainError> {
    Ok(meal_logs_sea::list_for_user_between(conn, user_id, start, end)
        .await?
        .into_iter()
        .map(MealLog::from)
        .collect())
}

pub async fn list_by_meal<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    meal_log_id: i64,
) -> Result<Vec<MealLogItem>, DomainError> {
    Ok(meal_logs_sea::items_for_meal(conn, meal_log_id)
        .await?
        .into_iter()
        .map(MealLogItem::from)
        .collect())
}

pub async fn create_meal_log(
    txn: &DatabaseTransaction,
    user_id: i64,
    meal_type: &str,
) -> Result<MealLog, DomainError> {
    Ok(MealLog::from(
        meal_logs_sea::create_meal_log(txn, user_id, meal_type).await?,
    ))
}

pub async fn create_item(
    txn: &DatabaseTransaction,
    meal_log_id: i64,
    food_id: i64,
    quantity: i32,
    quantity_grams: f64,
) -> Result<MealLogItem, DomainError> {
    let dto = MealLogItemCreate {
        food_id,
        quantity,
        quantity_grams,
    };
    Ok(MealLogItem::from(
        meal_logs_sea::create_item(txn, meal_log_id, dto).await?,
    ))
}
