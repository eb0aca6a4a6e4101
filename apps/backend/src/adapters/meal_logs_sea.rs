use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait, NotSet,
    QueryFilter, QueryOrder, Set,
};
use time::OffsetDateTime;

use crate::entities::{meal_log, meal_log_items};

pub struct MealLogItemCreate {
    pub food_id: i64,
    pub quantity: i32,
    pub quantity_grams: f64,
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<meal_log::Model>, sea_orm::DbErr> {
    meal_log::Entity::find_by_id(id).one(conn).await
}

pub async fn list_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Vec<meal_log::Model>, sea_orm::DbErr> {
    meal_log::Entity::find()
        .filter(meal_log::Column::UserId.eq(user_id))
        .order_by_asc(meal_log::Column::CreatedAt)
        .order_by_asc(meal_log::Column::Id)
        .all(conn)
        .await
}

/// Meal logs for `user_id` created in `[start, end)`, oldest first.
pub async fn list_for_user_between<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> Result<Vec<meal_log::Model>, sea_orm::DbErr> {
    meal_log::Entity::find()
        .filter(meal_log::Column::UserId.eq(user_id))
        .filter(meal_log::Column::CreatedAt.gte(start))
        .filter(meal_log::Column::CreatedAt.lt(end))
        .order_by_asc(meal_log::Column::CreatedAt)
        .order_by_asc(meal_log::Column::Id)
        .all(conn)
        .await
}

pub async fn items_for_meal<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    meal_log_id: i64,
) -> Result<Vec<meal_log_items::Model>, sea_orm::DbErr> {
    meal_log_items::Entity::find()
        .filter(meal_log_items::Column::MealLogId.eq(meal_log_id))
        .order_by_asc(meal_log_items::Column::Id)
        .all(conn)
        .await
}

pub async fn create_meal_log(
    txn: &DatabaseTransaction,
    user_id: i64,
    meal_type: &str,
) -> Result<meal_log::Model, sea_orm::DbErr> {
    meal_log::ActiveModel {
        id: NotSet,
        user_id: Set(user_id),
        meal_type: Set(meal_type.to_owned()),
        created_at: Set(OffsetDateTime::now_utc()),
    }
    .insert(txn)
    .await
}

pub async fn create_item(
    txn: &DatabaseTransaction,
    meal_log_id: i64,
    dto: MealLogItemCreate,
) -> Result<meal_log_items::Model, sea_orm::DbErr> {
    meal_log_items::ActiveModel {
        id: NotSet,
        meal_log_id: Set(meal_log_id),
        food_id: Set(dto.food_id),
        quantity: Set(dto.quantity),
        quantity_grams: Set(dto.quantity_grams),
    }
    .insert(txn)
    .await
}
