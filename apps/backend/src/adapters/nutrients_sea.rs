use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::entities::{food_nutrients, nutrient};

pub async fn composition_for_food<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    food_id: i64,
) -> Result<Vec<food_nutrients::Model>, sea_orm::DbErr> {
    food_nutrients::Entity::find()
        .filter(food_nutrients::Column::FoodId.eq(food_id))
        .order_by_asc(food_nutrients::Column::NutrientId)
        .all(conn)
        .await
}

pub async fn find_nutrient<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<nutrient::Model>, sea_orm::DbErr> {
    nutrient::Entity::find_by_id(id).one(conn).await
}
