use sea_orm::ConnectionTrait;

use crate::adapters::nutrients_sea;
use crate::domain::nutrition::CompositionRow;
use crate::entities::nutrient;
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq)]
pub struct Nutrient {
    pub id: i64,
    pub name: String,
    pub category: String,
}

impl From<nutrient::Model> for Nutrient {
    fn from(model: nutrient::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            category: model.category,
        }
    }
}

/// `(nutrient_id, amount_per_100g)` rows for one food.
pub async fn list_by_food<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    food_id: i64,
) -> Result<Vec<CompositionRow>, DomainError> {
    Ok(nutrients_sea::composition_for_food(conn, food_id)
        .await?
        .into_iter()
        .map(|row| CompositionRow {
            nutrient_id: row.nutrient_id,
            amount_per_100g: row.amount_per_100g,
        })
        .collect())
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<Nutrient>, DomainError> {
    Ok(nutrients_sea::find_nutrient(conn, id).await?.map(Nutrient::from))
}
