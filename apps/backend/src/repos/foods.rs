use sea_orm::ConnectionTrait;

use crate::adapters::foods_sea;
use crate::entities::food;
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq)]
pub struct Food {
    pub id: i64,
    pub name: String,
    pub serving_size_gram: f64,
}

impl From<food::Model> for Food {
    fn from(model: food::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            serving_size_gram: model.serving_size_gram,
        }
    }
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<Food>, DomainError> {
    Ok(foods_sea::find_by_id(conn, id).await?.map(Food::from))
}

pub async fn find_by_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    ids: &[i64],
) -> Result<Vec<Food>, DomainError> {
    Ok(foods_sea::find_by_ids(conn, ids)
        .await?
        .into_iter()
        .map(Food::from)
        .collect())
}
