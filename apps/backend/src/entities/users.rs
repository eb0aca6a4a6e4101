use sea_orm::entity::prelude::*;
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    /// Argon2 PHC string.
    pub password: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    #[sea_orm(column_type = "Double", nullable)]
    pub weight: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub height: Option<f64>,
    pub goal: Option<String>,
    pub activity_level: Option<String>,
    pub role: String,
    pub created_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::meal_log::Entity")]
    MealLog,
}

impl Related<super::meal_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MealLog.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
