use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "food")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(column_type = "Double")]
    pub serving_size_gram: f64,
    pub source: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::food_nutrients::Entity")]
    FoodNutrients,
}

impl Related<super::food_nutrients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FoodNutrients.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
