use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "food_nutrients")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub food_id: i64,
    pub nutrient_id: i64,
    #[sea_orm(column_type = "Double")]
    pub amount_per_100g: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::food::Entity",
        from = "Column::FoodId",
        to = "super::food::Column::Id",
        on_delete = "Cascade"
    )]
    Food,
    #[sea_orm(
        belongs_to = "super::nutrient::Entity",
        from = "Column::NutrientId",
        to = "super::nutrient::Column::Id"
    )]
    Nutrient,
}

impl Related<super::food::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Food.def()
    }
}

impl Related<super::nutrient::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Nutrient.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
