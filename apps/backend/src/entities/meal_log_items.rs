use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "meal_log_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub meal_log_id: i64,
    pub food_id: i64,
    /// Serving count as entered by the user.
    pub quantity: i32,
    /// Normalized at write time; see `domain::nutrition::normalize_quantity_grams`.
    #[sea_orm(column_type = "Double")]
    pub quantity_grams: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::meal_log::Entity",
        from = "Column::MealLogId",
        to = "super::meal_log::Column::Id",
        on_delete = "Cascade"
    )]
    MealLog,
    #[sea_orm(
        belongs_to = "super::food::Entity",
        from = "Column::FoodId",
        to = "super::food::Column::Id"
    )]
    Food,
}

impl Related<super::meal_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MealLog.def()
    }
}

impl Related<super::food::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Food.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
