//! Nutrition aggregation over meal logs.
//!
//! Data access goes through [`NutritionSource`] so the aggregation runs the
//! same against Postgres and against in-memory fixtures.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime};
use tracing::{debug, warn};

use crate::domain::nutrition::{
    self, partition, CompositionRow, MacroBreakdown, MicroNutrient, NutrientTotals,
};
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::repos::foods::{self, Food};
use crate::repos::meal_logs::{self, MealLog, MealLogItem};
use crate::repos::nutrients::{self, Nutrient};

/// Lookups the aggregator needs.
#[async_trait]
pub trait NutritionSource: Send + Sync {
    async fn meal_log(&self, meal_log_id: i64) -> Result<Option<MealLog>, DomainError>;
    /// Meal logs of `user_id` created in `[start, end)`, oldest first.
    async fn meal_logs_in_range(
        &self,
        user_id: i64,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Result<Vec<MealLog>, DomainError>;
    async fn items_for_meal(&self, meal_log_id: i64) -> Result<Vec<MealLogItem>, DomainError>;
    async fn composition_for_food(&self, food_id: i64) -> Result<Vec<CompositionRow>, DomainError>;
    async fn nutrient(&self, nutrient_id: i64) -> Result<Option<Nutrient>, DomainError>;
    async fn food(&self, food_id: i64) -> Result<Option<Food>, DomainError>;
}

pub struct SeaNutritionSource<'a, C> {
    conn: &'a C,
}

impl<'a, C> SeaNutritionSource<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl<C: ConnectionTrait + Send + Sync> NutritionSource for SeaNutritionSource<'_, C> {
    async fn meal_log(&self, meal_log_id: i64) -> Result<Option<MealLog>, DomainError> {
        meal_logs::find_by_id(self.conn, meal_log_id).await
    }

    async fn meal_logs_in_range(
        &self,
        user_id: i64,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Result<Vec<MealLog>, DomainError> {
        meal_logs::list_by_user_and_range(self.conn, user_id, start, end).await
    }

    async fn items_for_meal(&self, meal_log_id: i64) -> Result<Vec<MealLogItem>, DomainError> {
        meal_logs::list_by_meal(self.conn, meal_log_id).await
    }

    async fn composition_for_food(&self, food_id: i64) -> Result<Vec<CompositionRow>, DomainError> {
        nutrients::list_by_food(self.conn, food_id).await
    }

    async fn nutrient(&self, nutrient_id: i64) -> Result<Option<Nutrient>, DomainError> {
        nutrients::find_by_id(self.conn, nutrient_id).await
    }

    async fn food(&self, food_id: i64) -> Result<Option<Food>, DomainError> {
        foods::find_by_id(self.conn, food_id).await
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealNutritionDetail {
    pub meal_log_id: i64,
    pub user_id: i64,
    pub meal_type: String,
    pub date: String,
    pub total_calories: f64,
    pub food_count: usize,
    pub macronutrients: MacroBreakdown,
    pub micronutrients: Vec<MicroNutrient>,
}

/// Per-meal line in a range summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealNutrition {
    pub meal_log_id: i64,
    pub meal_type: String,
    pub date: String,
    pub calories: f64,
    pub protein: f64,
    pub carbohydrate: f64,
    pub fat: f64,
    pub food_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutritionSummary {
    pub user_id: i64,
    pub date_range: String,
    pub total_calories: f64,
    pub macronutrients: MacroBreakdown,
    pub micronutrients: Vec<MicroNutrient>,
    pub meals: Vec<MealNutrition>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodItemSummary {
    pub id: i64,
    pub food_id: i64,
    pub food_name: String,
    pub quantity: i32,
    pub quantity_grams: f64,
    pub calories: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealLogSummary {
    pub id: i64,
    pub meal_type: String,
    pub created_at: String,
    pub total_calories: f64,
    pub food_items: Vec<FoodItemSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Macronutrients {
    pub protein: f64,
    pub carbohydrate: f64,
    pub fat: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub date: String,
    pub total_calories: f64,
    pub number_of_meals: usize,
    pub meal_logs: Vec<MealLogSummary>,
    pub total_macronutrients: Macronutrients,
}

pub fn utc_midnight(date: Date) -> OffsetDateTime {
    date.midnight().assume_utc()
}

fn day_after(date: Date) -> Result<Date, DomainError> {
    date.next_day()
        .ok_or_else(|| DomainError::validation(format!("no day follows {date}")))
}

/// Composition rows for an item's food. `None` when there are none or the
/// lookup failed; callers then use the grams-based energy estimate.
async fn item_composition<S: NutritionSource + ?Sized>(
    source: &S,
    item: &MealLogItem,
) -> Option<Vec<CompositionRow>> {
    match source.composition_for_food(item.food_id).await {
        Ok(rows) if !rows.is_empty() => Some(rows),
        Ok(_) => {
            debug!(food_id = item.food_id, "no composition rows; using energy estimate");
            None
        }
        Err(err) => {
            warn!(food_id = item.food_id, error = %err, "composition lookup failed; using energy estimate");
            None
        }
    }
}

/// Totals for one consumed item. A food without usable composition data
/// degrades to the grams-based energy estimate instead of failing.
fn totals_from(rows: Option<&[CompositionRow]>, quantity_grams: f64) -> NutrientTotals {
    let mut totals = NutrientTotals::new();
    match rows {
        Some(rows) => totals.add_item(rows, quantity_grams),
        None => totals.add_fallback(quantity_grams),
    }
    totals
}

/// Calories for one item from its energy row, or the grams estimate.
fn calories_from(rows: Option<&[CompositionRow]>, quantity_grams: f64) -> f64 {
    rows.and_then(|rows| rows.iter().find(|row| row.nutrient_id == nutrition::ENERGY))
        .map(|row| nutrition::amount_for_grams(row.amount_per_100g, quantity_grams))
        .unwrap_or_else(|| nutrition::fallback_energy(quantity_grams))
}

async fn item_totals<S: NutritionSource + ?Sized>(source: &S, item: &MealLogItem) -> NutrientTotals {
    let rows = item_composition(source, item).await;
    totals_from(rows.as_deref(), item.quantity_grams)
}

async fn meal_totals<S: NutritionSource + ?Sized>(
    source: &S,
    meal_log_id: i64,
) -> Result<(NutrientTotals, usize), DomainError> {
    let items = source.items_for_meal(meal_log_id).await?;
    let mut totals = NutrientTotals::new();
    for item in &items {
        totals.merge(&item_totals(source, item).await);
    }
    Ok((totals, items.len()))
}

/// Names for the micro nutrients present in `totals`. Unknown ids and
/// failed lookups are left out.
async fn micro_names<S: NutritionSource + ?Sized>(
    source: &S,
    totals: &NutrientTotals,
) -> HashMap<i64, String> {
    let mut names = HashMap::new();
    for id in totals.micro_ids() {
        match source.nutrient(id).await {
            Ok(Some(nutrient)) => {
                names.insert(id, nutrient.name);
            }
            Ok(None) => debug!(nutrient_id = id, "nutrient metadata missing; skipped"),
            Err(err) => warn!(nutrient_id = id, error = %err, "nutrient lookup failed; skipped"),
        }
    }
    names
}

/// Detail for one meal, visible only to its owner.
pub async fn meal_nutrition<S: NutritionSource + ?Sized>(
    source: &S,
    meal_log_id: i64,
    caller_id: i64,
) -> Result<MealNutritionDetail, DomainError> {
    let meal = source.meal_log(meal_log_id).await?.ok_or_else(|| {
        DomainError::not_found(NotFoundKind::MealLog, format!("Meal log {meal_log_id} not found"))
    })?;

    if meal.user_id != caller_id {
        return Err(DomainError::forbidden(format!(
            "meal log {meal_log_id} belongs to another user"
        )));
    }

    let (totals, food_count) = meal_totals(source, meal.id).await?;
    let names = micro_names(source, &totals).await;
    let (macronutrients, micronutrients) = partition(&totals, &names);

    Ok(MealNutritionDetail {
        meal_log_id: meal.id,
        user_id: meal.user_id,
        meal_type: meal.meal_type,
        date: meal.created_at.date().to_string(),
        total_calories: totals.energy(),
        food_count,
        macronutrients,
        micronutrients,
    })
}

/// Summary over meals created in `[start, end)` (UTC days).
pub async fn nutrition_for_range<S: NutritionSource + ?Sized>(
    source: &S,
    user_id: i64,
    start: Date,
    end: Date,
) -> Result<NutritionSummary, DomainError> {
    if start >= end {
        return Err(DomainError::validation(format!(
            "start {start} must be before end {end}"
        )));
    }

    let meals = source
        .meal_logs_in_range(user_id, utc_midnight(start), utc_midnight(end))
        .await?;

    let mut totals = NutrientTotals::new();
    let mut breakdown = Vec::with_capacity(meals.len());
    for meal in meals {
        let (meal_totals, food_count) = meal_totals(source, meal.id).await?;
        breakdown.push(MealNutrition {
            meal_log_id: meal.id,
            meal_type: meal.meal_type,
            date: meal.created_at.date().to_string(),
            calories: meal_totals.energy(),
            protein: meal_totals.get(nutrition::PROTEIN),
            carbohydrate: meal_totals.get(nutrition::CARBOHYDRATE),
            fat: meal_totals.get(nutrition::FAT),
            food_count,
        });
        totals.merge(&meal_totals);
    }

    let names = micro_names(source, &totals).await;
    let (macronutrients, micronutrients) = partition(&totals, &names);

    Ok(NutritionSummary {
        user_id,
        date_range: format!("{start} to {end}"),
        total_calories: totals.energy(),
        macronutrients,
        micronutrients,
        meals: breakdown,
    })
}

/// Summary for the single UTC day `date`.
pub async fn nutrition_for_date<S: NutritionSource + ?Sized>(
    source: &S,
    user_id: i64,
    date: Date,
) -> Result<NutritionSummary, DomainError> {
    let mut summary = nutrition_for_range(source, user_id, date, day_after(date)?).await?;
    summary.date_range = date.to_string();
    Ok(summary)
}

/// Meals of one UTC day with per-item calories.
pub async fn daily_dashboard<S: NutritionSource + ?Sized>(
    source: &S,
    user_id: i64,
    date: Date,
) -> Result<Dashboard, DomainError> {
    let meals = source
        .meal_logs_in_range(user_id, utc_midnight(date), utc_midnight(day_after(date)?))
        .await?;

    let mut total_calories = 0.0;
    let mut day_totals = NutrientTotals::new();
    let mut meal_logs = Vec::with_capacity(meals.len());

    for meal in &meals {
        let items = source.items_for_meal(meal.id).await?;
        let mut meal_calories = 0.0;
        let mut food_items = Vec::with_capacity(items.len());

        for item in &items {
            let food = source.food(item.food_id).await?.ok_or_else(|| {
                DomainError::not_found(NotFoundKind::Food, format!("Food {} not found", item.food_id))
            })?;
            let rows = item_composition(source, item).await;
            let calories = calories_from(rows.as_deref(), item.quantity_grams);
            meal_calories += calories;
            day_totals.merge(&totals_from(rows.as_deref(), item.quantity_grams));

            food_items.push(FoodItemSummary {
                id: item.id,
                food_id: item.food_id,
                food_name: food.name,
                quantity: item.quantity,
                quantity_grams: item.quantity_grams,
                calories,
            });
        }

        total_calories += meal_calories;
        meal_logs.push(MealLogSummary {
            id: meal.id,
            meal_type: meal.meal_type.clone(),
            created_at: meal.created_at.format(&Rfc3339).unwrap_or_default(),
            total_calories: meal_calories,
            food_items,
        });
    }

    Ok(Dashboard {
        date: date.to_string(),
        total_calories,
        number_of_meals: meals.len(),
        meal_logs,
        total_macronutrients: Macronutrients {
            protein: day_totals.get(nutrition::PROTEIN),
            carbohydrate: day_totals.get(nutrition::CARBOHYDRATE),
            fat: day_totals.get(nutrition::FAT),
        },
    })
}
