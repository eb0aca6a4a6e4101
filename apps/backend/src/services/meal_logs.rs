use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime};
use tracing::info;

use crate::domain::nutrition::normalize_quantity_grams;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::repos::foods::{self, Food};
use crate::repos::meal_logs::{self, MealLog, MealLogItem};

#[derive(Debug, Clone, Deserialize)]
pub struct NewMealLogItem {
    pub food_id: i64,
    #[serde(default)]
    pub quantity: i32,
    #[serde(default)]
    pub quantity_grams: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewMealLog {
    pub meal_type: String,
    pub items: Vec<NewMealLogItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealLogItemView {
    pub id: i64,
    pub food_id: i64,
    pub quantity: i32,
    pub quantity_grams: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealLogView {
    pub id: i64,
    pub user_id: i64,
    pub meal_type: String,
    pub created_at: String,
    pub items: Vec<MealLogItemView>,
}

impl MealLogView {
    fn new(meal: MealLog, items: Vec<MealLogItem>) -> Self {
        Self {
            id: meal.id,
            user_id: meal.user_id,
            meal_type: meal.meal_type,
            created_at: meal.created_at.format(&Rfc3339).unwrap_or_default(),
            items: items
                .into_iter()
                .map(|item| MealLogItemView {
                    id: item.id,
                    food_id: item.food_id,
                    quantity: item.quantity,
                    quantity_grams: item.quantity_grams,
                })
                .collect(),
        }
    }
}

fn validate(request: &NewMealLog) -> Result<(), DomainError> {
    if request.meal_type.trim().is_empty() {
        return Err(DomainError::validation("meal_type must not be empty"));
    }
    if request.items.is_empty() {
        return Err(DomainError::validation("a meal log needs at least one item"));
    }
    if let Some(item) = request.items.iter().find(|i| i.quantity < 0) {
        return Err(DomainError::validation(format!(
            "quantity for food {} must not be negative",
            item.food_id
        )));
    }
    Ok(())
}

/// Grams to persist for an item; unknown foods are rejected.
pub fn resolve_grams(item: &NewMealLogItem, food: Option<&Food>) -> Result<f64, DomainError> {
    let food = food.ok_or(DomainError::UnknownFood(item.food_id))?;
    Ok(normalize_quantity_grams(
        item.quantity,
        item.quantity_grams,
        food.serving_size_gram,
    ))
}

/// Create a meal log owned by `user_id`. All items are written in one
/// transaction with grams normalized against each food's serving size.
pub async fn create_meal_log(
    db: &DatabaseConnection,
    user_id: i64,
    request: NewMealLog,
) -> Result<MealLogView, DomainError> {
    validate(&request)?;

    let txn = db.begin().await?;
    let meal = meal_logs::create_meal_log(&txn, user_id, request.meal_type.trim()).await?;

    let mut items = Vec::with_capacity(request.items.len());
    for item in &request.items {
        let food = foods::find_by_id(&txn, item.food_id).await?;
        let grams = resolve_grams(item, food.as_ref())?;
        items.push(
            meal_logs::create_item(&txn, meal.id, item.food_id, item.quantity, grams).await?,
        );
    }

    txn.commit().await?;
    info!(user_id, meal_log_id = meal.id, items = items.len(), "meal log created");

    Ok(MealLogView::new(meal, items))
}

/// Fetch a meal log; callers other than the owner get `Forbidden`.
pub async fn get_meal_log<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    meal_log_id: i64,
    caller_id: i64,
) -> Result<MealLogView, DomainError> {
    let meal = meal_logs::find_by_id(conn, meal_log_id).await?.ok_or_else(|| {
        DomainError::not_found(NotFoundKind::MealLog, format!("Meal log {meal_log_id} not found"))
    })?;

    if meal.user_id != caller_id {
        return Err(DomainError::forbidden(format!(
            "meal log {meal_log_id} belongs to another user"
        )));
    }

    let items = meal_logs::list_by_meal(conn, meal.id).await?;
    Ok(MealLogView::new(meal, items))
}

/// UTC bounds covering every instant of the days `first..=last`.
pub fn day_span(first: Date, last: Date) -> Result<(OffsetDateTime, OffsetDateTime), DomainError> {
    if first > last {
        return Err(DomainError::validation(format!(
            "start {first} must not be after end {last}"
        )));
    }
    let after_last = last
        .next_day()
        .ok_or_else(|| DomainError::validation(format!("no day follows {last}")))?;
    Ok((
        first.midnight().assume_utc(),
        after_last.midnight().assume_utc(),
    ))
}

async fn with_items<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    meals: Vec<MealLog>,
) -> Result<Vec<MealLogView>, DomainError> {
    let mut views = Vec::with_capacity(meals.len());
    for meal in meals {
        let items = meal_logs::list_by_meal(conn, meal.id).await?;
        views.push(MealLogView::new(meal, items));
    }
    Ok(views)
}

/// Every meal log the caller owns, oldest first.
pub async fn list_meal_logs<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    caller_id: i64,
) -> Result<Vec<MealLogView>, DomainError> {
    let meals = meal_logs::list_by_user(conn, caller_id).await?;
    with_items(conn, meals).await
}

/// The caller's meal logs from the start of `first` through the end of
/// `last`.
pub async fn list_meal_logs_between<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    caller_id: i64,
    first: Date,
    last: Date,
) -> Result<Vec<MealLogView>, DomainError> {
    let (start, end) = day_span(first, last)?;
    let meals = meal_logs::list_by_user_and_range(conn, caller_id, start, end).await?;
    with_items(conn, meals).await
}
