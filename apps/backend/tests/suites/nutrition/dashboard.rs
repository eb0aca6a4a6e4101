// Daily dashboard.

use calories::domain::nutrition::{CARBOHYDRATE, ENERGY, FAT, PROTEIN};
use calories::errors::domain::{DomainError, NotFoundKind};
use calories::services::nutrition::daily_dashboard;
use time::macros::{date, datetime};

use crate::support::nutrition_fixture::NutritionFixture;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn catalogue() -> NutritionFixture {
    NutritionFixture::new()
        .food(1, "Rice", 150.0)
        .food(2, "Apple", 180.0)
        .composition(1, &[(ENERGY, 130.0), (PROTEIN, 2.7), (CARBOHYDRATE, 28.0), (FAT, 0.3)])
        // Apple has composition rows but no energy row
        .composition(2, &[(CARBOHYDRATE, 14.0)])
}

#[tokio::test]
async fn dashboard_lists_meals_with_item_calories() {
    let source = catalogue()
        .meal(1, 1, "lunch", datetime!(2024-05-01 12:00 UTC))
        .item(1, 1, 2, 300.0)
        .meal(2, 1, "snack", datetime!(2024-05-01 16:00 UTC))
        .item(2, 2, 1, 100.0)
        .meal(3, 1, "lunch", datetime!(2024-05-02 12:00 UTC))
        .item(3, 1, 1, 150.0);

    let dash = daily_dashboard(&source, 1, date!(2024 - 05 - 01)).await.unwrap();

    assert_eq!(dash.date, "2024-05-01");
    assert_eq!(dash.number_of_meals, 2);
    assert_eq!(dash.meal_logs[0].created_at, "2024-05-01T12:00:00Z");

    let lunch = &dash.meal_logs[0];
    assert_eq!(lunch.food_items[0].food_name, "Rice");
    assert_eq!(lunch.food_items[0].quantity, 2);
    assert!(approx(lunch.food_items[0].calories, 390.0));

    // No energy row: 4 kcal per gram
    let snack = &dash.meal_logs[1];
    assert!(approx(snack.total_calories, 400.0));

    assert!(approx(dash.total_calories, 790.0));
    assert!(approx(dash.total_macronutrients.protein, 8.1));
    assert!(approx(dash.total_macronutrients.carbohydrate, 84.0 + 14.0));
}

#[tokio::test]
async fn empty_day_is_zero() {
    let dash = daily_dashboard(&catalogue(), 1, date!(2024 - 05 - 01)).await.unwrap();
    assert_eq!(dash.number_of_meals, 0);
    assert!(dash.meal_logs.is_empty());
    assert!(approx(dash.total_calories, 0.0));
    assert!(approx(dash.total_macronutrients.fat, 0.0));
}

#[tokio::test]
async fn missing_food_fails_the_dashboard() {
    let source = catalogue()
        .meal(1, 1, "lunch", datetime!(2024-05-01 12:00 UTC))
        .item(1, 77, 1, 100.0);

    assert!(matches!(
        daily_dashboard(&source, 1, date!(2024 - 05 - 01)).await,
        Err(DomainError::NotFound(NotFoundKind::Food, _))
    ));
}

#[tokio::test]
async fn composition_is_read_once_per_item() {
    let source = catalogue()
        .food(3, "Bread", 40.0)
        .broken_composition(3)
        .meal(1, 1, "lunch", datetime!(2024-05-01 12:00 UTC))
        .item(1, 1, 2, 300.0)
        .item(1, 2, 1, 100.0)
        .meal(2, 1, "dinner", datetime!(2024-05-01 19:00 UTC))
        .item(2, 3, 1, 50.0);

    let dash = daily_dashboard(&source, 1, date!(2024 - 05 - 01)).await.unwrap();

    assert_eq!(source.composition_calls(), 3);
    // Failed lookup degrades to the grams estimate for calories and totals alike
    assert!(approx(dash.meal_logs[1].total_calories, 200.0));
    assert!(approx(dash.total_calories, 390.0 + 400.0 + 200.0));
}
