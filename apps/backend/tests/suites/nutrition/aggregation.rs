// Meal detail and range summaries.

use calories::domain::nutrition::{CALCIUM, CARBOHYDRATE, ENERGY, FAT, PROTEIN};
use calories::errors::domain::{DomainError, NotFoundKind};
use calories::services::nutrition::{meal_nutrition, nutrition_for_date, nutrition_for_range};
use time::macros::{date, datetime};

use crate::support::nutrition_fixture::NutritionFixture;

const ZINC: i64 = 20;
const SELENIUM: i64 = 21;
const UNNAMED: i64 = 22;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// Oats and milk, with a zinc/selenium tail and one nameless nutrient.
fn catalogue() -> NutritionFixture {
    NutritionFixture::new()
        .food(1, "Oats", 40.0)
        .food(2, "Milk", 250.0)
        .food(3, "Mystery bar", 50.0)
        .nutrient(ZINC, "Zinc", "mineral")
        .nutrient(SELENIUM, "Selenium", "mineral")
        .composition(
            1,
            &[
                (ENERGY, 200.0),
                (PROTEIN, 13.0),
                (CARBOHYDRATE, 60.0),
                (FAT, 7.0),
                (SELENIUM, 0.03),
                (ZINC, 4.0),
            ],
        )
        .composition(2, &[(ENERGY, 100.0), (PROTEIN, 3.4), (CALCIUM, 0.12), (UNNAMED, 1.0)])
}

#[tokio::test]
async fn meal_totals_scale_by_grams() {
    let source = catalogue()
        .meal(10, 1, "breakfast", datetime!(2024-05-01 07:30 UTC))
        .item(10, 1, 1, 100.0)
        .item(10, 2, 1, 150.0);

    let detail = meal_nutrition(&source, 10, 1).await.unwrap();

    assert_eq!(detail.meal_log_id, 10);
    assert_eq!(detail.meal_type, "breakfast");
    assert_eq!(detail.date, "2024-05-01");
    assert_eq!(detail.food_count, 2);
    assert!(approx(detail.total_calories, 350.0));
    assert!(approx(detail.macronutrients.energy, 350.0));
    assert!(approx(detail.macronutrients.protein, 13.0 + 5.1));
    assert!(approx(detail.macronutrients.calcium, 0.18));
    assert!(approx(detail.macronutrients.fiber, 0.0));
}

#[tokio::test]
async fn two_item_meal_energy_adds_up() {
    let source = NutritionFixture::new()
        .food(1, "A", 100.0)
        .food(2, "B", 50.0)
        .composition(1, &[(ENERGY, 200.0)])
        .composition(2, &[(ENERGY, 300.0)])
        .meal(1, 1, "lunch", datetime!(2024-05-01 12:00 UTC))
        .item(1, 1, 1, 100.0)
        .item(1, 2, 1, 50.0);

    let detail = meal_nutrition(&source, 1, 1).await.unwrap();
    assert!(approx(detail.total_calories, 350.0));
}

#[tokio::test]
async fn micronutrients_are_named_sorted_and_filtered() {
    let source = catalogue()
        .meal(10, 1, "breakfast", datetime!(2024-05-01 07:30 UTC))
        .item(10, 1, 1, 100.0)
        .item(10, 2, 1, 100.0);

    let detail = meal_nutrition(&source, 10, 1).await.unwrap();

    let ids: Vec<i64> = detail.micronutrients.iter().map(|m| m.nutrient_id).collect();
    assert_eq!(ids, vec![ZINC, SELENIUM], "unnamed nutrient must be dropped");
    assert_eq!(detail.micronutrients[0].nutrient_name, "Zinc");
    assert!(approx(detail.micronutrients[0].amount, 4.0));
    assert!(detail.micronutrients.iter().all(|m| m.unit == "g"));
}

#[tokio::test]
async fn missing_composition_falls_back_to_grams_estimate() {
    let source = catalogue()
        .broken_composition(2)
        .meal(10, 1, "snack", datetime!(2024-05-01 15:00 UTC))
        .item(10, 3, 1, 50.0)
        .item(10, 2, 1, 25.0);

    let detail = meal_nutrition(&source, 10, 1).await.unwrap();

    // 50g without rows and 25g with a failing lookup, both at 4 kcal/g
    assert!(approx(detail.total_calories, 300.0));
    assert!(approx(detail.macronutrients.protein, 0.0));
}

#[tokio::test]
async fn meal_without_items_is_all_zero() {
    let source = catalogue().meal(10, 1, "dinner", datetime!(2024-05-01 19:00 UTC));

    let detail = meal_nutrition(&source, 10, 1).await.unwrap();
    assert_eq!(detail.food_count, 0);
    assert!(approx(detail.total_calories, 0.0));
    assert!(detail.micronutrients.is_empty());
}

#[tokio::test]
async fn meal_detail_is_owner_only() {
    let source = catalogue()
        .meal(10, 1, "breakfast", datetime!(2024-05-01 07:30 UTC))
        .item(10, 1, 1, 100.0);

    assert!(matches!(
        meal_nutrition(&source, 10, 2).await,
        Err(DomainError::Forbidden(_))
    ));
    assert!(matches!(
        meal_nutrition(&source, 99, 1).await,
        Err(DomainError::NotFound(NotFoundKind::MealLog, _))
    ));
}

#[tokio::test]
async fn range_is_half_open_and_per_user() {
    let source = catalogue()
        .meal(1, 1, "breakfast", datetime!(2024-05-01 00:00 UTC))
        .item(1, 1, 1, 100.0)
        .meal(2, 1, "dinner", datetime!(2024-05-02 18:00 UTC))
        .item(2, 2, 1, 200.0)
        .meal(3, 1, "breakfast", datetime!(2024-05-03 00:00 UTC))
        .item(3, 1, 1, 100.0)
        .meal(4, 2, "lunch", datetime!(2024-05-01 12:00 UTC))
        .item(4, 1, 1, 500.0);

    let summary = nutrition_for_range(&source, 1, date!(2024 - 05 - 01), date!(2024 - 05 - 03))
        .await
        .unwrap();

    assert_eq!(summary.user_id, 1);
    assert_eq!(summary.date_range, "2024-05-01 to 2024-05-03");
    let ids: Vec<i64> = summary.meals.iter().map(|m| m.meal_log_id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert!(approx(summary.total_calories, 400.0));
    assert!(approx(summary.meals[0].calories, 200.0));
    assert!(approx(summary.meals[1].protein, 6.8));
    assert!(approx(
        summary.total_calories,
        summary.meals.iter().map(|m| m.calories).sum::<f64>()
    ));
}

#[tokio::test]
async fn empty_or_inverted_range_is_rejected() {
    let source = catalogue();
    for (start, end) in [
        (date!(2024 - 05 - 02), date!(2024 - 05 - 02)),
        (date!(2024 - 05 - 03), date!(2024 - 05 - 01)),
    ] {
        assert!(matches!(
            nutrition_for_range(&source, 1, start, end).await,
            Err(DomainError::Validation(_))
        ));
    }
}

#[tokio::test]
async fn single_day_summary() {
    let source = catalogue()
        .meal(1, 1, "breakfast", datetime!(2024-05-01 08:00 UTC))
        .item(1, 1, 1, 50.0)
        .meal(2, 1, "dinner", datetime!(2024-05-01 23:59:59 UTC))
        .item(2, 1, 1, 50.0)
        .meal(3, 1, "breakfast", datetime!(2024-05-02 08:00 UTC))
        .item(3, 1, 1, 50.0);

    let summary = nutrition_for_date(&source, 1, date!(2024 - 05 - 01)).await.unwrap();

    assert_eq!(summary.date_range, "2024-05-01");
    assert_eq!(summary.meals.len(), 2);
    assert!(approx(summary.total_calories, 200.0));
    assert!(approx(summary.macronutrients.carbohydrate, 60.0));

    let empty = nutrition_for_date(&source, 1, date!(2024 - 06 - 01)).await.unwrap();
    assert!(empty.meals.is_empty());
    assert!(approx(empty.total_calories, 0.0));
}
