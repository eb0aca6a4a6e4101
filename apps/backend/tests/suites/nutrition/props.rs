// Properties of grams normalization and aggregation.

use calories::domain::nutrition::{normalize_quantity_grams, ENERGY};
use calories::services::nutrition::nutrition_for_date;
use proptest::prelude::*;
use time::macros::{date, datetime};
use time::Duration;

use crate::common::proptest_prelude::proptest_prelude_config;
use crate::support::nutrition_fixture::NutritionFixture;

proptest! {
    #![proptest_config(proptest_prelude_config())]

    #[test]
    fn normalization_is_idempotent(
        count in 0i32..20,
        grams in prop_oneof![Just(0.0f64), Just(-5.0), Just(f64::NAN), 0.1f64..5000.0],
        serving in 1.0f64..500.0,
    ) {
        let once = normalize_quantity_grams(count, grams, serving);
        let twice = normalize_quantity_grams(count, once, serving);
        prop_assert!(once == twice || (once - twice).abs() < 1e-9);
    }

    #[test]
    fn multi_serving_grams_never_fall_far_short(
        count in 2i32..20,
        grams in 0.1f64..5000.0,
        serving in 1.0f64..500.0,
    ) {
        let normalized = normalize_quantity_grams(count, grams, serving);
        prop_assert!(normalized >= 0.9 * f64::from(count) * serving);
    }

    #[test]
    fn usable_grams_for_one_serving_are_kept(
        grams in 0.1f64..5000.0,
        serving in 1.0f64..500.0,
    ) {
        prop_assert_eq!(normalize_quantity_grams(1, grams, serving), grams);
    }

    #[test]
    fn day_total_is_sum_of_meals(
        meals in prop::collection::vec(prop::collection::vec(1.0f64..400.0, 0..4), 0..6),
    ) {
        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let mut source = NutritionFixture::new()
            .food(1, "Bread", 30.0)
            .composition(1, &[(ENERGY, 250.0)]);
        let mut expected = 0.0;
        for (i, grams) in meals.iter().enumerate() {
            let meal_id = i as i64 + 1;
            source = source.meal(
                meal_id,
                1,
                "meal",
                datetime!(2024-05-01 06:00 UTC) + Duration::minutes(meal_id * 30),
            );
            for g in grams {
                source = source.item(meal_id, 1, 1, *g);
                expected += 2.5 * g;
            }
        }

        let summary = rt
            .block_on(nutrition_for_date(&source, 1, date!(2024 - 05 - 01)))
            .unwrap();
        prop_assert_eq!(summary.meals.len(), meals.len());
        prop_assert!((summary.total_calories - expected).abs() < 1e-6);
        let per_meal: f64 = summary.meals.iter().map(|m| m.calories).sum();
        prop_assert!((summary.total_calories - per_meal).abs() < 1e-6);
    }
}
