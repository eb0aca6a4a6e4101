//! Pure nutrient arithmetic: per-item scaling, accumulation, macro/micro
//! partitioning and write-time quantity normalization. No I/O.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

pub const ENERGY: i64 = 1;
pub const PROTEIN: i64 = 2;
pub const FAT: i64 = 3;
pub const CARBOHYDRATE: i64 = 4;
pub const FIBER: i64 = 5;
pub const CHOLESTEROL: i64 = 6;
pub const VITAMIN_A: i64 = 7;
pub const VITAMIN_B12: i64 = 8;
pub const CALCIUM: i64 = 9;
pub const IRON: i64 = 10;

/// Closed set of nutrient ids reported in [`MacroBreakdown`].
pub const MACRO_IDS: [i64; 10] = [
    ENERGY,
    PROTEIN,
    FAT,
    CARBOHYDRATE,
    FIBER,
    CHOLESTEROL,
    VITAMIN_A,
    VITAMIN_B12,
    CALCIUM,
    IRON,
];

/// Calories per gram assumed for a food with no composition data.
pub const FALLBACK_KCAL_PER_GRAM: f64 = 4.0;

/// Unit reported for micronutrients; the nutrient table carries none.
pub const MICRO_UNIT: &str = "g";

pub fn is_macro(nutrient_id: i64) -> bool {
    MACRO_IDS.contains(&nutrient_id)
}

/// One nutrient-composition entry of a food.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositionRow {
    pub nutrient_id: i64,
    pub amount_per_100g: f64,
}

pub fn amount_for_grams(amount_per_100g: f64, quantity_grams: f64) -> f64 {
    (amount_per_100g / 100.0) * quantity_grams
}

pub fn fallback_energy(quantity_grams: f64) -> f64 {
    quantity_grams * FALLBACK_KCAL_PER_GRAM
}

/// Running totals keyed by nutrient id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NutrientTotals {
    amounts: BTreeMap<i64, f64>,
}

impl NutrientTotals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, nutrient_id: i64, amount: f64) {
        *self.amounts.entry(nutrient_id).or_insert(0.0) += amount;
    }

    /// Add one consumed item given its food's composition rows.
    pub fn add_item(&mut self, rows: &[CompositionRow], quantity_grams: f64) {
        for row in rows {
            self.add(row.nutrient_id, amount_for_grams(row.amount_per_100g, quantity_grams));
        }
    }

    /// Approximate energy for an item whose composition is unknown.
    pub fn add_fallback(&mut self, quantity_grams: f64) {
        self.add(ENERGY, fallback_energy(quantity_grams));
    }

    pub fn merge(&mut self, other: &NutrientTotals) {
        for (&id, &amount) in &other.amounts {
            self.add(id, amount);
        }
    }

    pub fn get(&self, nutrient_id: i64) -> f64 {
        self.amounts.get(&nutrient_id).copied().unwrap_or(0.0)
    }

    pub fn energy(&self) -> f64 {
        self.get(ENERGY)
    }

    /// Nutrient ids outside the macro set, ascending.
    pub fn micro_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.amounts.keys().copied().filter(|id| !is_macro(*id))
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }
}

/// Fixed-shape macro record. Field names match the established wire format.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MacroBreakdown {
    pub energy: f64,
    pub protein: f64,
    #[serde(rename = "total_lipid_fe")]
    pub fat: f64,
    pub carbohydrate: f64,
    pub fiber: f64,
    #[serde(rename = "cholesteroid")]
    pub cholesterol: f64,
    pub vitamin_a: f64,
    #[serde(rename = "vitamin_b")]
    pub vitamin_b12: f64,
    pub calcium: f64,
    pub iron: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MicroNutrient {
    pub nutrient_id: i64,
    pub nutrient_name: String,
    pub amount: f64,
    pub unit: &'static str,
}

impl From<&NutrientTotals> for MacroBreakdown {
    fn from(totals: &NutrientTotals) -> Self {
        Self {
            energy: totals.get(ENERGY),
            protein: totals.get(PROTEIN),
            fat: totals.get(FAT),
            carbohydrate: totals.get(CARBOHYDRATE),
            fiber: totals.get(FIBER),
            cholesterol: totals.get(CHOLESTEROL),
            vitamin_a: totals.get(VITAMIN_A),
            vitamin_b12: totals.get(VITAMIN_B12),
            calcium: totals.get(CALCIUM),
            iron: totals.get(IRON),
        }
    }
}

/// Split totals into the macro record and a micro list sorted by id.
/// Micro ids missing from `names` are dropped.
pub fn partition(
    totals: &NutrientTotals,
    names: &HashMap<i64, String>,
) -> (MacroBreakdown, Vec<MicroNutrient>) {
    let micros = totals
        .micro_ids()
        .filter_map(|id| {
            names.get(&id).map(|name| MicroNutrient {
                nutrient_id: id,
                nutrient_name: name.clone(),
                amount: totals.get(id),
                unit: MICRO_UNIT,
            })
        })
        .collect();

    (MacroBreakdown::from(totals), micros)
}

/// Write-time grams normalization.
///
/// Missing (zero, negative, non-finite) grams, or grams more than 10% below
/// `count * serving` when more than one serving was logged, are replaced by
/// `count * serving`. Applying it to its own output changes nothing.
pub fn normalize_quantity_grams(count: i32, quantity_grams: f64, serving_size_gram: f64) -> f64 {
    let expected = f64::from(count.max(0)) * serving_size_gram.max(0.0);

    if !quantity_grams.is_finite() || quantity_grams <= 0.0 {
        return expected;
    }
    if count > 1 && quantity_grams < 0.9 * expected {
        return expected;
    }
    quantity_grams
}
