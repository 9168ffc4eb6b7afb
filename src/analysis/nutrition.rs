//! Nutrition lookup results and how they merge into a muscle log draft

use crate::storage::coerce::{self, finite};
use crate::storage::MuscleLogDraft;
use serde::{Deserialize, Serialize};

/// Shown when a lookup came back with nothing recognisable
pub const NOT_IDENTIFIED_MESSAGE: &str =
    "Could not identify nutritional info. Please check your spelling and try again.";

/// Totals for a free-text food description. Missing fields read as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionFacts {
    #[serde(default, deserialize_with = "coerce::lenient_f64")]
    pub calories: f64,
    #[serde(default, deserialize_with = "coerce::lenient_f64")]
    pub protein: f64,
    #[serde(default, deserialize_with = "coerce::lenient_f64")]
    pub carbs: f64,
    #[serde(default, deserialize_with = "coerce::lenient_f64")]
    pub fat: f64,
    #[serde(default, deserialize_with = "coerce::lenient_f64")]
    pub fiber: f64,
}

impl NutritionFacts {
    /// The model found no food it could price: zero calories and zero protein
    pub fn is_unidentified(&self) -> bool {
        self.calories == 0.0 && self.protein == 0.0
    }
}

/// How a lookup is folded into the draft's current values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NutritionMode {
    /// Add to what the draft already has (another meal)
    #[default]
    Add,
    /// Overwrite the draft's nutrition fields
    Replace,
}

/// Merge `facts` into `draft`, rounding every field to one decimal
pub fn apply_nutrition(draft: &mut MuscleLogDraft, facts: &NutritionFacts, mode: NutritionMode) {
    let merge = |current: f64, found: f64| {
        let base = match mode {
            NutritionMode::Add => finite(current),
            NutritionMode::Replace => 0.0,
        };
        round_one_decimal(base + finite(found))
    };

    draft.calories = merge(draft.calories, facts.calories);
    draft.protein = merge(draft.protein, facts.protein);
    draft.carbs = merge(draft.carbs, facts.carbs);
    draft.fat = merge(draft.fat, facts.fat);
    draft.fiber = merge(draft.fiber, facts.fiber);
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
