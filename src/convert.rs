use crate::models::FoodRecord;

/// Rounds halves towards positive infinity, so `94.5` becomes `95` and
/// `-0.5` becomes `0`.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Calories consumed when eating `weight_grams` of `record`.
///
/// Callers validate the weight; a non-positive weight is rejected before it
/// gets here.
pub fn calories_for(record: &FoodRecord, weight_grams: f64) -> i64 {
    round_half_up(record.calories_per_100g * weight_grams / 100.0)
}
