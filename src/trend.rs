use crate::models::{TrendDirection, WeightTrend};

/// Energy equivalent of one kilogram of body mass.
pub const KCAL_PER_KG: f64 = 7700.0;

/// Weekly weight change if every day of the week matched today's intake.
/// The magnitude is left unrounded.
pub fn weekly_trend(consumed_calories: i64, daily_target_calories: i64) -> WeightTrend {
    let daily_diff = consumed_calories.saturating_sub(daily_target_calories);
    let weekly_diff = daily_diff.saturating_mul(7);
    let weekly_change_kg = weekly_diff as f64 / KCAL_PER_KG;

    let direction = if weekly_change_kg > 0.0 {
        TrendDirection::Gain
    } else if weekly_change_kg < 0.0 {
        TrendDirection::Loss
    } else {
        TrendDirection::Maintain
    };

    WeightTrend {
        magnitude_kg: weekly_change_kg.abs(),
        direction,
    }
}
