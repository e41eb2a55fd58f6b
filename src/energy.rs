//! Daily energy expenditure and calorie targets.
//!
//! The basal rate uses the revised Harris-Benedict coefficients, scaled by a
//! fixed activity multiplier and then adjusted by 15% for the weight goal.

use crate::convert::round_half_up;
use crate::models::{ActivityLevel, DailyTarget, Goal, MacroPercentages, ProfileRecord, UserProfile};
use serde::Serialize;

const BMR_BASE: f64 = 66.0;
const BMR_WEIGHT_FACTOR: f64 = 13.7;
const BMR_HEIGHT_FACTOR: f64 = 5.0;
const BMR_AGE_FACTOR: f64 = 6.8;

const LOSE_FACTOR: f64 = 0.85;
const GAIN_FACTOR: f64 = 1.15;

const PROTEIN_SHARE: f64 = 0.25;
const CARBS_SHARE: f64 = 0.45;
const FAT_SHARE: f64 = 0.30;
const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
const KCAL_PER_GRAM_CARBS: f64 = 4.0;
const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Intermediate values of a target calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnergyBreakdown {
    pub bmr: f64,
    pub tdee: f64,
    pub target: DailyTarget,
}

impl ActivityLevel {
    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }
}

/// Basal metabolic rate in kcal/day.
pub fn basal_metabolic_rate(profile: &UserProfile) -> f64 {
    BMR_BASE + BMR_WEIGHT_FACTOR * profile.weight_kg + BMR_HEIGHT_FACTOR * profile.height_cm
        - BMR_AGE_FACTOR * f64::from(profile.age_years)
}

/// Total daily energy expenditure in kcal/day.
pub fn total_daily_energy_expenditure(profile: &UserProfile) -> f64 {
    basal_metabolic_rate(profile) * profile.activity_level.multiplier()
}

pub fn goal_calories(tdee: f64, goal: Goal) -> i64 {
    let adjusted = match goal {
        Goal::Lose => round_half_up(tdee * LOSE_FACTOR),
        Goal::Gain => round_half_up(tdee * GAIN_FACTOR),
        Goal::Maintain => round_half_up(tdee),
    };
    adjusted.max(1)
}

/// Splits a calorie budget into protein, carbs and fat grams. The three are
/// rounded independently and may not add back up exactly.
pub fn macro_split(calories: i64) -> DailyTarget {
    let kcal = calories as f64;
    DailyTarget {
        calories,
        protein_grams: round_half_up(kcal * PROTEIN_SHARE / KCAL_PER_GRAM_PROTEIN),
        carbs_grams: round_half_up(kcal * CARBS_SHARE / KCAL_PER_GRAM_CARBS),
        fat_grams: round_half_up(kcal * FAT_SHARE / KCAL_PER_GRAM_FAT),
    }
}

pub fn energy_breakdown(profile: &UserProfile) -> EnergyBreakdown {
    let profile = profile.sanitized();
    let bmr = basal_metabolic_rate(&profile);
    let tdee = bmr * profile.activity_level.multiplier();
    EnergyBreakdown {
        bmr,
        tdee,
        target: macro_split(goal_calories(tdee, profile.goal)),
    }
}

pub fn daily_target(profile: &UserProfile) -> DailyTarget {
    energy_breakdown(profile).target
}

/// The stored override wins over the computed target.
pub fn effective_target(record: &ProfileRecord) -> DailyTarget {
    record
        .target_override
        .unwrap_or_else(|| daily_target(&record.profile))
}

/// Share of each macro in the target's gram total, as whole percentages.
pub fn macro_percentages(target: &DailyTarget) -> MacroPercentages {
    let total = target.protein_grams + target.carbs_grams + target.fat_grams;
    if total <= 0 {
        return MacroPercentages {
            protein: 0,
            carbs: 0,
            fat: 0,
        };
    }
    let share = |grams: i64| round_half_up(grams as f64 / total as f64 * 100.0);
    MacroPercentages {
        protein: share(target.protein_grams),
        carbs: share(target.carbs_grams),
        fat: share(target.fat_grams),
    }
}
