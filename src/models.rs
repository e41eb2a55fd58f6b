use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_WEIGHT_KG: f64 = 70.0;
pub const DEFAULT_HEIGHT_CM: f64 = 175.0;
pub const DEFAULT_AGE_YEARS: u32 = 28;

/// A food as known to the lookup table or the remote search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodRecord {
    pub canonical_name: String,
    pub calories_per_100g: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Goal {
    #[default]
    Maintain,
    Lose,
    Gain,
}

impl From<String> for Goal {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "lose" | "bajar peso" => Goal::Lose,
            "gain" | "subir peso" => Goal::Gain,
            _ => Goal::Maintain,
        }
    }
}

impl Goal {
    pub fn as_str(self) -> &'static str {
        match self {
            Goal::Maintain => "maintain",
            Goal::Lose => "lose",
            Goal::Gain => "gain",
        }
    }
}

impl From<Goal> for String {
    fn from(goal: Goal) -> Self {
        goal.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActivityLevel {
    #[default]
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl From<String> for ActivityLevel {
    fn from(value: String) -> Self {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "light" => ActivityLevel::Light,
            "moderate" => ActivityLevel::Moderate,
            "active" => ActivityLevel::Active,
            "veryactive" => ActivityLevel::VeryActive,
            _ => ActivityLevel::Sedentary,
        }
    }
}

impl ActivityLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very_active",
        }
    }
}

impl From<ActivityLevel> for String {
    fn from(level: ActivityLevel) -> Self {
        level.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: u32,
    pub goal: Goal,
    pub activity_level: ActivityLevel,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            weight_kg: DEFAULT_WEIGHT_KG,
            height_cm: DEFAULT_HEIGHT_CM,
            age_years: DEFAULT_AGE_YEARS,
            goal: Goal::Maintain,
            activity_level: ActivityLevel::Sedentary,
        }
    }
}

impl UserProfile {
    /// Replaces out-of-range fields with their defaults.
    pub fn sanitized(self) -> Self {
        let positive = |value: f64, fallback: f64| {
            if value.is_finite() && value > 0.0 {
                value
            } else {
                fallback
            }
        };
        Self {
            weight_kg: positive(self.weight_kg, DEFAULT_WEIGHT_KG),
            height_cm: positive(self.height_cm, DEFAULT_HEIGHT_CM),
            age_years: if self.age_years == 0 {
                DEFAULT_AGE_YEARS
            } else {
                self.age_years
            },
            ..self
        }
    }
}

/// Section of the diary a food was eaten in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Meal {
    Breakfast,
    Lunch,
    Dinner,
    Snacks,
}

impl Meal {
    pub const ALL: [Meal; 4] = [Meal::Breakfast, Meal::Lunch, Meal::Dinner, Meal::Snacks];

    pub fn as_str(self) -> &'static str {
        match self {
            Meal::Breakfast => "breakfast",
            Meal::Lunch => "lunch",
            Meal::Dinner => "dinner",
            Meal::Snacks => "snacks",
        }
    }

    /// Section heading shown in the diary.
    pub fn label(self) -> &'static str {
        match self {
            Meal::Breakfast => "Desayuno",
            Meal::Lunch => "Almuerzo",
            Meal::Dinner => "Cena",
            Meal::Snacks => "Snacks",
        }
    }
}

impl TryFrom<String> for Meal {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "breakfast" | "desayuno" => Ok(Meal::Breakfast),
            "lunch" | "almuerzo" => Ok(Meal::Lunch),
            "dinner" | "cena" => Ok(Meal::Dinner),
            "snacks" | "snack" => Ok(Meal::Snacks),
            _ => Err(format!("unknown meal '{value}'")),
        }
    }
}

impl From<Meal> for String {
    fn from(meal: Meal) -> Self {
        meal.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodLogEntry {
    pub id: i64,
    pub name: String,
    pub calories_consumed: i64,
    pub weight_grams: f64,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal: Option<Meal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTarget {
    pub calories: i64,
    pub protein_grams: i64,
    pub carbs_grams: i64,
    pub fat_grams: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Gain,
    Loss,
    Maintain,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightTrend {
    pub magnitude_kg: f64,
    pub direction: TrendDirection,
}

/// Persisted under the `userProfile` key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileRecord {
    pub profile: UserProfile,
    pub target_override: Option<DailyTarget>,
    pub reminder: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub dark_mode: bool,
    pub notifications: bool,
    pub metric_units: bool,
    pub reminders: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            dark_mode: false,
            notifications: true,
            metric_units: true,
            reminders: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DayLog {
    #[serde(default)]
    pub entries: Vec<FoodLogEntry>,
}

/// Persisted under the `foodLog` key, one log per `YYYY-MM-DD` date.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoodLogBook {
    #[serde(default)]
    pub days: BTreeMap<String, DayLog>,
}

#[derive(Debug, Deserialize)]
pub struct AddFoodRequest {
    pub name: String,
    pub weight_grams: f64,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub meal: Option<Meal>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DateQuery {
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    #[serde(default)]
    pub q: String,
}

/// Body of `PUT /api/profile/targets`. Absent fields leave the stored value
/// untouched, explicit `null` clears it.
#[derive(Debug, Default, Deserialize)]
pub struct TargetsRequest {
    #[serde(default, deserialize_with = "explicit_option")]
    pub target_override: Option<Option<DailyTarget>>,
    #[serde(default, deserialize_with = "explicit_option")]
    pub reminder: Option<Option<String>>,
}

fn explicit_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub profile: UserProfile,
    pub target: DailyTarget,
    pub bmr: f64,
    pub tdee: f64,
    pub target_override: Option<DailyTarget>,
    pub reminder: Option<String>,
}

/// One diary section; `meal` is `None` for entries logged without a meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealSection {
    pub meal: Option<Meal>,
    pub label: String,
    pub entries: Vec<FoodLogEntry>,
    pub total_calories: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DayLogResponse {
    pub date: String,
    pub entries: Vec<FoodLogEntry>,
    pub total_calories: i64,
    pub meals: Vec<MealSection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroPercentages {
    pub protein: i64,
    pub carbs: i64,
    pub fat: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub date: String,
    pub target: DailyTarget,
    pub consumed: i64,
    pub remaining: i64,
    pub progress_percent: i64,
    pub macro_percentages: MacroPercentages,
    pub weight_trend: WeightTrend,
    pub entry_count: usize,
}

#[derive(Debug, Serialize)]
pub struct DailyPoint {
    pub date: String,
    pub consumed: i64,
    pub target: i64,
    pub remaining: i64,
}

#[derive(Debug, Serialize)]
pub struct WeeklyPoint {
    pub week: String,
    pub start_date: String,
    pub end_date: String,
    pub consumed: i64,
    pub entries: usize,
}

#[derive(Debug, Serialize)]
pub struct WeeklyAveragePoint {
    pub week: String,
    pub days_counted: u8,
    pub avg_consumed: f64,
    pub trend: WeightTrend,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub last_7_days: Vec<DailyPoint>,
    pub weekly_totals: Vec<WeeklyPoint>,
    pub weekly_averages: Vec<WeeklyAveragePoint>,
}
