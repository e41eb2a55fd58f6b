use crate::convert::calories_for;
use crate::errors::TrackerError;
use crate::lookup::FoodResolver;
use crate::models::{DayLog, FoodLogBook, FoodLogEntry, Meal, MealSection};
use chrono::{DateTime, Local, NaiveDate};

/// A resolved food that has not been given an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFood {
    pub name: String,
    pub calories: i64,
    pub weight_grams: f64,
    pub image_url: Option<String>,
    pub meal: Option<Meal>,
}

pub fn validate_submission(name: &str, weight_grams: f64) -> Result<(), TrackerError> {
    if name.trim().is_empty() {
        return Err(TrackerError::Validation("food name must not be empty".to_string()));
    }
    if !weight_grams.is_finite() || weight_grams <= 0.0 {
        return Err(TrackerError::Validation(
            "weight_grams must be a positive number".to_string(),
        ));
    }
    Ok(())
}

/// Validates the submission, resolves the food and works out its calories.
/// Nothing is appended when the food cannot be resolved.
pub async fn prepare_food(
    resolver: &FoodResolver,
    name: &str,
    weight_grams: f64,
) -> Result<NewFood, TrackerError> {
    validate_submission(name, weight_grams)?;
    let record = resolver.resolve(name).await?;
    Ok(NewFood {
        calories: calories_for(&record, weight_grams),
        name: record.canonical_name,
        weight_grams,
        image_url: record.image_url,
        meal: None,
    })
}

pub fn parse_date_key(raw: &str) -> Result<NaiveDate, TrackerError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| TrackerError::Validation(format!("invalid date '{raw}', expected YYYY-MM-DD")))
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

impl DayLog {
    pub fn total_calories(&self) -> i64 {
        self.entries
            .iter()
            .fold(0i64, |total, entry| total.saturating_add(entry.calories_consumed))
    }

    /// Millisecond timestamp, bumped past the largest id already in the log.
    pub fn next_id(&self, now_millis: i64) -> i64 {
        match self.entries.iter().map(|entry| entry.id).max() {
            Some(max) if max >= now_millis => max.saturating_add(1),
            _ => now_millis,
        }
    }

    pub fn append(&mut self, food: NewFood, now: DateTime<Local>) -> FoodLogEntry {
        let entry = FoodLogEntry {
            id: self.next_id(now.timestamp_millis()),
            name: food.name,
            calories_consumed: food.calories.max(0),
            weight_grams: food.weight_grams,
            timestamp: now.format("%H:%M").to_string(),
            image_url: food.image_url,
            meal: food.meal,
        };
        self.entries.push(entry.clone());
        entry
    }

    pub fn remove(&mut self, id: i64) -> Option<FoodLogEntry> {
        let position = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(position))
    }

    /// The four diary sections in order, each with its subtotal, followed by
    /// an "Otros" section when some entries carry no meal.
    pub fn meal_sections(&self) -> Vec<MealSection> {
        let section = |meal: Option<Meal>, label: &str| {
            let entries: Vec<FoodLogEntry> = self
                .entries
                .iter()
                .filter(|entry| entry.meal == meal)
                .cloned()
                .collect();
            MealSection {
                meal,
                label: label.to_string(),
                total_calories: entries
                    .iter()
                    .fold(0i64, |total, entry| total.saturating_add(entry.calories_consumed)),
                entries,
            }
        };

        let mut sections: Vec<MealSection> = Meal::ALL
            .iter()
            .map(|meal| section(Some(*meal), meal.label()))
            .collect();
        let untagged = section(None, "Otros");
        if !untagged.entries.is_empty() {
            sections.push(untagged);
        }
        sections
    }
}

impl FoodLogBook {
    pub fn day(&self, date: &str) -> Option<&DayLog> {
        self.days.get(date)
    }

    /// The log for `date`, created empty on first use.
    pub fn day_mut(&mut self, date: &str) -> &mut DayLog {
        self.days.entry(date.to_string()).or_default()
    }

    pub fn entries(&self, date: &str) -> &[FoodLogEntry] {
        self.day(date).map(|day| day.entries.as_slice()).unwrap_or_default()
    }

    pub fn total_calories(&self, date: &str) -> i64 {
        self.day(date).map(DayLog::total_calories).unwrap_or(0)
    }
}
