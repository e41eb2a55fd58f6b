use crate::convert::round_half_up;
use crate::energy::macro_percentages;
use crate::models::{DailyTarget, DayLog, SummaryResponse};
use crate::trend::weekly_trend;

/// Consumed share of the target, capped at 100.
pub fn progress_percent(consumed: i64, target: i64) -> i64 {
    if target <= 0 {
        return 0;
    }
    round_half_up(consumed as f64 / target as f64 * 100.0).min(100)
}

pub fn build_summary(date: &str, target: DailyTarget, day: Option<&DayLog>) -> SummaryResponse {
    let consumed = day.map(DayLog::total_calories).unwrap_or(0);
    SummaryResponse {
        date: date.to_string(),
        target,
        consumed,
        remaining: target.calories.saturating_sub(consumed),
        progress_percent: progress_percent(consumed, target.calories),
        macro_percentages: macro_percentages(&target),
        weight_trend: weekly_trend(consumed, target.calories),
        entry_count: day.map(|day| day.entries.len()).unwrap_or(0),
    }
}
