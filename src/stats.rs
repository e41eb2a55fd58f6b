use crate::food_log::date_key;
use crate::models::{
    DailyPoint, FoodLogBook, StatsResponse, WeeklyAveragePoint, WeeklyPoint,
};
use crate::trend::weekly_trend;
use chrono::{Datelike, Duration, Local, NaiveDate};

pub fn build_stats(book: &FoodLogBook, target_calories: i64) -> StatsResponse {
    build_stats_at(Local::now().date_naive(), book, target_calories)
}

pub fn build_stats_at(today: NaiveDate, book: &FoodLogBook, target_calories: i64) -> StatsResponse {
    const WEEK_COUNT: usize = 8;

    let mut last_7_days = Vec::with_capacity(7);
    for offset in (0..7).rev() {
        let date = today - Duration::days(offset as i64);
        let consumed = book.total_calories(&date_key(date));
        last_7_days.push(DailyPoint {
            date: date_key(date),
            consumed,
            target: target_calories,
            remaining: target_calories.saturating_sub(consumed),
        });
    }

    let current_week_start = week_start(today);
    let mut weekly_totals = Vec::with_capacity(WEEK_COUNT);
    let mut weekly_averages = Vec::with_capacity(WEEK_COUNT);

    for offset in (0..WEEK_COUNT).rev() {
        let start = current_week_start - Duration::weeks(offset as i64);
        let end = start + Duration::days(6);

        let mut consumed = 0i64;
        let mut entries = 0usize;
        for day_offset in 0..7 {
            let key = date_key(start + Duration::days(day_offset));
            consumed = consumed.saturating_add(book.total_calories(&key));
            entries += book.entries(&key).len();
        }

        let days_counted = if today < start {
            0
        } else if today > end {
            7
        } else {
            (today - start).num_days() as u8 + 1
        };

        let denom = if days_counted == 0 { 1.0 } else { f64::from(days_counted) };
        let avg_consumed = consumed as f64 / denom;

        weekly_totals.push(WeeklyPoint {
            week: week_label(start),
            start_date: date_key(start),
            end_date: date_key(end),
            consumed,
            entries,
        });

        weekly_averages.push(WeeklyAveragePoint {
            week: week_label(start),
            days_counted,
            avg_consumed,
            trend: weekly_trend(avg_consumed.round() as i64, target_calories),
        });
    }

    StatsResponse {
        last_7_days,
        weekly_totals,
        weekly_averages,
    }
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

fn week_label(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}
