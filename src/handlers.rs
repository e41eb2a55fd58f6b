use crate::energy::{effective_target, energy_breakdown};
use crate::errors::{AppError, TrackerError};
use crate::food_log::{date_key, parse_date_key, prepare_food};
use crate::models::{
    AddFoodRequest, DailyTarget, DateQuery, DayLog, DayLogResponse, FoodLogEntry, FoodRecord,
    LookupQuery, Preferences, ProfileRecord, ProfileResponse, StatsResponse, SummaryResponse,
    TargetsRequest, UserProfile,
};
use crate::notify::{Notification, Severity};
use crate::state::AppState;
use crate::stats::build_stats;
use crate::storage::{FOOD_LOG_KEY, PREFERENCES_KEY, PROFILE_KEY};
use crate::summary::build_summary;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Local;
use tracing::info;

pub async fn get_profile(State(state): State<AppState>) -> Json<ProfileResponse> {
    let record = state.profile.lock().await;
    Json(to_profile_response(&record))
}

pub async fn put_profile(
    State(state): State<AppState>,
    Json(profile): Json<UserProfile>,
) -> Result<Json<ProfileResponse>, AppError> {
    let mut record = state.profile.lock().await;
    let mut updated = record.clone();
    updated.profile = profile.sanitized();
    state.store.persist(PROFILE_KEY, &updated).await?;
    *record = updated;

    let response = to_profile_response(&record);
    info!(
        weight_kg = record.profile.weight_kg,
        goal = record.profile.goal.as_str(),
        target = response.target.calories,
        "profile updated"
    );
    state.notify(
        "Perfil actualizado",
        &format!("Tu objetivo diario es de {} kcal", response.target.calories),
        Severity::Normal,
    );
    Ok(Json(response))
}

pub async fn put_targets(
    State(state): State<AppState>,
    Json(payload): Json<TargetsRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    if let Some(Some(target)) = &payload.target_override {
        if target.calories <= 0 {
            return Err(TrackerError::Validation(
                "target calories must be positive".to_string(),
            )
            .into());
        }
    }

    let mut record = state.profile.lock().await;
    let mut updated = record.clone();
    if let Some(target_override) = payload.target_override {
        updated.target_override = target_override;
    }
    if let Some(reminder) = payload.reminder {
        updated.reminder = reminder.filter(|text| !text.trim().is_empty());
    }
    state.store.persist(PROFILE_KEY, &updated).await?;
    *record = updated;

    let response = to_profile_response(&record);
    state.notify(
        "Objetivo actualizado",
        &format!("Cambiaste tu objetivo de calorías a {}", response.target.calories),
        Severity::Normal,
    );
    Ok(Json(response))
}

pub async fn get_target(State(state): State<AppState>) -> Json<DailyTarget> {
    let record = state.profile.lock().await;
    Json(effective_target(&record))
}

pub async fn lookup(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<FoodRecord>, AppError> {
    match state.resolver.resolve(&query.q).await {
        Ok(record) => Ok(Json(record)),
        Err(err) => Err(report(&state, err)),
    }
}

pub async fn get_foods(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<DayLogResponse>, AppError> {
    let date = resolve_date(query.date.as_deref())?;
    let book = state.food_log.lock().await;
    let meals = book
        .day(&date)
        .map(DayLog::meal_sections)
        .unwrap_or_else(|| DayLog::default().meal_sections());
    Ok(Json(DayLogResponse {
        entries: book.entries(&date).to_vec(),
        total_calories: book.total_calories(&date),
        meals,
        date,
    }))
}

pub async fn add_food(
    State(state): State<AppState>,
    Json(payload): Json<AddFoodRequest>,
) -> Result<(StatusCode, Json<FoodLogEntry>), AppError> {
    let date = resolve_date(payload.date.as_deref())?;

    // Resolve before locking; the remote search may take a while.
    let mut food = match prepare_food(&state.resolver, &payload.name, payload.weight_grams).await {
        Ok(food) => food,
        Err(err) => return Err(report(&state, err)),
    };
    food.meal = payload.meal;

    // The in-memory log only changes once the new version is on disk.
    let mut book = state.food_log.lock().await;
    let mut updated = book.clone();
    let entry = updated.day_mut(&date).append(food, Local::now());
    state.store.persist(FOOD_LOG_KEY, &updated).await?;
    *book = updated;
    drop(book);

    info!(date = %date, id = entry.id, kcal = entry.calories_consumed, "food added");
    state.notify(
        "Alimento añadido",
        &format!("{} ({} kcal) ha sido añadido", entry.name, entry.calories_consumed),
        Severity::Normal,
    );
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn delete_food(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<DateQuery>,
) -> Result<StatusCode, AppError> {
    let date = resolve_date(query.date.as_deref())?;

    let mut book = state.food_log.lock().await;
    let mut updated = book.clone();
    let Some(removed) = updated.days.get_mut(&date).and_then(|day| day.remove(id)) else {
        return Err(AppError::not_found(format!("no entry {id} on {date}")));
    };
    state.store.persist(FOOD_LOG_KEY, &updated).await?;
    *book = updated;
    drop(book);

    info!(date = %date, id, kcal = removed.calories_consumed, "food removed");
    state.notify(
        "Alimento eliminado",
        "El alimento ha sido eliminado de tu lista",
        Severity::Normal,
    );
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_summary(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<SummaryResponse>, AppError> {
    let date = resolve_date(query.date.as_deref())?;
    let target = effective_target(&*state.profile.lock().await);
    let book = state.food_log.lock().await;
    Ok(Json(build_summary(&date, target, book.day(&date))))
}

pub async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let target = effective_target(&*state.profile.lock().await);
    let book = state.food_log.lock().await;
    Json(build_stats(&book, target.calories))
}

pub async fn get_preferences(State(state): State<AppState>) -> Json<Preferences> {
    Json(*state.preferences.lock().await)
}

pub async fn put_preferences(
    State(state): State<AppState>,
    Json(preferences): Json<Preferences>,
) -> Result<Json<Preferences>, AppError> {
    let mut current = state.preferences.lock().await;
    state.store.persist(PREFERENCES_KEY, &preferences).await?;
    *current = preferences;
    state.notifications.set_muted(!preferences.notifications);
    Ok(Json(preferences))
}

pub async fn get_notifications(State(state): State<AppState>) -> Json<Vec<Notification>> {
    Json(state.notifications.recent())
}

fn to_profile_response(record: &ProfileRecord) -> ProfileResponse {
    let breakdown = energy_breakdown(&record.profile);
    ProfileResponse {
        profile: record.profile.sanitized(),
        target: record.target_override.unwrap_or(breakdown.target),
        bmr: breakdown.bmr,
        tdee: breakdown.tdee,
        target_override: record.target_override,
        reminder: record.reminder.clone(),
    }
}

/// Surfaces lookup failures to the user before turning them into a response.
fn report(state: &AppState, err: TrackerError) -> AppError {
    match &err {
        TrackerError::FoodNotFound(reason) => {
            state.notify("Alimento no encontrado", reason, Severity::Normal)
        }
        TrackerError::Network(reason) => {
            state.notify("Error de conexión", reason, Severity::Destructive)
        }
        TrackerError::Validation(_) => {}
    }
    err.into()
}

fn resolve_date(raw: Option<&str>) -> Result<String, AppError> {
    match raw.filter(|value| !value.trim().is_empty()) {
        Some(value) => Ok(date_key(parse_date_key(value)?)),
        None => Ok(today_string()),
    }
}

fn today_string() -> String {
    date_key(Local::now().date_naive())
}
