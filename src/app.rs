use crate::handlers;
use crate::state::AppState;
use axum::{routing::{delete, get, put}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/profile", get(handlers::get_profile).put(handlers::put_profile))
        .route("/api/profile/targets", put(handlers::put_targets))
        .route("/api/target", get(handlers::get_target))
        .route("/api/lookup", get(handlers::lookup))
        .route("/api/foods", get(handlers::get_foods).post(handlers::add_food))
        .route("/api/foods/:id", delete(handlers::delete_food))
        .route("/api/summary", get(handlers::get_summary))
        .route("/api/stats", get(handlers::get_stats))
        .route(
            "/api/preferences",
            get(handlers::get_preferences).put(handlers::put_preferences),
        )
        .route("/api/notifications", get(handlers::get_notifications))
        .with_state(state)
}
