use calorie_tracker::models::{FoodLogBook, Preferences, ProfileRecord};
use calorie_tracker::remote::RemoteFoodSearch;
use calorie_tracker::storage::{FOOD_LOG_KEY, PREFERENCES_KEY, PROFILE_KEY};
use calorie_tracker::{router, AppState, Config, FoodResolver, FoodTable, JsonStore};
use std::net::SocketAddr;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    let store = JsonStore::open(&config.data_dir).await?;

    let profile: ProfileRecord = store.load(PROFILE_KEY).await;
    let food_log: FoodLogBook = store.load(FOOD_LOG_KEY).await;
    let preferences: Preferences = store.load(PREFERENCES_KEY).await;

    let table = FoodTable::new(config.fold_accents);
    let remote = if config.lookup_source.uses_remote() {
        Some(RemoteFoodSearch::new(config.search_url.clone(), config.search_timeout)?)
    } else {
        None
    };
    info!(
        source = ?config.lookup_source,
        fold_accents = config.fold_accents,
        search_url = %config.search_url,
        "food lookup configured"
    );
    let resolver = FoodResolver::new(table, remote, config.lookup_source);

    info!(
        data_dir = %store.dir().display(),
        foods = table.len(),
        days = food_log.days.len(),
        "loaded tracker data"
    );

    let state = AppState::new(store, profile, food_log, preferences, resolver);
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
