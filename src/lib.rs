pub mod app;
pub mod config;
pub mod convert;
pub mod energy;
pub mod errors;
pub mod food_log;
pub mod handlers;
pub mod lookup;
pub mod models;
pub mod notify;
pub mod remote;
pub mod state;
pub mod stats;
pub mod storage;
pub mod summary;
pub mod trend;

pub use app::router;
pub use config::{Config, LookupSource};
pub use convert::calories_for;
pub use energy::{daily_target, energy_breakdown};
pub use errors::{AppError, TrackerError};
pub use lookup::{FoodResolver, FoodTable};
pub use state::AppState;
pub use storage::JsonStore;
pub use trend::weekly_trend;
