use crate::lookup::FoodResolver;
use crate::models::{FoodLogBook, Preferences, ProfileRecord};
use crate::notify::{NotificationFeed, NotificationSink, Severity};
use crate::storage::JsonStore;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub store: JsonStore,
    pub profile: Arc<Mutex<ProfileRecord>>,
    pub food_log: Arc<Mutex<FoodLogBook>>,
    pub preferences: Arc<Mutex<Preferences>>,
    pub resolver: Arc<FoodResolver>,
    pub notifications: Arc<NotificationFeed>,
}

impl AppState {
    pub fn new(
        store: JsonStore,
        profile: ProfileRecord,
        food_log: FoodLogBook,
        preferences: Preferences,
        resolver: FoodResolver,
    ) -> Self {
        let notifications = NotificationFeed::new();
        notifications.set_muted(!preferences.notifications);
        Self {
            store,
            profile: Arc::new(Mutex::new(profile)),
            food_log: Arc::new(Mutex::new(food_log)),
            preferences: Arc::new(Mutex::new(preferences)),
            resolver: Arc::new(resolver),
            notifications: Arc::new(notifications),
        }
    }

    pub fn notify(&self, title: &str, body: &str, severity: Severity) {
        self.notifications.notify(title, body, severity);
    }
}
