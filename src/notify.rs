use chrono::Local;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

const FEED_CAPACITY: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Normal,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub severity: Severity,
    pub at: String,
}

/// Fire-and-forget user notifications.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, title: &str, body: &str, severity: Severity);
}

/// Logs every notification and keeps the most recent ones for the client to
/// poll.
#[derive(Debug, Default)]
pub struct NotificationFeed {
    recent: Mutex<VecDeque<Notification>>,
    muted: AtomicBool,
}

impl NotificationFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Muted feeds still log but stop queueing.
    pub fn set_muted(&self, muted: bool) {
        self.muted.store(muted, Ordering::Relaxed);
    }

    pub fn recent(&self) -> Vec<Notification> {
        match self.recent.lock() {
            Ok(queue) => queue.iter().rev().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().iter().rev().cloned().collect(),
        }
    }
}

impl NotificationSink for NotificationFeed {
    fn notify(&self, title: &str, body: &str, severity: Severity) {
        match severity {
            Severity::Normal => info!(title, body, "notification"),
            Severity::Destructive => warn!(title, body, "notification"),
        }

        if self.muted.load(Ordering::Relaxed) {
            return;
        }

        let notification = Notification {
            title: title.to_string(),
            body: body.to_string(),
            severity,
            at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        };
        let mut queue = match self.recent.lock() {
            Ok(queue) => queue,
            Err(poisoned) => poisoned.into_inner(),
        };
        if queue.len() == FEED_CAPACITY {
            queue.pop_front();
        }
        queue.push_back(notification);
    }
}
