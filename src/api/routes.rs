use axum::{
    routing::{get, post},
    Router,
};

use crate::server::AppState;
use crate::triggers::trigger_notification;

use super::health::{health, stats};
use super::metrics::prometheus_metrics;
use super::subscription::{subscribe, unsubscribe};
use super::vapid::vapid_public_key;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health, stats & metrics
        .route("/health", get(health))
        .route("/stats", get(stats))
        .route("/metrics", get(prometheus_metrics))
        // Subscriptions
        .route("/vapid-public-key", get(vapid_public_key))
        .route("/subscribe", post(subscribe))
        .route("/unsubscribe", post(unsubscribe))
        // Notifications
        .route("/trigger-notification", post(trigger_notification))
}
