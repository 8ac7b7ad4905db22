//! HTTP notification trigger handlers

mod handlers;
mod models;

pub use handlers::trigger_notification;
pub use models::{TriggerNotificationRequest, TriggerNotificationResponse};
