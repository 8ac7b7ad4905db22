mod http;

pub use http::{trigger_notification, TriggerNotificationRequest, TriggerNotificationResponse};
