use serde::{Deserialize, Serialize};

use crate::notification::DeliveryOutcome;

/// Request to broadcast a notification to all subscribers
#[derive(Debug, Clone, Deserialize)]
pub struct TriggerNotificationRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
}

/// Response for a trigger request
#[derive(Debug, Clone, Serialize)]
pub struct TriggerNotificationResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<DeliveryOutcome>>,
}

impl TriggerNotificationResponse {
    pub fn skipped() -> Self {
        Self {
            success: true,
            message: Some("Notification skipped (cooldown period)".to_string()),
            skipped: Some(true),
            results: None,
        }
    }

    pub fn no_subscribers() -> Self {
        Self {
            success: true,
            message: Some("No subscriptions to notify".to_string()),
            skipped: None,
            results: None,
        }
    }

    pub fn dispatched(results: Vec<DeliveryOutcome>) -> Self {
        Self {
            success: true,
            message: None,
            skipped: None,
            results: Some(results),
        }
    }
}
