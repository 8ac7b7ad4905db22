//! Subscription endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::server::AppState;
use crate::subscription::Subscription;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Unsubscribe body; only the endpoint is looked at
#[derive(Debug, Deserialize)]
pub struct UnsubscribeRequest {
    #[serde(default)]
    pub endpoint: Option<String>,
}

/// POST /subscribe
///
/// Stores the browser's push subscription. Posting an endpoint that is already
/// registered replaces its keys.
#[tracing::instrument(name = "http.subscribe", skip(state, body))]
pub async fn subscribe(
    State(state): State<AppState>,
    body: std::result::Result<Json<Subscription>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    let Json(subscription) =
        body.map_err(|rejection| AppError::InvalidSubscription(rejection.body_text()))?;

    state.service.subscribe(subscription)?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Subscribed successfully")),
    ))
}

/// POST /unsubscribe
///
/// Always succeeds, whether or not the endpoint was registered.
#[tracing::instrument(name = "http.unsubscribe", skip(state, body))]
pub async fn unsubscribe(
    State(state): State<AppState>,
    body: std::result::Result<Json<UnsubscribeRequest>, JsonRejection>,
) -> Json<MessageResponse> {
    match body {
        Ok(Json(UnsubscribeRequest {
            endpoint: Some(endpoint),
        })) => {
            state.service.unsubscribe(&endpoint);
        }
        Ok(_) => tracing::debug!("Unsubscribe without endpoint"),
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "Unreadable unsubscribe body")
        }
    }

    Json(MessageResponse::new("Unsubscribed successfully"))
}
