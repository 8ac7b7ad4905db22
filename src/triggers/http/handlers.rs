//! HTTP notification handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::error::{AppError, Result};
use crate::notification::TriggerOutcome;
use crate::server::AppState;

use super::models::{TriggerNotificationRequest, TriggerNotificationResponse};

/// POST /trigger-notification
///
/// Broadcasts `{title, message}` to every registered subscription. Repeats of
/// the same notification within the cooldown window are skipped. Individual
/// delivery failures are reported per subscriber and never fail the request.
/// An unreadable body is answered with 400 `{success: false, error}`.
#[tracing::instrument(name = "http.trigger_notification", skip(state, body))]
pub async fn trigger_notification(
    State(state): State<AppState>,
    body: std::result::Result<Json<TriggerNotificationRequest>, JsonRejection>,
) -> Result<Json<TriggerNotificationResponse>> {
    let Json(request) =
        body.map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))?;
    tracing::debug!(title = %request.title, "Trigger requested");

    let outcome = state
        .service
        .trigger(&request.title, &request.message)
        .await?;

    let response = match outcome {
        TriggerOutcome::Skipped { .. } => TriggerNotificationResponse::skipped(),
        TriggerOutcome::NoSubscribers => TriggerNotificationResponse::no_subscribers(),
        TriggerOutcome::Dispatched(report) => {
            TriggerNotificationResponse::dispatched(report.outcomes)
        }
    };

    Ok(Json(response))
}
