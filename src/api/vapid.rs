//! VAPID public key endpoint

use axum::{extract::State, Json};
use serde::Serialize;

use crate::server::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VapidPublicKeyResponse {
    pub public_key: String,
}

/// GET /vapid-public-key
///
/// Browsers pass this key as `applicationServerKey` when subscribing.
pub async fn vapid_public_key(State(state): State<AppState>) -> Json<VapidPublicKeyResponse> {
    Json(VapidPublicKeyResponse {
        public_key: state.settings.vapid.public_key.clone(),
    })
}
