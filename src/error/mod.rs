use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Client-facing message for a rejected subscription body
pub const INVALID_SUBSCRIPTION_MESSAGE: &str = "Invalid subscription object";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid subscription: {0}")]
    InvalidSubscription(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Dispatch setup failed: {0}")]
    DispatchSetup(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::DispatchSetup(format!("payload serialization failed: {}", e))
    }
}

/// Check if running in production mode (based on RUN_MODE env var)
fn is_production() -> bool {
    std::env::var("RUN_MODE")
        .map(|m| m == "production" || m == "prod")
        .unwrap_or(false)
}

impl AppError {
    /// Status, log code and JSON body. `production` hides internal details.
    fn render(&self, production: bool) -> (StatusCode, &'static str, serde_json::Value) {
        match self {
            AppError::InvalidSubscription(_) => (
                StatusCode::BAD_REQUEST,
                "INVALID_SUBSCRIPTION",
                json!({ "message": INVALID_SUBSCRIPTION_MESSAGE }),
            ),
            AppError::InvalidRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "INVALID_REQUEST",
                json!({ "success": false, "error": msg }),
            ),
            AppError::DispatchSetup(msg) | AppError::Internal(msg) => {
                let client_msg = if production {
                    "Internal server error".to_string()
                } else {
                    msg.clone()
                };
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DISPATCH_ERROR",
                    json!({ "success": false, "error": client_msg }),
                )
            }
            AppError::Config(e) => {
                let client_msg = if production {
                    "Configuration error".to_string()
                } else {
                    e.to_string()
                };
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIG_ERROR",
                    json!({ "success": false, "error": client_msg }),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let log_message = self.to_string();
        let (status, code, body) = self.render(is_production());

        // Always log the detailed error server-side
        if status.is_server_error() {
            tracing::error!(
                code = %code,
                status = %status.as_u16(),
                message = %log_message,
                "API error"
            );
        } else {
            tracing::warn!(
                code = %code,
                status = %status.as_u16(),
                message = %log_message,
                "Rejected request"
            );
        }

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
