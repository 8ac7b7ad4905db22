//! API layer - HTTP endpoint handlers organized by domain.

mod health;
mod metrics;
mod routes;
mod subscription;
mod vapid;

pub use health::{health, stats, HealthResponse};
pub use metrics::prometheus_metrics;
pub use routes::api_routes;
pub use subscription::{subscribe, unsubscribe, MessageResponse, UnsubscribeRequest};
pub use vapid::{vapid_public_key, VapidPublicKeyResponse};
