// Supporting modules
pub mod config;
pub mod error;
pub mod metrics;

// Domain layer (business logic)
pub mod cooldown;
pub mod notification;
pub mod push;
pub mod subscription;

// Application layer
pub mod api;
pub mod server;
pub mod triggers;
