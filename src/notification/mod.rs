//! Notification fan-out.
//!
//! - `NotificationDispatcher`: concurrent delivery to a registry snapshot, with
//!   pruning of subscriptions the push service reports as gone
//! - `NotificationService`: cooldown check, snapshot and dispatch for a trigger

mod dispatcher;
mod service;
mod types;

pub use dispatcher::{
    DispatcherStats, DispatcherStatsSnapshot, NotificationDispatcher, DEFAULT_MAX_CONCURRENT_SENDS,
};
pub use service::{NotificationService, ServiceStats};
pub use types::{
    BroadcastReport, DeliveryKind, DeliveryOutcome, FailureReason, NotificationPayload,
    SettledStatus, TriggerOutcome,
};
