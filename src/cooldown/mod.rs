//! Cooldown (debounce) for repeated notifications.
//!
//! A broadcast is suppressed when a notification with the same title and
//! message was dispatched less than one window ago.

mod tracker;

pub use tracker::{CooldownDecision, CooldownStats, CooldownTracker, NotificationIdentity};
