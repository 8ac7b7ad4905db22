//! Prometheus metrics for the push service.
//!
//! - Subscription metrics (active subscriptions, registrations, prunes)
//! - Trigger metrics (dispatched, skipped by cooldown, no subscribers)
//! - Delivery metrics (outcome per subscriber, broadcast duration)

mod helpers;

pub use helpers::{encode_metrics, DeliveryMetrics, SubscriptionMetrics, TriggerMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, register_int_gauge,
    Histogram, IntCounter, IntCounterVec, IntGauge,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "push";

lazy_static! {
    // ============================================================================
    // Subscription Metrics
    // ============================================================================

    /// Number of subscriptions currently registered
    pub static ref SUBSCRIPTIONS_ACTIVE: IntGauge = register_int_gauge!(
        format!("{}_subscriptions_active", METRIC_PREFIX),
        "Number of registered push subscriptions"
    ).unwrap();

    /// Registry mutations by operation
    pub static ref SUBSCRIPTION_OPERATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_subscription_operations_total", METRIC_PREFIX),
        "Subscription registry operations",
        &["operation"]
    ).unwrap();

    /// Subscriptions removed after the push service reported them gone
    pub static ref SUBSCRIPTIONS_PRUNED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_subscriptions_pruned_total", METRIC_PREFIX),
        "Subscriptions removed after a 404/410 from the push service"
    ).unwrap();

    // ============================================================================
    // Trigger Metrics
    // ============================================================================

    /// Trigger requests by result
    pub static ref TRIGGERS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_triggers_total", METRIC_PREFIX),
        "Notification trigger requests",
        &["result"]
    ).unwrap();

    // ============================================================================
    // Delivery Metrics
    // ============================================================================

    /// Per-subscriber deliveries by outcome
    pub static ref DELIVERIES_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_deliveries_total", METRIC_PREFIX),
        "Push deliveries by outcome",
        &["outcome"]
    ).unwrap();

    /// Time for a whole broadcast to settle
    pub static ref BROADCAST_DURATION: Histogram = register_histogram!(
        format!("{}_broadcast_duration_seconds", METRIC_PREFIX),
        "Time until every delivery of a broadcast settled",
        vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]
    ).unwrap();
}
