//! Metrics helper structs for convenient metric recording

use prometheus::{Encoder, TextEncoder};

use crate::notification::DeliveryKind;

use super::{
    BROADCAST_DURATION, DELIVERIES_TOTAL, SUBSCRIPTIONS_ACTIVE, SUBSCRIPTIONS_PRUNED_TOTAL,
    SUBSCRIPTION_OPERATIONS_TOTAL, TRIGGERS_TOTAL,
};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording subscription metrics
pub struct SubscriptionMetrics;

impl SubscriptionMetrics {
    pub fn set_active(count: usize) {
        SUBSCRIPTIONS_ACTIVE.set(count as i64);
    }

    pub fn record_registered() {
        SUBSCRIPTION_OPERATIONS_TOTAL
            .with_label_values(&["register"])
            .inc();
    }

    pub fn record_unregistered() {
        SUBSCRIPTION_OPERATIONS_TOTAL
            .with_label_values(&["unregister"])
            .inc();
    }

    pub fn record_rejected() {
        SUBSCRIPTION_OPERATIONS_TOTAL
            .with_label_values(&["rejected"])
            .inc();
    }

    pub fn record_pruned(count: u64) {
        SUBSCRIPTIONS_PRUNED_TOTAL.inc_by(count);
    }
}

/// Helper struct for recording trigger metrics
pub struct TriggerMetrics;

impl TriggerMetrics {
    pub fn record_dispatched() {
        TRIGGERS_TOTAL.with_label_values(&["dispatched"]).inc();
    }

    pub fn record_skipped() {
        TRIGGERS_TOTAL.with_label_values(&["skipped"]).inc();
    }

    pub fn record_no_subscribers() {
        TRIGGERS_TOTAL.with_label_values(&["no_subscribers"]).inc();
    }

    pub fn record_failed() {
        TRIGGERS_TOTAL.with_label_values(&["failed"]).inc();
    }
}

/// Helper struct for recording delivery metrics
pub struct DeliveryMetrics;

impl DeliveryMetrics {
    pub fn record_outcome(kind: DeliveryKind) {
        let label = match kind {
            DeliveryKind::Success => "success",
            DeliveryKind::TransientFailure => "transient_failure",
            DeliveryKind::TerminalFailure => "terminal_failure",
        };
        DELIVERIES_TOTAL.with_label_values(&[label]).inc();
    }

    pub fn observe_broadcast_duration(seconds: f64) {
        BROADCAST_DURATION.observe(seconds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_contains_recorded_metrics() {
        TriggerMetrics::record_skipped();
        DeliveryMetrics::record_outcome(DeliveryKind::TerminalFailure);
        SubscriptionMetrics::set_active(3);

        let output = encode_metrics().unwrap();
        assert!(output.contains("push_triggers_total"));
        assert!(output.contains("push_deliveries_total"));
        assert!(output.contains("push_subscriptions_active"));
    }
}
