use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;

use crate::metrics::{DeliveryMetrics, SubscriptionMetrics};
use crate::push::PushSender;
use crate::subscription::{Subscription, SubscriptionRegistry};

use super::types::{BroadcastReport, DeliveryOutcome};

/// Default maximum number of concurrent push sends per broadcast
pub const DEFAULT_MAX_CONCURRENT_SENDS: usize = 100;

/// Statistics for the notification dispatcher
#[derive(Debug, Default)]
pub struct DispatcherStats {
    /// Broadcasts that reached at least one subscriber
    pub total_broadcasts: AtomicU64,
    /// Successful deliveries
    pub total_delivered: AtomicU64,
    /// Failed deliveries (transient and terminal)
    pub total_failed: AtomicU64,
    /// Subscriptions pruned after a terminal failure
    pub total_pruned: AtomicU64,
}

impl DispatcherStats {
    pub fn snapshot(&self) -> DispatcherStatsSnapshot {
        DispatcherStatsSnapshot {
            total_broadcasts: self.total_broadcasts.load(Ordering::Relaxed),
            total_delivered: self.total_delivered.load(Ordering::Relaxed),
            total_failed: self.total_failed.load(Ordering::Relaxed),
            total_pruned: self.total_pruned.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of dispatcher statistics
#[derive(Debug, Clone, Serialize)]
pub struct DispatcherStatsSnapshot {
    pub total_broadcasts: u64,
    pub total_delivered: u64,
    pub total_failed: u64,
    pub total_pruned: u64,
}

/// Fans a payload out to a set of subscriptions through a `PushSender`
pub struct NotificationDispatcher {
    registry: Arc<SubscriptionRegistry>,
    sender: Arc<dyn PushSender>,
    max_concurrent_sends: usize,
    stats: DispatcherStats,
}

impl NotificationDispatcher {
    pub fn new(registry: Arc<SubscriptionRegistry>, sender: Arc<dyn PushSender>) -> Self {
        Self::with_concurrency(registry, sender, DEFAULT_MAX_CONCURRENT_SENDS)
    }

    pub fn with_concurrency(
        registry: Arc<SubscriptionRegistry>,
        sender: Arc<dyn PushSender>,
        max_concurrent_sends: usize,
    ) -> Self {
        Self {
            registry,
            sender,
            max_concurrent_sends: max_concurrent_sends.max(1),
            stats: DispatcherStats::default(),
        }
    }

    /// Get dispatcher statistics
    pub fn stats(&self) -> DispatcherStatsSnapshot {
        self.stats.snapshot()
    }

    /// Deliver `payload` to every subscription and wait for all deliveries to settle.
    ///
    /// A failed delivery never affects the others. Subscriptions whose push
    /// service answered 404 or 410 are removed from the registry once every
    /// delivery has settled; other failures leave the subscription in place.
    #[tracing::instrument(
        name = "dispatcher.broadcast",
        skip(self, payload, subscriptions),
        fields(subscriber_count = subscriptions.len())
    )]
    pub async fn broadcast(
        &self,
        payload: &str,
        subscriptions: &[Arc<Subscription>],
    ) -> BroadcastReport {
        if subscriptions.is_empty() {
            tracing::debug!("No subscriptions to notify");
            return BroadcastReport::default();
        }

        let started = Instant::now();
        let outcomes = self.send_to_subscriptions(payload, subscriptions).await;
        let mut report = BroadcastReport::from_outcomes(outcomes);

        // Outcomes are index-aligned with `subscriptions`
        let gone = report
            .outcomes
            .iter()
            .zip(subscriptions)
            .filter(|(outcome, _)| outcome.is_terminal());
        for (outcome, sent) in gone {
            if self.registry.remove_if_present(sent) {
                report.pruned += 1;
                tracing::info!(
                    endpoint = %outcome.endpoint,
                    "Removed subscription rejected as gone by push service"
                );
            }
        }

        // Update stats
        self.stats.total_broadcasts.fetch_add(1, Ordering::Relaxed);
        self.stats
            .total_delivered
            .fetch_add(report.delivered as u64, Ordering::Relaxed);
        self.stats
            .total_failed
            .fetch_add(report.failed() as u64, Ordering::Relaxed);
        self.stats
            .total_pruned
            .fetch_add(report.pruned as u64, Ordering::Relaxed);

        // Update Prometheus metrics
        for outcome in &report.outcomes {
            DeliveryMetrics::record_outcome(outcome.outcome);
        }
        DeliveryMetrics::observe_broadcast_duration(started.elapsed().as_secs_f64());
        if report.pruned > 0 {
            SubscriptionMetrics::record_pruned(report.pruned as u64);
            SubscriptionMetrics::set_active(self.registry.len());
        }

        tracing::info!(
            delivered = report.delivered,
            transient_failures = report.transient_failures,
            terminal_failures = report.terminal_failures,
            pruned = report.pruned,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Broadcast settled"
        );

        report
    }

    /// Send to all subscriptions concurrently with bounded parallelism.
    /// Outcomes are returned in the order of `subscriptions`.
    async fn send_to_subscriptions(
        &self,
        payload: &str,
        subscriptions: &[Arc<Subscription>],
    ) -> Vec<DeliveryOutcome> {
        let sender = self.sender.as_ref();
        let mut slots: Vec<Option<DeliveryOutcome>> = vec![None; subscriptions.len()];
        let mut futures = FuturesUnordered::new();
        let mut pending = 0;

        for (index, subscription) in subscriptions.iter().enumerate() {
            futures.push(async move {
                let result = sender.send(subscription, payload).await;
                if let Err(ref e) = result {
                    tracing::warn!(
                        endpoint = %subscription.endpoint,
                        error = %e,
                        terminal = e.is_terminal(),
                        "Push delivery failed"
                    );
                }
                (index, DeliveryOutcome::from_result(&subscription.endpoint, result))
            });
            pending += 1;

            // Process completed futures when we hit the concurrency limit
            while pending >= self.max_concurrent_sends {
                match futures.next().await {
                    Some((index, outcome)) => {
                        pending -= 1;
                        slots[index] = Some(outcome);
                    }
                    None => break,
                }
            }
        }

        // Process remaining futures
        while let Some((index, outcome)) = futures.next().await {
            slots[index] = Some(outcome);
        }

        slots.into_iter().flatten().collect()
    }
}
