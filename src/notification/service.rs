//! Notification service: owns the registry, cooldown tracker and dispatcher
//! and implements the subscribe / unsubscribe / trigger flows.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::config::Settings;
use crate::cooldown::{CooldownDecision, CooldownStats, CooldownTracker, NotificationIdentity};
use crate::error::Result;
use crate::metrics::{SubscriptionMetrics, TriggerMetrics};
use crate::push::PushSender;
use crate::subscription::{
    Registration, RegistryStats, Subscription, SubscriptionRegistry, Unregistration,
};

use super::dispatcher::{DispatcherStatsSnapshot, NotificationDispatcher};
use super::types::{NotificationPayload, TriggerOutcome};

/// Combined statistics for the `/stats` endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStats {
    pub subscriptions: RegistryStats,
    pub cooldown: CooldownStats,
    pub dispatcher: DispatcherStatsSnapshot,
}

pub struct NotificationService {
    registry: Arc<SubscriptionRegistry>,
    cooldown: Arc<CooldownTracker>,
    dispatcher: Arc<NotificationDispatcher>,
}

impl NotificationService {
    pub fn new(
        registry: Arc<SubscriptionRegistry>,
        cooldown: Arc<CooldownTracker>,
        dispatcher: Arc<NotificationDispatcher>,
    ) -> Self {
        Self {
            registry,
            cooldown,
            dispatcher,
        }
    }

    /// Build a service with empty stores, configured from settings
    pub fn from_settings(settings: &Settings, sender: Arc<dyn PushSender>) -> Self {
        let registry = Arc::new(SubscriptionRegistry::new());
        let cooldown = Arc::new(CooldownTracker::new(Duration::from_secs(
            settings.cooldown.window_seconds,
        )));
        let dispatcher = Arc::new(NotificationDispatcher::with_concurrency(
            registry.clone(),
            sender,
            settings.dispatch.max_concurrent_sends,
        ));

        Self::new(registry, cooldown, dispatcher)
    }

    pub fn registry(&self) -> &Arc<SubscriptionRegistry> {
        &self.registry
    }

    pub fn cooldown(&self) -> &Arc<CooldownTracker> {
        &self.cooldown
    }

    pub fn dispatcher(&self) -> &Arc<NotificationDispatcher> {
        &self.dispatcher
    }

    pub fn subscribe(&self, subscription: Subscription) -> Result<Registration> {
        match self.registry.register(subscription) {
            Ok(registration) => {
                SubscriptionMetrics::record_registered();
                SubscriptionMetrics::set_active(registration.total);
                Ok(registration)
            }
            Err(e) => {
                SubscriptionMetrics::record_rejected();
                Err(e)
            }
        }
    }

    pub fn unsubscribe(&self, endpoint: &str) -> Unregistration {
        let result = self.registry.unregister(endpoint);
        if result.removed {
            SubscriptionMetrics::record_unregistered();
        }
        SubscriptionMetrics::set_active(result.total);
        result
    }

    /// Broadcast `{title, message}` to every subscriber unless the same
    /// notification went out less than one cooldown window ago.
    #[tracing::instrument(name = "service.trigger", skip(self, title, message))]
    pub async fn trigger(&self, title: &str, message: &str) -> Result<TriggerOutcome> {
        let payload = match build_payload(title, message) {
            Ok(payload) => payload,
            Err(e) => {
                TriggerMetrics::record_failed();
                return Err(e);
            }
        };

        let identity = NotificationIdentity::from_content(title, message);
        if let CooldownDecision::Suppressed { remaining } = self.cooldown.check(&identity) {
            tracing::info!(
                remaining_ms = remaining.as_millis() as u64,
                "Notification skipped (cooldown period)"
            );
            TriggerMetrics::record_skipped();
            return Ok(TriggerOutcome::Skipped { remaining });
        }

        let subscriptions = self.registry.snapshot();
        if subscriptions.is_empty() {
            tracing::info!("No subscriptions to notify");
            TriggerMetrics::record_no_subscribers();
            return Ok(TriggerOutcome::NoSubscribers);
        }

        let report = self.dispatcher.broadcast(&payload, &subscriptions).await;
        TriggerMetrics::record_dispatched();

        Ok(TriggerOutcome::Dispatched(report))
    }

    pub fn stats(&self) -> ServiceStats {
        ServiceStats {
            subscriptions: self.registry.stats(),
            cooldown: self.cooldown.stats(),
            dispatcher: self.dispatcher.stats(),
        }
    }
}

/// JSON body pushed to subscribers. Built before the cooldown is consulted so
/// a failure here never uses up the window.
fn build_payload(title: &str, message: &str) -> Result<String> {
    Ok(serde_json::to_string(&NotificationPayload::new(title, message))?)
}
