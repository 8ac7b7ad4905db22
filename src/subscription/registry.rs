use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::{AppError, Result};

use super::types::{Registration, RegistryStats, Subscription, Unregistration};

/// Stored registry entry
struct RegistryEntry {
    subscription: Arc<Subscription>,
    /// Registration order, kept across metadata replacement
    seq: u64,
    registered_at: DateTime<Utc>,
}

/// Manages all active push subscriptions, keyed by endpoint
pub struct SubscriptionRegistry {
    /// endpoint -> entry
    subscriptions: DashMap<String, RegistryEntry>,
    next_seq: AtomicU64,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self {
            subscriptions: DashMap::new(),
            next_seq: AtomicU64::new(0),
        }
    }

    /// Register a subscription, replacing any previous one with the same endpoint
    pub fn register(&self, subscription: Subscription) -> Result<Registration> {
        if !subscription.has_endpoint() {
            return Err(AppError::InvalidSubscription(
                "subscription endpoint is missing or empty".to_string(),
            ));
        }

        let endpoint = subscription.endpoint.clone();
        let subscription = Arc::new(subscription);
        let mut replaced = false;

        self.subscriptions
            .entry(endpoint.clone())
            .and_modify(|entry| {
                entry.subscription = subscription.clone();
                replaced = true;
            })
            .or_insert_with(|| RegistryEntry {
                subscription: subscription.clone(),
                seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
                registered_at: Utc::now(),
            });

        let total = self.subscriptions.len();
        tracing::info!(endpoint = %endpoint, replaced, total, "Subscription registered");

        Ok(Registration { replaced, total })
    }

    /// Unregister a subscription. Unknown endpoints are not an error.
    pub fn unregister(&self, endpoint: &str) -> Unregistration {
        let removed = self.subscriptions.remove(endpoint).is_some();
        let total = self.subscriptions.len();

        if removed {
            tracing::info!(endpoint = %endpoint, total, "Subscription unregistered");
        } else {
            tracing::debug!(endpoint = %endpoint, "Unregister for unknown endpoint");
        }

        Unregistration { removed, total }
    }

    /// Drop a subscription whose endpoint the push service reported as gone.
    ///
    /// Only removes the entry if it still holds `sent`; a re-subscription
    /// that replaced it in the meantime is kept.
    pub fn remove_if_present(&self, sent: &Arc<Subscription>) -> bool {
        self.subscriptions
            .remove_if(sent.endpoint.as_str(), |_, entry| {
                Arc::ptr_eq(&entry.subscription, sent)
            })
            .is_some()
    }

    /// Copy of all subscriptions in registration order.
    ///
    /// Shards are read one at a time, so registrations racing with the copy
    /// may or may not be included.
    pub fn snapshot(&self) -> Vec<Arc<Subscription>> {
        let mut entries: Vec<(u64, Arc<Subscription>)> = self
            .subscriptions
            .iter()
            .map(|r| (r.value().seq, r.value().subscription.clone()))
            .collect();
        entries.sort_unstable_by_key(|(seq, _)| *seq);
        entries.into_iter().map(|(_, sub)| sub).collect()
    }

    /// Get a subscription by endpoint
    pub fn get(&self, endpoint: &str) -> Option<Arc<Subscription>> {
        self.subscriptions
            .get(endpoint)
            .map(|entry| entry.subscription.clone())
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Get statistics
    pub fn stats(&self) -> RegistryStats {
        let mut oldest: Option<DateTime<Utc>> = None;
        let mut newest: Option<DateTime<Utc>> = None;

        for entry in self.subscriptions.iter() {
            let at = entry.value().registered_at;
            oldest = Some(oldest.map_or(at, |o| o.min(at)));
            newest = Some(newest.map_or(at, |n| n.max(at)));
        }

        RegistryStats {
            total_subscriptions: self.subscriptions.len(),
            oldest_registration: oldest,
            newest_registration: newest,
        }
    }
}

impl Default for SubscriptionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
