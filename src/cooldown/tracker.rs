//! Per-notification cooldown tracker

use std::fmt;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;
use tokio::time::Instant;

/// Cooldown key for a notification, derived from its content
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NotificationIdentity(String);

impl NotificationIdentity {
    /// Build the identity of a `{title, message}` notification.
    ///
    /// The title is length-prefixed so that `("ab", "c")` and `("a", "bc")`
    /// map to different identities.
    pub fn from_content(title: &str, message: &str) -> Self {
        Self(format!("{}:{}\n{}", title.len(), title, message))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotificationIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of a cooldown check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownDecision {
    /// Broadcast may proceed; `now` has been recorded
    Allowed,
    /// A broadcast with the same identity happened too recently
    Suppressed { remaining: Duration },
}

impl CooldownDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, CooldownDecision::Allowed)
    }
}

/// Cooldown tracker statistics
#[derive(Debug, Clone, Serialize)]
pub struct CooldownStats {
    pub tracked_identities: usize,
    pub window_seconds: u64,
}

/// Remembers when each notification identity was last broadcast.
///
/// Entries are only written when a broadcast is allowed, and are never
/// evicted; the key space is expected to stay small.
pub struct CooldownTracker {
    /// identity -> last dispatch instant
    last_dispatch: DashMap<NotificationIdentity, Instant>,
    window: Duration,
}

impl CooldownTracker {
    pub fn new(window: Duration) -> Self {
        Self {
            last_dispatch: DashMap::new(),
            window,
        }
    }

    /// Configured cooldown window
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Check the configured window against the current time
    pub fn check(&self, identity: &NotificationIdentity) -> CooldownDecision {
        self.try_acquire(identity, Instant::now(), self.window)
    }

    /// Atomic check-and-set.
    ///
    /// The comparison and the timestamp update run under the shard write lock
    /// held by the entry, so two racing callers with the same identity cannot
    /// both be allowed within one window.
    pub fn try_acquire(
        &self,
        identity: &NotificationIdentity,
        now: Instant,
        window: Duration,
    ) -> CooldownDecision {
        match self.last_dispatch.entry(identity.clone()) {
            Entry::Occupied(mut entry) => {
                let elapsed = now.saturating_duration_since(*entry.get());
                if elapsed >= window {
                    entry.insert(now);
                    CooldownDecision::Allowed
                } else {
                    CooldownDecision::Suppressed {
                        remaining: window - elapsed,
                    }
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(now);
                CooldownDecision::Allowed
            }
        }
    }

    /// Number of identities with a recorded dispatch
    pub fn len(&self) -> usize {
        self.last_dispatch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_dispatch.is_empty()
    }

    pub fn stats(&self) -> CooldownStats {
        CooldownStats {
            tracked_identities: self.last_dispatch.len(),
            window_seconds: self.window.as_secs(),
        }
    }
}
