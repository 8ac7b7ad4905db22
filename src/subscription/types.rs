//! Push subscription records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Browser key material for payload encryption (RFC 8291)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionKeys {
    /// P-256 ECDH public key (base64url)
    #[serde(default)]
    pub p256dh: String,
    /// Shared auth secret (base64url)
    #[serde(default)]
    pub auth: String,
}

/// A browser's `PushSubscription`, as posted to `/subscribe`.
///
/// The endpoint is the identity of the subscription; everything else is
/// delivery metadata that only the push sender looks at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// Push service endpoint URL
    pub endpoint: String,
    /// Expiration time as sent by the browser (Unix ms)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<i64>,
    #[serde(default)]
    pub keys: SubscriptionKeys,
}

impl Subscription {
    pub fn new(
        endpoint: impl Into<String>,
        p256dh: impl Into<String>,
        auth: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            expiration_time: None,
            keys: SubscriptionKeys {
                p256dh: p256dh.into(),
                auth: auth.into(),
            },
        }
    }

    /// Whether the endpoint can serve as a registry key
    pub fn has_endpoint(&self) -> bool {
        !self.endpoint.trim().is_empty()
    }
}

/// Result of a successful `register` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    /// Whether an existing entry with the same endpoint was overwritten
    pub replaced: bool,
    /// Registry size after the call
    pub total: usize,
}

/// Result of an `unregister` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unregistration {
    pub removed: bool,
    pub total: usize,
}

/// Registry statistics
#[derive(Debug, Clone, Serialize)]
pub struct RegistryStats {
    pub total_subscriptions: usize,
    pub oldest_registration: Option<DateTime<Utc>>,
    pub newest_registration: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_browser_subscription() {
        let json = r#"{
            "endpoint": "https://push.example.com/abc",
            "expirationTime": null,
            "keys": { "p256dh": "BPub", "auth": "sec" }
        }"#;
        let sub: Subscription = serde_json::from_str(json).unwrap();
        assert_eq!(sub.endpoint, "https://push.example.com/abc");
        assert_eq!(sub.expiration_time, None);
        assert_eq!(sub.keys.p256dh, "BPub");
        assert_eq!(sub.keys.auth, "sec");
    }

    #[test]
    fn test_missing_endpoint_fails_to_deserialize() {
        let json = r#"{ "keys": { "p256dh": "a", "auth": "b" } }"#;
        assert!(serde_json::from_str::<Subscription>(json).is_err());
    }

    #[test]
    fn test_has_endpoint() {
        assert!(Subscription::new("https://push.example.com/1", "k", "a").has_endpoint());
        assert!(!Subscription::new("", "k", "a").has_endpoint());
        assert!(!Subscription::new("   ", "k", "a").has_endpoint());
    }
}
