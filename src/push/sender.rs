//! Push sender abstraction

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::subscription::Subscription;

/// Acknowledgement from the push service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushReceipt {
    /// HTTP status returned by the push service (usually 201)
    pub status_code: u16,
}

/// Failure delivering to a single subscription
#[derive(Debug, Clone, Error)]
pub enum PushError {
    /// The push service answered with a non-success status
    #[error("push service responded with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The request never produced a response (DNS, TLS, timeout, ...)
    #[error("push request failed: {0}")]
    Transport(String),

    /// Encryption or VAPID signing failed before anything was sent
    #[error("failed to build push message: {0}")]
    Message(String),
}

impl PushError {
    /// HTTP status reported by the push service, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            PushError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the endpoint is permanently gone (404 Not Found / 410 Gone)
    pub fn is_terminal(&self) -> bool {
        matches!(self.status_code(), Some(404) | Some(410))
    }
}

/// Delivers one payload to one subscription.
///
/// Implementations must be safe to call concurrently; the dispatcher invokes
/// `send` for every subscription of a broadcast at the same time.
#[async_trait]
pub trait PushSender: Send + Sync {
    async fn send(
        &self,
        subscription: &Subscription,
        payload: &str,
    ) -> Result<PushReceipt, PushError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected(status: u16) -> PushError {
        PushError::Rejected {
            status,
            body: String::new(),
        }
    }

    #[test]
    fn test_gone_and_not_found_are_terminal() {
        assert!(rejected(410).is_terminal());
        assert!(rejected(404).is_terminal());
    }

    #[test]
    fn test_other_failures_are_transient() {
        assert!(!rejected(400).is_terminal());
        assert!(!rejected(413).is_terminal());
        assert!(!rejected(429).is_terminal());
        assert!(!rejected(500).is_terminal());
        assert!(!PushError::Transport("timeout".into()).is_terminal());
        assert!(!PushError::Message("bad key".into()).is_terminal());
    }

    #[test]
    fn test_status_code() {
        assert_eq!(rejected(410).status_code(), Some(410));
        assert_eq!(PushError::Transport("x".into()).status_code(), None);
    }
}
