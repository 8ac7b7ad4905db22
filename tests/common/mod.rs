//! Shared test helpers

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use push_fanout_service::config::Settings;
use push_fanout_service::push::{PushError, PushReceipt, PushSender};
use push_fanout_service::server::AppState;
use push_fanout_service::subscription::Subscription;

/// Push sender that records every call and answers with a scripted status
#[derive(Default)]
pub struct RecordingSender {
    statuses: Mutex<HashMap<String, u16>>,
    calls: AtomicUsize,
    payloads: Mutex<Vec<(String, String)>>,
}

impl RecordingSender {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make deliveries to `endpoint` answer with `status`
    pub fn respond(&self, endpoint: &str, status: u16) {
        self.statuses
            .lock()
            .unwrap()
            .insert(endpoint.to_string(), status);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `(endpoint, payload)` of every send so far
    pub fn payloads(&self) -> Vec<(String, String)> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl PushSender for RecordingSender {
    async fn send(
        &self,
        subscription: &Subscription,
        payload: &str,
    ) -> Result<PushReceipt, PushError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.payloads
            .lock()
            .unwrap()
            .push((subscription.endpoint.clone(), payload.to_string()));
        tokio::task::yield_now().await;

        let status = self
            .statuses
            .lock()
            .unwrap()
            .get(&subscription.endpoint)
            .copied()
            .unwrap_or(201);

        if (200..300).contains(&status) {
            Ok(PushReceipt { status_code: status })
        } else {
            Err(PushError::Rejected {
                status,
                body: format!("status {}", status),
            })
        }
    }
}

pub fn endpoint(i: usize) -> String {
    format!("https://push.example.com/send/{}", i)
}

pub fn subscription(i: usize) -> Subscription {
    Subscription::new(endpoint(i), format!("p256dh-{}", i), format!("auth-{}", i))
}

pub fn settings_with_cooldown(window_seconds: u64) -> Settings {
    let mut settings = Settings::default();
    settings.cooldown.window_seconds = window_seconds;
    settings
}

pub fn test_state(sender: Arc<RecordingSender>) -> AppState {
    AppState::with_sender(settings_with_cooldown(5), sender)
}
