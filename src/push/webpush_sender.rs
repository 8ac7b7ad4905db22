//! Web Push delivery (RFC 8030) with VAPID authentication (RFC 8292).
//!
//! The `web-push` crate handles RFC 8291 payload encryption and JWT signing;
//! the HTTP request itself goes through a shared `reqwest::Client` so that
//! connections to the same push service are pooled across a broadcast.

use std::time::Duration;

use async_trait::async_trait;
use web_push::{ContentEncoding, SubscriptionInfo, VapidSignatureBuilder, WebPushMessageBuilder};

use crate::config::{PushConfig, VapidConfig};
use crate::error::{AppError, Result};
use crate::subscription::Subscription;

use super::sender::{PushError, PushReceipt, PushSender};

pub struct WebPushSender {
    client: reqwest::Client,
    vapid_private_key: String,
    subject: String,
    ttl: u32,
}

impl WebPushSender {
    pub fn new(vapid: &VapidConfig, push: &PushConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(push.request_timeout_seconds))
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build HTTP client: {}", e)))?;

        if vapid.private_key.is_empty() {
            tracing::warn!("VAPID private key is not configured; push deliveries will fail");
        }

        Ok(Self {
            client,
            vapid_private_key: vapid.private_key.clone(),
            subject: vapid.subject.clone(),
            ttl: push.ttl_seconds,
        })
    }

    fn build_request(
        &self,
        subscription: &Subscription,
        payload: &str,
    ) -> std::result::Result<reqwest::RequestBuilder, PushError> {
        if self.vapid_private_key.is_empty() {
            return Err(PushError::Message("VAPID private key is not configured".into()));
        }

        let sub_info = SubscriptionInfo::new(
            &subscription.endpoint,
            &subscription.keys.p256dh,
            &subscription.keys.auth,
        );

        let mut sig_builder =
            VapidSignatureBuilder::from_base64(&self.vapid_private_key, &sub_info)
                .map_err(|e| PushError::Message(format!("invalid VAPID key: {}", e)))?;
        sig_builder.add_claim("sub", self.subject.as_str());
        let signature = sig_builder
            .build()
            .map_err(|e| PushError::Message(format!("VAPID signing failed: {}", e)))?;

        let mut builder = WebPushMessageBuilder::new(&sub_info);
        builder.set_payload(ContentEncoding::Aes128Gcm, payload.as_bytes());
        builder.set_vapid_signature(signature);
        builder.set_ttl(self.ttl);

        let message = builder
            .build()
            .map_err(|e| PushError::Message(format!("encryption failed: {}", e)))?;

        let mut request = self
            .client
            .post(message.endpoint.to_string())
            .header("TTL", message.ttl.to_string());

        if let Some(urgency) = message.urgency {
            request = request.header("Urgency", urgency.to_string());
        }

        if let Some(topic) = message.topic {
            request = request.header("Topic", topic);
        }

        if let Some(push_payload) = message.payload {
            request = request
                .header("Content-Encoding", push_payload.content_encoding.to_str())
                .header("Content-Type", "application/octet-stream");

            for (key, value) in &push_payload.crypto_headers {
                request = request.header(*key, value.as_str());
            }

            request = request.body(push_payload.content);
        }

        Ok(request)
    }
}

#[async_trait]
impl PushSender for WebPushSender {
    #[tracing::instrument(
        name = "push.send",
        skip(self, subscription, payload),
        fields(endpoint = %subscription.endpoint)
    )]
    async fn send(
        &self,
        subscription: &Subscription,
        payload: &str,
    ) -> std::result::Result<PushReceipt, PushError> {
        let request = self.build_request(subscription, payload)?;

        let response = request
            .send()
            .await
            .map_err(|e| PushError::Transport(e.to_string()))?;
        let status = response.status().as_u16();

        if response.status().is_success() {
            tracing::debug!(status, "Push message accepted");
            return Ok(PushReceipt { status_code: status });
        }

        let body = response.text().await.unwrap_or_default();
        Err(PushError::Rejected { status, body })
    }
}
