use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::push::{PushError, PushReceipt};

/// Message body delivered to every subscriber, serialized as JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub title: String,
    pub message: String,
}

impl NotificationPayload {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Settlement state of one delivery, mirroring an all-settled join
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SettledStatus {
    Fulfilled,
    Rejected,
}

/// Classification of one delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryKind {
    Success,
    /// Delivery failed but the endpoint may work later; subscription kept
    TransientFailure,
    /// Endpoint is gone; subscription pruned
    TerminalFailure,
}

/// Why a delivery was rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureReason {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    pub message: String,
}

/// Per-subscriber delivery result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryOutcome {
    pub endpoint: String,
    pub status: SettledStatus,
    pub outcome: DeliveryKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<PushReceipt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<FailureReason>,
}

impl DeliveryOutcome {
    pub fn from_result(endpoint: &str, result: Result<PushReceipt, PushError>) -> Self {
        match result {
            Ok(receipt) => Self {
                endpoint: endpoint.to_string(),
                status: SettledStatus::Fulfilled,
                outcome: DeliveryKind::Success,
                value: Some(receipt),
                reason: None,
            },
            Err(err) => Self {
                endpoint: endpoint.to_string(),
                status: SettledStatus::Rejected,
                outcome: if err.is_terminal() {
                    DeliveryKind::TerminalFailure
                } else {
                    DeliveryKind::TransientFailure
                },
                value: None,
                reason: Some(FailureReason {
                    status_code: err.status_code(),
                    message: err.to_string(),
                }),
            },
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome == DeliveryKind::TerminalFailure
    }
}

/// Aggregated result of one broadcast
#[derive(Debug, Clone, Default, Serialize)]
pub struct BroadcastReport {
    /// One entry per subscriber, in snapshot order
    pub outcomes: Vec<DeliveryOutcome>,
    pub delivered: usize,
    pub transient_failures: usize,
    pub terminal_failures: usize,
    /// Subscriptions removed from the registry after a terminal failure
    pub pruned: usize,
}

impl BroadcastReport {
    pub fn from_outcomes(outcomes: Vec<DeliveryOutcome>) -> Self {
        let mut report = Self::default();
        for outcome in &outcomes {
            match outcome.outcome {
                DeliveryKind::Success => report.delivered += 1,
                DeliveryKind::TransientFailure => report.transient_failures += 1,
                DeliveryKind::TerminalFailure => report.terminal_failures += 1,
            }
        }
        report.outcomes = outcomes;
        report
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn failed(&self) -> usize {
        self.transient_failures + self.terminal_failures
    }
}

/// What a trigger request ended up doing
#[derive(Debug, Clone)]
pub enum TriggerOutcome {
    /// Same notification was broadcast less than one cooldown window ago
    Skipped { remaining: Duration },
    /// Cooldown passed but nobody is subscribed
    NoSubscribers,
    Dispatched(BroadcastReport),
}
