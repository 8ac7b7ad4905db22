//! Push subscription registry.
//!
//! Subscriptions are deduplicated by endpoint: registering an endpoint that is
//! already present replaces its key material in place. The registry lives in
//! memory for the lifetime of the process.

mod registry;
mod types;

pub use registry::SubscriptionRegistry;
pub use types::{Registration, RegistryStats, Subscription, SubscriptionKeys, Unregistration};
