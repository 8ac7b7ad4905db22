use std::sync::Arc;

use crate::config::Settings;
use crate::error::Result;
use crate::notification::NotificationService;
use crate::push::{PushSender, WebPushSender};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub service: Arc<NotificationService>,
}

impl AppState {
    /// Production state delivering through Web Push
    pub fn new(settings: Settings) -> Result<Self> {
        let sender = Arc::new(WebPushSender::new(&settings.vapid, &settings.push)?);
        Ok(Self::with_sender(settings, sender))
    }

    /// State with a caller-provided push sender
    pub fn with_sender(settings: Settings, sender: Arc<dyn PushSender>) -> Self {
        let service = Arc::new(NotificationService::from_settings(&settings, sender));

        Self {
            settings: Arc::new(settings),
            service,
        }
    }
}
