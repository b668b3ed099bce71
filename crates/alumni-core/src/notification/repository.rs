//! Notification delivery gateway trait.

use super::model::{DeliveryReport, OutboundNotification};
use crate::error::Result;
use async_trait::async_trait;

/// Delivers prepared messages (e.g. through a WhatsApp gateway).
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    /// Sends every message of `notification` in one call.
    ///
    /// # Returns
    ///
    /// - `Ok(DeliveryReport)`: Per-recipient outcome; individual failures are
    ///   reported here, not as an error
    /// - `Err(_)`: The gateway rejected the whole request
    async fn send(&self, notification: &OutboundNotification) -> Result<DeliveryReport>;
}
