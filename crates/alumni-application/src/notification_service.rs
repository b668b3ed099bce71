//! Notification sending use case.

use alumni_core::config::NotificationSettings;
use alumni_core::error::{AlumniError, Result};
use alumni_core::notification::{DeliveryReport, NotificationDraft, NotificationGateway};
use std::sync::Arc;

pub struct NotificationService {
    gateway: Arc<dyn NotificationGateway>,
    settings: NotificationSettings,
}

impl NotificationService {
    pub fn new(gateway: Arc<dyn NotificationGateway>, settings: NotificationSettings) -> Self {
        Self { gateway, settings }
    }

    pub fn settings(&self) -> &NotificationSettings {
        &self.settings
    }

    /// Validates `draft` and hands the personalised messages to the gateway
    /// in a single call.
    ///
    /// An invalid draft never reaches the gateway. Per-recipient failures are
    /// reported in the returned [`DeliveryReport`].
    pub async fn send(&self, draft: &NotificationDraft) -> Result<DeliveryReport> {
        let outbound = draft.prepare(&self.settings).map_err(AlumniError::from)?;
        tracing::debug!(
            "[Notification] {} recipients collapsed to {} numbers",
            draft.recipients.len(),
            outbound.messages.len()
        );

        let report = self.gateway.send(&outbound).await?;
        let failed = report.results.len() - report.delivered_count();
        if failed > 0 {
            for result in report.failed() {
                tracing::warn!(
                    "[Notification] delivery to {} failed: {}",
                    result.phone,
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
        }
        tracing::info!(
            "[Notification] sent {} messages, {} delivered, {} failed",
            outbound.messages.len(),
            report.delivered_count(),
            failed
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alumni_core::form::CollectionOp;
    use alumni_core::notification::{DeliveryResult, OutboundNotification, Recipient};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockGateway {
        sent: Mutex<Vec<OutboundNotification>>,
        reject: Vec<String>,
    }

    #[async_trait]
    impl NotificationGateway for MockGateway {
        async fn send(&self, notification: &OutboundNotification) -> Result<DeliveryReport> {
            self.sent.lock().unwrap().push(notification.clone());
            let results = notification
                .messages
                .iter()
                .map(|m| {
                    let rejected = self.reject.contains(&m.phone);
                    DeliveryResult {
                        phone: m.phone.clone(),
                        delivered: !rejected,
                        error: rejected.then(|| "number not registered".to_string()),
                    }
                })
                .collect();
            Ok(DeliveryReport { results })
        }
    }

    fn draft(message: &str, recipients: &[(&str, &str)]) -> NotificationDraft {
        let mut draft = NotificationDraft::new();
        for (name, phone) in recipients {
            draft.edit_recipients(CollectionOp::Add(Recipient::new(*name, *phone)));
        }
        draft.set_message(message);
        draft
    }

    #[tokio::test]
    async fn sends_once_with_personalised_messages() {
        let gateway = Arc::new(MockGateway::default());
        let service = NotificationService::new(gateway.clone(), NotificationSettings::default());

        let report = service
            .send(&draft(
                "Halo {name}, reuni tanggal 12 Juli.",
                &[
                    ("Budi", "0812-3456-7890"),
                    ("Sari", "+62 813 1111 2222"),
                    ("Budi lagi", "6281234567890"),
                ],
            ))
            .await
            .unwrap();

        let sent = gateway.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let texts: Vec<_> = sent[0].messages.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "Halo Budi, reuni tanggal 12 Juli.",
                "Halo Sari, reuni tanggal 12 Juli."
            ]
        );
        assert!(report.all_delivered());
        assert_eq!(report.delivered_count(), 2);
    }

    #[tokio::test]
    async fn invalid_draft_never_reaches_gateway() {
        let gateway = Arc::new(MockGateway::default());
        let service = NotificationService::new(gateway.clone(), NotificationSettings::default());

        let err = service.send(&draft("Halo", &[])).await.unwrap_err();
        assert!(err.is_validation());

        let err = service
            .send(&draft("Halo", &[("Budi", "12345")]))
            .await
            .unwrap_err();
        assert!(err.user_message().contains("12345"));
        assert!(gateway.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn partial_failures_are_reported() {
        let gateway = Arc::new(MockGateway {
            reject: vec!["6281399998888".to_string()],
            ..MockGateway::default()
        });
        let service = NotificationService::new(gateway, NotificationSettings::default());

        let report = service
            .send(&draft(
                "Info alumni",
                &[("Budi", "081234567890"), ("Rina", "081399998888")],
            ))
            .await
            .unwrap();

        assert!(!report.all_delivered());
        let failed: Vec<_> = report.failed().map(|r| r.phone.as_str()).collect();
        assert_eq!(failed, vec!["6281399998888"]);
    }
}
