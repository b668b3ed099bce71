//! Notification drafts and delivery results.

use super::phone::normalize_phone;
use crate::config::NotificationSettings;
use crate::form::{ClientId, CollectionOp, SubRecord};
use crate::wizard::validate::{FieldIssue, max_chars, require_non_empty, require_text};
use crate::wizard::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Placeholder replaced by each recipient's name.
pub const NAME_PLACEHOLDER: &str = "{name}";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipient {
    #[serde(skip)]
    pub id: ClientId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
}

impl Recipient {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            id: ClientId::generate(),
            name: name.into(),
            phone: phone.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecipientEdit {
    Name(String),
    Phone(String),
}

impl SubRecord for Recipient {
    type Kind = ();
    type Edit = RecipientEdit;

    fn blank(id: ClientId, _kind: ()) -> Self {
        Self {
            id,
            name: String::new(),
            phone: String::new(),
        }
    }

    fn id(&self) -> &ClientId {
        &self.id
    }

    fn assign_id(&mut self, id: ClientId) {
        self.id = id;
    }

    fn apply(&mut self, edit: RecipientEdit) {
        match edit {
            RecipientEdit::Name(v) => self.name = v,
            RecipientEdit::Phone(v) => self.phone = v,
        }
    }
}

/// A message being composed for a list of recipients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationDraft {
    pub recipients: Vec<Recipient>,
    pub message: String,
}

impl NotificationDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn edit_recipients(&mut self, op: CollectionOp<Recipient>) {
        self.recipients = op.apply_to(&self.recipients);
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    fn check(&self, settings: &NotificationSettings) -> Result<(), FieldIssue> {
        require_non_empty("recipients", "recipient", &self.recipients)?;
        require_text("message", "Message", &self.message)?;
        max_chars("message", "Message", &self.message, settings.max_message_chars)?;
        for (i, r) in self.recipients.iter().enumerate() {
            if normalize_phone(&r.phone, &settings.country_code).is_none() {
                return Err(FieldIssue::new(
                    "recipients",
                    format!("item {}: phone number '{}' is not valid", i + 1, r.phone.trim()),
                ));
            }
        }
        Ok(())
    }

    /// Validates the draft and expands it into one personalised message per
    /// distinct phone number. The first recipient listed for a number wins.
    pub fn prepare(
        &self,
        settings: &NotificationSettings,
    ) -> Result<OutboundNotification, ValidationError> {
        self.check(settings)
            .map_err(|issue| ValidationError::from_issue(0, "compose", issue))?;

        let mut seen = HashSet::new();
        let messages = self
            .recipients
            .iter()
            .filter_map(|r| {
                let phone = normalize_phone(&r.phone, &settings.country_code)?;
                seen.insert(phone.clone()).then(|| OutboundMessage {
                    text: personalize(&self.message, &r.name),
                    name: r.name.trim().to_string(),
                    phone,
                })
            })
            .collect();

        Ok(OutboundNotification { messages })
    }
}

/// Substitutes [`NAME_PLACEHOLDER`]; an unnamed recipient gets an empty name.
pub fn personalize(template: &str, name: &str) -> String {
    template.replace(NAME_PLACEHOLDER, name.trim())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Normalised international number
    pub phone: String,
    pub name: String,
    pub text: String,
}

/// Everything handed to the delivery gateway in one send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundNotification {
    pub messages: Vec<OutboundMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryResult {
    pub phone: String,
    pub delivered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    pub results: Vec<DeliveryResult>,
}

impl DeliveryReport {
    pub fn delivered_count(&self) -> usize {
        self.results.iter().filter(|r| r.delivered).count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &DeliveryResult> {
        self.results.iter().filter(|r| !r.delivered)
    }

    pub fn all_delivered(&self) -> bool {
        self.results.iter().all(|r| r.delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(message: &str, recipients: &[(&str, &str)]) -> NotificationDraft {
        let mut d = NotificationDraft::new();
        d.set_message(message);
        for (name, phone) in recipients {
            d.edit_recipients(CollectionOp::Add(Recipient::new(*name, *phone)));
        }
        d
    }

    #[test]
    fn requires_recipients_and_message() {
        let settings = NotificationSettings::default();
        let err = draft("Halo", &[]).prepare(&settings).unwrap_err();
        assert_eq!(err.field, "recipients");

        let err = draft("  ", &[("Ani", "08123456789")]).prepare(&settings).unwrap_err();
        assert_eq!(err.field, "message");
    }

    #[test]
    fn message_length_is_configurable() {
        let settings = NotificationSettings {
            max_message_chars: 10,
            ..Default::default()
        };
        let err = draft("Sebelas kar", &[("Ani", "08123456789")])
            .prepare(&settings)
            .unwrap_err();
        assert_eq!(err.field, "message");
    }

    #[test]
    fn invalid_phone_names_the_recipient_position() {
        let err = draft("Halo", &[("Ani", "08123456789"), ("Budi", "123")])
            .prepare(&NotificationSettings::default())
            .unwrap_err();
        assert_eq!(err.field, "recipients");
        assert!(err.message.starts_with("item 2:"));
    }

    #[test]
    fn duplicates_collapse_and_names_are_personalised() {
        let outbound = draft(
            "Halo {name}, reuni akbar 17 Agustus!",
            &[
                ("Ani", "0812-3456-789"),
                ("Ani (kantor)", "+62 812 3456 789"),
                ("Budi", "081298765432"),
            ],
        )
        .prepare(&NotificationSettings::default())
        .unwrap();

        assert_eq!(outbound.messages.len(), 2);
        assert_eq!(outbound.messages[0].phone, "628123456789");
        assert_eq!(outbound.messages[0].text, "Halo Ani, reuni akbar 17 Agustus!");
        assert_eq!(outbound.messages[1].text, "Halo Budi, reuni akbar 17 Agustus!");
    }

    #[test]
    fn report_counts() {
        let report = DeliveryReport {
            results: vec![
                DeliveryResult {
                    phone: "628123456789".into(),
                    delivered: true,
                    error: None,
                },
                DeliveryResult {
                    phone: "6281298765432".into(),
                    delivered: false,
                    error: Some("not on WhatsApp".into()),
                },
            ],
        };
        assert_eq!(report.delivered_count(), 1);
        assert_eq!(report.failed().count(), 1);
        assert!(!report.all_delivered());
    }
}
