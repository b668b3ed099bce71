//! Notification domain module.
//!
//! # Module Structure
//!
//! - `model`: drafts, recipients, outbound messages and delivery reports
//! - `phone`: phone number normalisation
//! - `repository`: the delivery gateway trait

mod model;
mod phone;
mod repository;

pub use model::{
    DeliveryReport, DeliveryResult, NAME_PLACEHOLDER, NotificationDraft, OutboundMessage,
    OutboundNotification, Recipient, RecipientEdit, personalize,
};
pub use phone::{MAX_DIGITS, MIN_DIGITS, normalize_phone};
pub use repository::NotificationGateway;
