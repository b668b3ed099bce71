//! Configuration model.
//!
//! Loaded from `config.toml` by the infrastructure layer. Every section and
//! key has a default, so an empty or partial file is valid.

use crate::form::{SummaryPolicy, TransportOptions};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SUMMARY_LENGTH: usize = 150;
pub const DEFAULT_REPLY_DEPTH: u8 = 2;
pub const DEFAULT_REPLY_PAGE_SIZE: u32 = 10;
pub const DEFAULT_COUNTRY_CODE: &str = "62";
pub const DEFAULT_MAX_MESSAGE_CHARS: usize = 4096;

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct AlumniConfig {
    #[serde(default)]
    pub wizard: WizardSettings,
    #[serde(default)]
    pub comments: CommentSettings,
    #[serde(default)]
    pub notification: NotificationSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl AlumniConfig {
    /// Wizard settings with the notification country code applied, so phone
    /// numbers in forms normalise the same way as message recipients.
    pub fn wizard_settings(&self) -> WizardSettings {
        WizardSettings {
            country_code: self.notification.country_code.clone(),
            ..self.wizard.clone()
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct WizardSettings {
    /// Initial summary length for new records
    #[serde(default = "default_summary_length")]
    pub summary_length: usize,
    #[serde(default)]
    pub summary_policy: SummaryPolicy,
    /// Delimiter used to join tag lists on the wire
    #[serde(default = "default_tag_delimiter")]
    pub tag_delimiter: String,
    /// Set from `[notification]` by [`AlumniConfig::wizard_settings`]
    #[serde(skip, default = "default_country_code")]
    pub country_code: String,
}

impl Default for WizardSettings {
    fn default() -> Self {
        Self {
            summary_length: default_summary_length(),
            summary_policy: SummaryPolicy::default(),
            tag_delimiter: default_tag_delimiter(),
            country_code: default_country_code(),
        }
    }
}

impl WizardSettings {
    pub fn transport_options(&self) -> TransportOptions {
        TransportOptions {
            tag_delimiter: self.tag_delimiter.clone(),
            country_code: self.country_code.clone(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct CommentSettings {
    /// Deepest reply level rendered; top-level comments are depth 0
    #[serde(default = "default_max_depth")]
    pub max_depth: u8,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for CommentSettings {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            page_size: default_page_size(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct NotificationSettings {
    /// Prefix replacing a leading `0` in local phone numbers
    #[serde(default = "default_country_code")]
    pub country_code: String,
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            country_code: default_country_code(),
            max_message_chars: default_max_message_chars(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Default filter directive; `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_true")]
    pub file_logging: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_logging: true,
        }
    }
}

fn default_summary_length() -> usize {
    DEFAULT_SUMMARY_LENGTH
}

fn default_tag_delimiter() -> String {
    ",".to_string()
}

fn default_max_depth() -> u8 {
    DEFAULT_REPLY_DEPTH
}

fn default_page_size() -> u32 {
    DEFAULT_REPLY_PAGE_SIZE
}

fn default_country_code() -> String {
    DEFAULT_COUNTRY_CODE.to_string()
}

fn default_max_message_chars() -> usize {
    DEFAULT_MAX_MESSAGE_CHARS
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: AlumniConfig = toml::from_str("").unwrap();
        assert_eq!(config, AlumniConfig::default());
        assert_eq!(config.comments.max_depth, 2);
        assert_eq!(config.wizard.summary_policy, SummaryPolicy::AlwaysOverwrite);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: AlumniConfig = toml::from_str(
            r#"
            [wizard]
            summary_policy = "keep_manual_edits"

            [comments]
            page_size = 25
            "#,
        )
        .unwrap();
        assert_eq!(config.wizard.summary_policy, SummaryPolicy::KeepManualEdits);
        assert_eq!(config.wizard.summary_length, DEFAULT_SUMMARY_LENGTH);
        assert_eq!(config.comments.page_size, 25);
        assert_eq!(config.comments.max_depth, DEFAULT_REPLY_DEPTH);
    }

    #[test]
    fn wizard_settings_follow_notification_country_code() {
        let config: AlumniConfig = toml::from_str(
            r#"
            [wizard]
            tag_delimiter = ";"

            [notification]
            country_code = "60"
            "#,
        )
        .unwrap();
        assert_eq!(config.wizard.country_code, DEFAULT_COUNTRY_CODE);

        let settings = config.wizard_settings();
        assert_eq!(settings.country_code, "60");
        assert_eq!(settings.tag_delimiter, ";");
        assert_eq!(settings.transport_options().country_code, "60");

        let written = toml::to_string(&config).unwrap();
        assert_eq!(written.matches("country_code").count(), 1);
    }
}
