//! Error types for the alumni content core.

use crate::wizard::ValidationError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fallback text shown when a collaborator fails without a message.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to save data. Please try again.";

/// Failure reported by an external collaborator (API client).
///
/// `message` is whatever the collaborator put in its error body, if anything.
/// It is surfaced to the user verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("collaborator call failed (status: {status:?}): {}", .message.as_deref().unwrap_or("no message"))]
pub struct TransportError {
    pub status: Option<u16>,
    pub message: Option<String>,
}

impl TransportError {
    pub fn new(status: Option<u16>, message: Option<String>) -> Self {
        Self { status, message }
    }

    /// Creates an error carrying only a collaborator message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: Some(message.into()),
        }
    }

    /// The text to show the user: the collaborator's message when present and
    /// non-blank, otherwise [`GENERIC_FAILURE_MESSAGE`].
    pub fn user_message(&self) -> String {
        self.message
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(GENERIC_FAILURE_MESSAGE)
            .to_string()
    }
}

/// A shared error type for the alumni content core.
///
/// Typed, structured variants with automatic conversion from the
/// serialization and I/O errors the crates run into.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AlumniError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound { entity_type: String, id: String },

    /// A required field is missing or out of bounds
    #[error("Validation error: {0}")]
    Validation(ValidationError),

    /// A collaborator call rejected or returned non-success
    #[error("Transport error: {0}")]
    Transport(TransportError),

    /// Malformed transport encoding for a structured field
    #[error("Parse error: {format} - {message}")]
    Parse { format: String, message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AlumniError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    /// Creates a Parse error
    pub fn parse(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            format: format.into(),
            message: message.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Creates a Transport error from a collaborator message
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(TransportError::with_message(message))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Text suitable for a transient notice in the UI.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(v) => v.message.clone(),
            Self::Transport(t) => t.user_message(),
            other => other.to_string(),
        }
    }
}

impl From<ValidationError> for AlumniError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<TransportError> for AlumniError {
    fn from(err: TransportError) -> Self {
        Self::Transport(err)
    }
}

impl From<std::io::Error> for AlumniError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for AlumniError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for AlumniError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for AlumniError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, AlumniError>`.
pub type Result<T> = std::result::Result<T, AlumniError>;
