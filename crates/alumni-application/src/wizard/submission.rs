//! Submission pipeline: validate, serialise, call the record collaborator.

use super::session::WizardSession;
use alumni_core::error::{AlumniError, TransportError};
use alumni_core::form::{FormSchema, RecordRepository, SnapshotStore};
use alumni_core::wizard::ValidationError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitMode {
    /// Save without validation
    Draft,
    /// Validate every step first
    Final,
}

impl SubmitMode {
    /// Value of the `status` field sent with the record.
    pub fn status(self) -> &'static str {
        match self {
            SubmitMode::Draft => "draft",
            SubmitMode::Final => "published",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitOutcome {
    pub record_id: String,
    /// Whether a new record was created (as opposed to updated)
    pub created: bool,
    /// The wizard is done; the UI leaves it
    pub navigate_away: bool,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmitError {
    /// A step failed whole-document validation; the session cursor now
    /// points at it
    #[error("Validation failed: {0}")]
    Validation(ValidationError),

    #[error("{0}")]
    Transport(TransportError),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Another submit on the same session has not finished yet
    #[error("A submission is already in progress")]
    InFlight,

    /// Any other collaborator failure
    #[error(transparent)]
    Collaborator(AlumniError),
}

impl SubmitError {
    /// Text for the transient notice shown after a failed submit.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(v) => v.message.clone(),
            Self::Transport(t) => t.user_message(),
            Self::InFlight => self.to_string(),
            Self::Serialization(_) | Self::Collaborator(_) => {
                TransportError::new(None, None).user_message()
            }
        }
    }
}

impl From<AlumniError> for SubmitError {
    fn from(err: AlumniError) -> Self {
        match err {
            AlumniError::Transport(t) => Self::Transport(t),
            AlumniError::Validation(v) => Self::Validation(v),
            AlumniError::Serialization { message, .. } => Self::Serialization(message),
            other => Self::Collaborator(other),
        }
    }
}

/// Sends wizard sessions to the record collaborator.
///
/// The session lock is released while the collaborator call is outstanding,
/// so a second submit on the same session sees the `submitting` flag and is
/// rejected instead of queued.
pub struct SubmissionPipeline {
    records: Arc<dyn RecordRepository>,
    snapshots: Option<Arc<dyn SnapshotStore>>,
}

impl SubmissionPipeline {
    pub fn new(records: Arc<dyn RecordRepository>) -> Self {
        Self {
            records,
            snapshots: None,
        }
    }

    /// Clears the session's draft snapshot from `store` after every
    /// successful submit.
    pub fn with_snapshots(mut self, store: Arc<dyn SnapshotStore>) -> Self {
        self.snapshots = Some(store);
        self
    }

    /// Submits a session.
    ///
    /// `Final` validates every step in order and, on the first failure,
    /// moves the cursor to that step without calling the collaborator.
    /// `Draft` skips validation. The collaborator is called exactly once:
    /// `create` for a new record, `update` when the session edits one.
    ///
    /// On failure the form state is left untouched.
    pub async fn submit<S: FormSchema>(
        &self,
        session: &Mutex<WizardSession<S>>,
        mode: SubmitMode,
    ) -> Result<SubmitOutcome, SubmitError> {
        let (payload, record_id, key) = {
            let mut guard = session.lock().await;
            if guard.is_submitting() {
                tracing::debug!("[Submission] {} already in flight", guard.key());
                return Err(SubmitError::InFlight);
            }

            if mode == SubmitMode::Final {
                if let Err(err) = guard.steps().validate_all(guard.state()) {
                    tracing::debug!(
                        "[Submission] {} blocked at step {} ({}): {}",
                        guard.key(),
                        err.step,
                        err.field,
                        err.message
                    );
                    // validate_all only reports in-range steps
                    let _ = guard.steps_mut().force(err.step);
                    return Err(SubmitError::Validation(err));
                }
            }

            let mut payload = guard.state().to_transport(guard.transport_options())?;
            payload.insert_text("status", mode.status());

            guard.set_submitting(true);
            (
                payload,
                guard.record_id().map(str::to_string),
                guard.key().to_string(),
            )
        };

        tracing::info!(
            "[Submission] sending {} ({}, {})",
            key,
            S::KIND,
            mode.status()
        );
        let result = match &record_id {
            Some(id) => self
                .records
                .update(S::KIND, id, &payload)
                .await
                .map(|()| (id.clone(), false)),
            None => self
                .records
                .create(S::KIND, &payload)
                .await
                .map(|id| (id, true)),
        };

        let mut guard = session.lock().await;
        guard.set_submitting(false);

        match result {
            Ok((id, created)) => {
                guard.set_record_id(id.clone());
                drop(guard);
                self.clear_snapshot(&key).await;
                tracing::info!("[Submission] {} saved as {} '{}'", key, S::KIND, id);
                Ok(SubmitOutcome {
                    record_id: id,
                    created,
                    navigate_away: true,
                })
            }
            Err(err) => {
                tracing::warn!("[Submission] {} failed: {}", key, err);
                Err(err.into())
            }
        }
    }

    async fn clear_snapshot(&self, key: &str) {
        let Some(store) = &self.snapshots else {
            return;
        };
        if let Err(e) = store.clear(key).await {
            tracing::warn!("[Submission] could not clear snapshot {}: {}", key, e);
        }
    }
}

#[cfg(test)]
#[path = "submission_test.rs"]
mod tests;
