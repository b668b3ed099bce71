//! One open wizard: form state, step cursor and edit context.

use alumni_core::config::WizardSettings;
use alumni_core::error::{AlumniError, Result};
use alumni_core::form::{
    FormContainer, FormSchema, FormSnapshot, ParseWarning, RecordRepository, SnapshotStore,
    TransportOptions,
};
use alumni_core::wizard::{StepController, WizardError};

/// A wizard being filled in, either for a new record or an existing one.
///
/// The session exclusively owns its form; the step cursor lives next to it so
/// both are restored together from a snapshot.
#[derive(Debug)]
pub struct WizardSession<S: FormSchema> {
    key: String,
    form: FormContainer<S>,
    steps: StepController<S>,
    record_id: Option<String>,
    warnings: Vec<ParseWarning>,
    options: TransportOptions,
    submitting: bool,
}

fn controller<S: FormSchema>() -> Result<StepController<S>> {
    StepController::new(S::steps()).map_err(|e| AlumniError::internal(e.to_string()))
}

fn snapshot_key<S: FormSchema>(record_id: Option<&str>) -> String {
    format!("{}-{}", S::KIND, record_id.unwrap_or("new"))
}

impl<S: FormSchema> WizardSession<S> {
    /// Opens a wizard for a new record with configured defaults.
    pub fn new(settings: &WizardSettings) -> Result<Self> {
        let mut state = S::default();
        state.configure(settings);

        Ok(Self {
            key: snapshot_key::<S>(None),
            form: FormContainer::hydrate(state, settings.summary_policy),
            steps: controller()?,
            record_id: None,
            warnings: Vec::new(),
            options: settings.transport_options(),
            submitting: false,
        })
    }

    /// Opens a wizard on a stored record.
    ///
    /// Sub-record lists that fail to parse are replaced by empty lists and
    /// reported through [`warnings`](Self::warnings).
    ///
    /// # Errors
    ///
    /// - `NotFound` when the record does not exist
    /// - the repository error when loading fails
    pub async fn open(
        repository: &dyn RecordRepository,
        id: &str,
        settings: &WizardSettings,
    ) -> Result<Self> {
        let payload = repository
            .get(S::KIND, id)
            .await?
            .ok_or_else(|| AlumniError::not_found(S::KIND.to_string(), id))?;

        let options = settings.transport_options();
        let hydrated = S::from_transport(&payload, &options);
        if !hydrated.warnings.is_empty() {
            tracing::warn!(
                "[WizardSession] {} '{}' opened with {} degraded field(s)",
                S::KIND,
                id,
                hydrated.warnings.len()
            );
        }

        Ok(Self {
            key: snapshot_key::<S>(Some(id)),
            form: FormContainer::hydrate(hydrated.state, settings.summary_policy),
            steps: controller()?,
            record_id: Some(id.to_string()),
            warnings: hydrated.warnings,
            options,
            submitting: false,
        })
    }

    /// Key under which drafts of this session are snapshotted.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn state(&self) -> &S {
        self.form.state()
    }

    pub fn form(&self) -> &FormContainer<S> {
        &self.form
    }

    pub fn steps(&self) -> &StepController<S> {
        &self.steps
    }

    pub fn current_step(&self) -> usize {
        self.steps.current()
    }

    /// Server id of the record, set when editing or after the first save.
    pub fn record_id(&self) -> Option<&str> {
        self.record_id.as_deref()
    }

    pub fn is_editing(&self) -> bool {
        self.record_id.is_some()
    }

    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    pub fn transport_options(&self) -> &TransportOptions {
        &self.options
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Applies one field update. Returns `true` when the derived field was
    /// rewritten as well.
    pub fn update(&mut self, update: S::Update) -> bool {
        self.form.update(update)
    }

    /// Regenerates the derived field, dropping a manual edit.
    pub fn reset_derived(&mut self) -> bool {
        self.form.reset_derived()
    }

    pub fn next(&mut self) -> std::result::Result<usize, WizardError> {
        let position = self.steps.next(self.form.state())?;
        tracing::debug!("[WizardSession] {} moved to step {}", self.key, position);
        Ok(position)
    }

    pub fn prev(&mut self) -> usize {
        self.steps.prev()
    }

    pub fn go_to(&mut self, target: usize) -> std::result::Result<usize, WizardError> {
        self.steps.go_to(target, self.form.state())
    }

    pub(crate) fn steps_mut(&mut self) -> &mut StepController<S> {
        &mut self.steps
    }

    pub(crate) fn set_submitting(&mut self, submitting: bool) {
        self.submitting = submitting;
    }

    /// Records the server id after the first save; later checkpoints are
    /// keyed by it.
    pub(crate) fn set_record_id(&mut self, id: String) {
        self.key = snapshot_key::<S>(Some(&id));
        self.record_id = Some(id);
    }

    pub fn snapshot(&self) -> FormSnapshot<S> {
        self.form.snapshot(self.steps.current())
    }

    /// Saves the current form and cursor to `store`.
    pub async fn checkpoint(&self, store: &dyn SnapshotStore) -> Result<()> {
        let json = serde_json::to_string(&self.snapshot())?;
        store.save(&self.key, &json).await?;
        tracing::debug!("[WizardSession] checkpoint saved: {}", self.key);
        Ok(())
    }

    /// Restores a previously saved checkpoint, if any.
    ///
    /// An unreadable snapshot is discarded and treated as absent.
    pub async fn resume(&mut self, store: &dyn SnapshotStore) -> Result<bool> {
        let Some(json) = store.load(&self.key).await? else {
            return Ok(false);
        };
        match serde_json::from_str::<FormSnapshot<S>>(&json) {
            Ok(snapshot) => {
                let cursor = self.form.restore(snapshot);
                self.steps.restore_cursor(cursor);
                tracing::info!(
                    "[WizardSession] resumed {} at step {}",
                    self.key,
                    self.steps.current()
                );
                Ok(true)
            }
            Err(e) => {
                tracing::warn!(
                    "[WizardSession] discarding unreadable snapshot {}: {}",
                    self.key,
                    e
                );
                store.clear(&self.key).await?;
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
