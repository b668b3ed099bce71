//! Hand-written collaborator mocks shared by the service tests.

use alumni_core::error::{AlumniError, Result};
use alumni_core::form::{RecordKind, RecordRepository, TransportPayload};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

#[derive(Debug, Clone, PartialEq)]
pub enum RecordCall {
    Create(RecordKind, TransportPayload),
    Update(RecordKind, String, TransportPayload),
}

/// Record store that remembers every call.
#[derive(Default)]
pub struct MockRecordRepository {
    pub stored: Mutex<HashMap<String, TransportPayload>>,
    pub calls: Mutex<Vec<RecordCall>>,
    pub fail_with: Mutex<Option<AlumniError>>,
    /// When set, `create`/`update` signal the first notify and wait on the
    /// second before answering.
    pub gate: Option<(Arc<Notify>, Arc<Notify>)>,
}

impl MockRecordRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated(entered: Arc<Notify>, release: Arc<Notify>) -> Self {
        Self {
            gate: Some((entered, release)),
            ..Self::default()
        }
    }

    pub fn with_record(self, id: &str, payload: TransportPayload) -> Self {
        self.stored.lock().unwrap().insert(id.to_string(), payload);
        self
    }

    pub fn fail_next(&self, err: AlumniError) {
        *self.fail_with.lock().unwrap() = Some(err);
    }

    pub fn calls(&self) -> Vec<RecordCall> {
        self.calls.lock().unwrap().clone()
    }

    async fn pass_gate(&self) {
        if let Some((entered, release)) = &self.gate {
            entered.notify_one();
            release.notified().await;
        }
    }

    fn take_failure(&self) -> Result<()> {
        match self.fail_with.lock().unwrap().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RecordRepository for MockRecordRepository {
    async fn get(&self, _kind: RecordKind, id: &str) -> Result<Option<TransportPayload>> {
        self.take_failure()?;
        Ok(self.stored.lock().unwrap().get(id).cloned())
    }

    async fn create(&self, kind: RecordKind, payload: &TransportPayload) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push(RecordCall::Create(kind, payload.clone()));
        self.pass_gate().await;
        self.take_failure()?;
        let mut stored = self.stored.lock().unwrap();
        let id = format!("{}", stored.len() + 1);
        stored.insert(id.clone(), payload.clone());
        Ok(id)
    }

    async fn update(&self, kind: RecordKind, id: &str, payload: &TransportPayload) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(RecordCall::Update(kind, id.to_string(), payload.clone()));
        self.pass_gate().await;
        self.take_failure()?;
        match self.stored.lock().unwrap().get_mut(id) {
            Some(existing) => {
                *existing = payload.clone();
                Ok(())
            }
            None => Err(AlumniError::not_found(kind.to_string(), id)),
        }
    }
}
