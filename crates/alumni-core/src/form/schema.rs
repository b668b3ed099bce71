//! Closed per-wizard form schemas.
//!
//! Every wizard declares its fields as a struct with defaults, a field
//! identifier enum and a typed update enum. The update enum is the only way to
//! change a field, so no field can appear after initialisation.

use super::transport::{ParseWarning, TransportOptions, TransportPayload};
use crate::config::WizardSettings;
use crate::error::Result;
use crate::wizard::Step;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Entity type behind a wizard, as addressed on the record collaborator.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
pub enum RecordKind {
    #[serde(rename = "berita")]
    #[strum(serialize = "berita")]
    News,
    #[serde(rename = "laporan")]
    #[strum(serialize = "laporan")]
    Report,
    #[serde(rename = "biografi")]
    #[strum(serialize = "biografi")]
    Biography,
}

/// A field whose value is computed from other fields.
pub struct DerivedRule<S: FormSchema> {
    /// Fields whose change triggers recomputation
    pub sources: &'static [S::Field],
    /// The derived field itself
    pub target: S::Field,
    pub compute: fn(&S) -> String,
    pub read: fn(&S) -> &str,
    pub write: fn(&mut S, String),
}

/// A form decoded from a stored record, with any collections that had to be
/// replaced by empty defaults.
#[derive(Debug, Clone)]
pub struct Hydrated<S> {
    pub state: S,
    pub warnings: Vec<ParseWarning>,
}

pub trait FormSchema:
    Clone + Default + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    type Field: Copy + Eq + Hash + Debug + Send + Sync + 'static;
    type Update: Clone + Debug + Send;

    const KIND: RecordKind;

    /// The field an update targets.
    fn field_of(update: &Self::Update) -> Self::Field;

    /// Applies one update. Must only touch the field named by `field_of`.
    fn apply(&mut self, update: Self::Update);

    fn steps() -> Vec<Step<Self>>;

    /// Applies configured defaults to a freshly created (not hydrated) form.
    fn configure(&mut self, _settings: &WizardSettings) {}

    /// Re-keys every sub-record collection after the form was rebuilt from a
    /// snapshot. Client ids are not serialized.
    fn reassign_ids(&mut self) {}

    fn derived_rule() -> Option<DerivedRule<Self>> {
        None
    }

    fn to_transport(&self, options: &TransportOptions) -> Result<TransportPayload>;

    fn from_transport(payload: &TransportPayload, options: &TransportOptions) -> Hydrated<Self>;
}
