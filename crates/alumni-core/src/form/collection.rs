//! Collection editors for structured sub-records.
//!
//! Every operation takes the current list and returns a new one; nothing here
//! keeps state besides the process-local counter behind [`ClientId::generate`].

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static CLIENT_ID_SEQ: AtomicU64 = AtomicU64::new(0);

/// Session-scoped identity of a sub-record.
///
/// Timestamp-derived, unique within the running process only. Never sent to
/// the server; the server assigns canonical ids on save.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    pub fn generate() -> Self {
        let seq = CLIENT_ID_SEQ.fetch_add(1, Ordering::Relaxed);
        Self(format!("{}-{}", Utc::now().timestamp_millis(), seq))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ClientId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An identity-bearing item inside a collection field.
pub trait SubRecord: Clone + fmt::Debug + PartialEq {
    /// Variant chosen when adding (media kind, participant role, ...).
    type Kind: Copy + fmt::Debug;
    /// Field-level edit applied by [`update`].
    type Edit: Clone + fmt::Debug;

    /// A new record with kind-specific empty defaults.
    fn blank(id: ClientId, kind: Self::Kind) -> Self;

    fn id(&self) -> &ClientId;

    fn assign_id(&mut self, id: ClientId);

    fn apply(&mut self, edit: Self::Edit);
}

pub fn add<T: SubRecord>(list: &[T], record: T) -> Vec<T> {
    let mut out = list.to_vec();
    out.push(record);
    out
}

/// Appends a blank record of `kind` and returns the new list together with the
/// generated id.
pub fn add_blank<T: SubRecord>(list: &[T], kind: T::Kind) -> (Vec<T>, ClientId) {
    let id = ClientId::generate();
    (add(list, T::blank(id.clone(), kind)), id)
}

/// Applies `edit` to the record with `id`; unknown ids leave the list as is.
pub fn update<T: SubRecord>(list: &[T], id: &ClientId, edit: T::Edit) -> Vec<T> {
    list.iter()
        .cloned()
        .map(|mut r| {
            if r.id() == id {
                r.apply(edit.clone());
            }
            r
        })
        .collect()
}

pub fn remove<T: SubRecord>(list: &[T], id: &ClientId) -> Vec<T> {
    list.iter().filter(|r| r.id() != id).cloned().collect()
}

pub fn find<'a, T: SubRecord>(list: &'a [T], id: &ClientId) -> Option<&'a T> {
    list.iter().find(|r| r.id() == id)
}

/// Gives every record a freshly generated id.
///
/// Ids are not serialized, so anything rebuilt from JSON comes back with
/// empty ids and must be re-keyed before collection edits can address it.
pub fn reassign_ids<T: SubRecord>(list: &mut [T]) {
    for r in list.iter_mut() {
        r.assign_id(ClientId::generate());
    }
}

pub fn move_up<T: SubRecord>(list: &[T], id: &ClientId) -> Vec<T> {
    let mut out = list.to_vec();
    if let Some(pos) = out.iter().position(|r| r.id() == id) {
        if pos > 0 {
            out.swap(pos, pos - 1);
        }
    }
    out
}

pub fn move_down<T: SubRecord>(list: &[T], id: &ClientId) -> Vec<T> {
    let mut out = list.to_vec();
    if let Some(pos) = out.iter().position(|r| r.id() == id) {
        if pos + 1 < out.len() {
            out.swap(pos, pos + 1);
        }
    }
    out
}

/// A collection edit carried through a form's single update entry point.
#[derive(Debug, Clone)]
pub enum CollectionOp<T: SubRecord> {
    Add(T),
    Update(ClientId, T::Edit),
    Remove(ClientId),
    MoveUp(ClientId),
    MoveDown(ClientId),
    Replace(Vec<T>),
}

impl<T: SubRecord> CollectionOp<T> {
    /// `Add` of a blank record with a freshly generated id.
    pub fn add_blank(kind: T::Kind) -> Self {
        Self::Add(T::blank(ClientId::generate(), kind))
    }

    pub fn apply_to(self, list: &[T]) -> Vec<T> {
        match self {
            Self::Add(record) => add(list, record),
            Self::Update(id, edit) => update(list, &id, edit),
            Self::Remove(id) => remove(list, &id),
            Self::MoveUp(id) => move_up(list, &id),
            Self::MoveDown(id) => move_down(list, &id),
            Self::Replace(records) => records,
        }
    }
}

/// Edits to a plain list of tag strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagOp {
    Add(String),
    Remove(String),
    Replace(Vec<String>),
}

impl TagOp {
    pub fn apply_to(self, tags: &[String]) -> Vec<String> {
        match self {
            Self::Add(tag) => add_tag(tags, &tag),
            Self::Remove(tag) => remove_tag(tags, &tag),
            Self::Replace(all) => all.iter().fold(Vec::new(), |acc, t| add_tag(&acc, t)),
        }
    }
}

/// Adds a trimmed tag unless it is empty or already present (case-insensitive).
pub fn add_tag(tags: &[String], tag: &str) -> Vec<String> {
    let tag = tag.trim();
    let mut out = tags.to_vec();
    if !tag.is_empty() && !tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
        out.push(tag.to_string());
    }
    out
}

pub fn remove_tag(tags: &[String], tag: &str) -> Vec<String> {
    let tag = tag.trim();
    tags.iter()
        .filter(|t| !t.eq_ignore_ascii_case(tag))
        .cloned()
        .collect()
}
