//! Shared sub-records: media attachments and selected categories.

use crate::form::{ClientId, SubRecord};
use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaKind {
    #[default]
    Image,
    Video,
    Document,
    /// External link (e.g. an embedded video URL)
    Link,
}

impl MediaKind {
    /// Infers the kind from a MIME type such as `image/png`.
    pub fn from_mime(mime: &str) -> Self {
        match mime.split('/').next().unwrap_or_default() {
            "image" => MediaKind::Image,
            "video" => MediaKind::Video,
            _ => MediaKind::Document,
        }
    }
}

/// One media item attached to a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaAttachment {
    #[serde(skip)]
    pub id: ClientId,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    #[serde(default)]
    pub url: String,
    /// Server-assigned file name, absent for external links
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default)]
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MediaEdit {
    Kind(MediaKind),
    Url(String),
    Filename(Option<String>),
    Caption(String),
}

impl SubRecord for MediaAttachment {
    type Kind = MediaKind;
    type Edit = MediaEdit;

    fn blank(id: ClientId, kind: MediaKind) -> Self {
        Self {
            id,
            kind,
            url: String::new(),
            filename: None,
            caption: String::new(),
        }
    }

    fn id(&self) -> &ClientId {
        &self.id
    }

    fn assign_id(&mut self, id: ClientId) {
        self.id = id;
    }

    fn apply(&mut self, edit: MediaEdit) {
        match edit {
            MediaEdit::Kind(kind) => self.kind = kind,
            MediaEdit::Url(url) => self.url = url,
            MediaEdit::Filename(name) => self.filename = name,
            MediaEdit::Caption(caption) => self.caption = caption,
        }
    }
}

/// A category picked for a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySelection {
    #[serde(skip)]
    pub id: ClientId,
    pub category_id: i64,
    #[serde(default)]
    pub name: String,
}

impl CategorySelection {
    pub fn new(category_id: i64, name: impl Into<String>) -> Self {
        Self {
            id: ClientId::generate(),
            category_id,
            name: name.into(),
        }
    }
}

impl SubRecord for CategorySelection {
    type Kind = ();
    /// Re-points the selection at another category: `(category_id, name)`.
    type Edit = (i64, String);

    fn blank(id: ClientId, _kind: ()) -> Self {
        Self {
            id,
            category_id: 0,
            name: String::new(),
        }
    }

    fn id(&self) -> &ClientId {
        &self.id
    }

    fn assign_id(&mut self, id: ClientId) {
        self.id = id;
    }

    fn apply(&mut self, (category_id, name): (i64, String)) {
        self.category_id = category_id;
        self.name = name;
    }
}
