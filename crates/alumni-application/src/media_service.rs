//! Media attachment service.

use alumni_core::content::{MediaAttachment, MediaKind, MediaRepository, MediaUrlBuilder};
use alumni_core::error::Result;
use alumni_core::form::{ClientId, CollectionOp};
use std::sync::Arc;

/// Uploads files and turns them into attachments for a wizard's media list.
pub struct MediaService {
    repository: Arc<dyn MediaRepository>,
    urls: Arc<dyn MediaUrlBuilder>,
}

impl MediaService {
    pub fn new(repository: Arc<dyn MediaRepository>, urls: Arc<dyn MediaUrlBuilder>) -> Self {
        Self { repository, urls }
    }

    /// Uploads `bytes` and returns the attachment pointing at the stored file.
    ///
    /// The kind comes from the MIME type guessed from `filename`; anything
    /// unrecognised is treated as a document.
    pub async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<MediaAttachment> {
        let kind = kind_for(filename);
        let size = bytes.len();
        let server_name = self.repository.upload(filename, bytes).await?;
        tracing::debug!(
            "[Media] uploaded {} ({} bytes, {}) as {}",
            filename,
            size,
            kind,
            server_name
        );
        Ok(MediaAttachment {
            id: ClientId::generate(),
            kind,
            url: self.urls.url_for(&server_name),
            filename: Some(server_name),
            caption: String::new(),
        })
    }

    /// Uploads and wraps the attachment in an `Add` for the media collection.
    pub async fn attach(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<CollectionOp<MediaAttachment>> {
        self.upload(filename, bytes).await.map(CollectionOp::Add)
    }

    /// An external link attachment; nothing is uploaded.
    pub fn link(url: &str, caption: &str) -> CollectionOp<MediaAttachment> {
        CollectionOp::Add(MediaAttachment {
            id: ClientId::generate(),
            kind: MediaKind::Link,
            url: url.trim().to_string(),
            filename: None,
            caption: caption.trim().to_string(),
        })
    }
}

fn kind_for(filename: &str) -> MediaKind {
    mime_guess::from_path(filename)
        .first()
        .map(|mime| MediaKind::from_mime(mime.essence_str()))
        .unwrap_or(MediaKind::Document)
}
