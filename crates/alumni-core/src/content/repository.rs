//! Media upload traits.

use crate::error::Result;
use async_trait::async_trait;

/// Remote file store for record media.
#[async_trait]
pub trait MediaRepository: Send + Sync {
    /// Uploads a file.
    ///
    /// # Arguments
    ///
    /// * `filename` - The original file name, used for the content type
    /// * `bytes` - File contents
    ///
    /// # Returns
    ///
    /// - `Ok(name)`: The file name assigned by the server
    /// - `Err(_)`: The upload failed
    async fn upload(&self, filename: &str, bytes: Vec<u8>) -> Result<String>;
}

/// Turns a server file name into a URL the UI can display.
pub trait MediaUrlBuilder: Send + Sync {
    fn url_for(&self, server_filename: &str) -> String;
}

/// Joins server file names onto a fixed base URL.
#[derive(Debug, Clone)]
pub struct BaseUrlBuilder {
    base: String,
}

impl BaseUrlBuilder {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }
}

impl MediaUrlBuilder for BaseUrlBuilder {
    fn url_for(&self, server_filename: &str) -> String {
        format!(
            "{}/{}",
            self.base.trim_end_matches('/'),
            server_filename.trim_start_matches('/')
        )
    }
}
