//! Application layer of the alumni portal content tools.
//!
//! Use cases built on `alumni-core`: wizard sessions and their submission,
//! comment threads, media attachments and notification sending. Remote
//! systems are reached only through the core repository traits.

pub mod comment_thread_service;
pub mod media_service;
pub mod notification_service;
pub mod snapshot;
pub mod wizard;

#[cfg(test)]
mod testing;

pub use comment_thread_service::CommentThreadService;
pub use media_service::MediaService;
pub use notification_service::NotificationService;
pub use snapshot::MemorySnapshotStore;
pub use wizard::{SubmissionPipeline, SubmitError, SubmitMode, SubmitOutcome, WizardSession};
