//! Repository trait re-exports.
//!
//! Central access to every collaborator trait the application layer is wired
//! against.

pub use crate::comment::CommentRepository;
pub use crate::content::{MediaRepository, MediaUrlBuilder};
pub use crate::form::{RecordRepository, SnapshotStore};
pub use crate::notification::NotificationGateway;
