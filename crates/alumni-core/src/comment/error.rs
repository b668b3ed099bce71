use super::model::CommentId;
use crate::error::AlumniError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommentError {
    #[error("Unknown comment: {0}")]
    UnknownNode(CommentId),

    #[error("Comment {id} is at the maximum reply depth ({max_depth})")]
    DepthCapReached { id: CommentId, max_depth: u8 },

    #[error("Comment text is required")]
    EmptyContent,

    /// Replies must be loaded before a reply can be attached locally
    #[error("Replies of comment {0} are not loaded")]
    RepliesNotLoaded(CommentId),

    #[error(transparent)]
    Collaborator(#[from] AlumniError),
}

impl CommentError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Collaborator(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

pub type CommentResult<T> = std::result::Result<T, CommentError>;
