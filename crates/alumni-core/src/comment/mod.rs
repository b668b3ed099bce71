//! Comment domain module.
//!
//! # Module Structure
//!
//! - `model`: comment nodes, pages and reactions
//! - `tree`: `CommentTree`, the arena holding loaded comments and replies
//! - `repository`: the remote comment store trait
//! - `error`: `CommentError`

mod error;
mod model;
mod repository;
mod tree;

pub use error::{CommentError, CommentResult};
pub use model::{
    CommentAuthor, CommentId, CommentNode, CommentPage, ReactionKind, ReplyPage, ReplyState,
    VisibleComment,
};
pub use repository::CommentRepository;
pub use tree::{CommentTree, ExpandAction};
