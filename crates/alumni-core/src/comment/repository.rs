//! Comment repository trait.

use super::model::{CommentId, CommentNode, CommentPage, ReactionKind, ReplyPage};
use crate::error::Result;
use async_trait::async_trait;

/// Remote comment store behind the social feed.
///
/// Every mutation returns the authoritative server node so callers never
/// recompute counts locally.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Lists top-level comments of a post.
    ///
    /// # Arguments
    ///
    /// * `post_id` - The post whose comments are listed
    /// * `page` - 1-based page number
    /// * `page_size` - Maximum number of comments per page
    async fn list_comments(
        &self,
        post_id: &str,
        page: u32,
        page_size: u32,
    ) -> Result<CommentPage>;

    /// Lists direct replies of a comment.
    ///
    /// # Arguments
    ///
    /// * `parent` - The comment whose replies are listed
    /// * `page` - 1-based page number
    /// * `page_size` - Maximum number of replies per page
    async fn list_replies(
        &self,
        parent: CommentId,
        page: u32,
        page_size: u32,
    ) -> Result<ReplyPage>;

    /// Posts a top-level comment and returns the stored node.
    async fn create_comment(&self, post_id: &str, content: &str) -> Result<CommentNode>;

    /// Posts a reply under `parent` and returns the stored node.
    async fn create_reply(&self, parent: CommentId, content: &str) -> Result<CommentNode>;

    /// Toggles the current user's reaction on a comment.
    ///
    /// # Returns
    ///
    /// - `Ok(CommentNode)`: The node with updated counts and user reaction
    /// - `Err(_)`: The reaction was not recorded
    async fn toggle_reaction(&self, id: CommentId, kind: ReactionKind) -> Result<CommentNode>;

    /// Deletes a comment together with its replies.
    async fn delete(&self, id: CommentId) -> Result<()>;
}
