//! Comment domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-assigned comment id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(pub i64);

impl From<i64> for CommentId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

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
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ReactionKind {
    Like,
    Dislike,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentAuthor {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// One comment or reply as returned by the comment collaborator.
///
/// Counts and `user_reaction` are authoritative server values and are never
/// adjusted locally, except `reply_count` when a reply is posted or deleted
/// through this client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentNode {
    pub id: CommentId,
    /// `None` for top-level comments
    #[serde(default)]
    pub parent_id: Option<CommentId>,
    pub author: CommentAuthor,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub like_count: u32,
    #[serde(default)]
    pub dislike_count: u32,
    /// The viewing user's own reaction
    #[serde(default)]
    pub user_reaction: Option<ReactionKind>,
    #[serde(default)]
    pub reply_count: u32,
}

/// A page of replies under one parent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyPage {
    pub items: Vec<CommentNode>,
    /// Page to request next, `None` when exhausted
    #[serde(default)]
    pub next_page: Option<u32>,
}

/// A page of top-level comments for a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentPage {
    pub items: Vec<CommentNode>,
    #[serde(default)]
    pub next_page: Option<u32>,
    /// Comments and replies on the post
    #[serde(default)]
    pub total_count: u64,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReplyState {
    #[default]
    Collapsed,
    Loading,
    Expanded,
}

/// One row of the flattened render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleComment {
    pub id: CommentId,
    pub depth: u8,
    pub reply_state: ReplyState,
    /// Replies exist and this node is below the depth cap
    pub can_expand: bool,
    /// More reply pages can be loaded
    pub has_more_replies: bool,
}
