//! Comment thread service.
//!
//! Drives one post's `CommentTree` against the comment collaborator. Tree
//! state sits behind a `RwLock` that is never held across a collaborator
//! call; responses are applied only if their request ticket is still the
//! latest for its slot.

use alumni_core::comment::{
    CommentError, CommentId, CommentNode, CommentRepository, CommentResult, CommentTree,
    ExpandAction, ReactionKind, ReplyPage, ReplyState, VisibleComment,
};
use alumni_core::config::CommentSettings;
use alumni_core::sequence::{RequestSequencer, Slot};
use std::sync::Arc;
use tokio::sync::RwLock;

struct ThreadState {
    tree: CommentTree,
    sequencer: RequestSequencer,
}

pub struct CommentThreadService {
    repository: Arc<dyn CommentRepository>,
    /// Comments or replies requested per page
    page_size: u32,
    state: RwLock<ThreadState>,
}

impl CommentThreadService {
    pub fn new(
        repository: Arc<dyn CommentRepository>,
        post_id: impl Into<String>,
        settings: &CommentSettings,
    ) -> Self {
        Self {
            repository,
            page_size: settings.page_size,
            state: RwLock::new(ThreadState {
                tree: CommentTree::new(post_id, settings.max_depth),
                sequencer: RequestSequencer::new(),
            }),
        }
    }

    pub async fn post_id(&self) -> String {
        self.state.read().await.tree.post_id().to_string()
    }

    /// Flattened render order of everything currently visible.
    pub async fn visible(&self) -> Vec<VisibleComment> {
        self.state.read().await.tree.visible()
    }

    pub async fn get(&self, id: CommentId) -> Option<CommentNode> {
        self.state.read().await.tree.get(id).cloned()
    }

    pub async fn reply_state(&self, id: CommentId) -> Option<ReplyState> {
        self.state.read().await.tree.reply_state(id)
    }

    pub async fn total_count(&self) -> u64 {
        self.state.read().await.tree.total_count()
    }

    pub async fn has_more_comments(&self) -> bool {
        self.state.read().await.tree.next_root_page().is_some()
    }

    /// Loads (or reloads) the first page of top-level comments.
    pub async fn load(&self) -> CommentResult<()> {
        self.fetch_roots(1, true).await
    }

    /// Appends the next page of top-level comments, if any.
    pub async fn load_more_comments(&self) -> CommentResult<()> {
        let next = self.state.read().await.tree.next_root_page();
        match next {
            Some(page) if page > 1 => self.fetch_roots(page, false).await,
            _ => Ok(()),
        }
    }

    async fn fetch_roots(&self, page: u32, reset: bool) -> CommentResult<()> {
        let (post_id, ticket) = {
            let mut state = self.state.write().await;
            let post_id = state.tree.post_id().to_string();
            let ticket = state.sequencer.issue(Slot::Comments(post_id.clone()));
            (post_id, ticket)
        };

        let result = self
            .repository
            .list_comments(&post_id, page, self.page_size)
            .await;

        let mut state = self.state.write().await;
        if !state.sequencer.complete(&ticket) {
            return Ok(());
        }
        let fetched = result?;
        tracing::debug!(
            "[CommentThread] page {} of post {}: {} comments",
            page,
            post_id,
            fetched.items.len()
        );
        if reset {
            state.tree.reset_roots(fetched);
        } else {
            state.tree.append_roots(fetched);
        }
        Ok(())
    }

    /// Expands a comment's replies, fetching the first page unless cached.
    pub async fn expand(&self, id: CommentId) -> CommentResult<()> {
        let ticket = {
            let mut state = self.state.write().await;
            match state.tree.begin_expand(id)? {
                ExpandAction::Expanded | ExpandAction::Nothing => return Ok(()),
                ExpandAction::Fetch { .. } => state.sequencer.issue(Slot::Replies(id)),
            }
        };

        let result = self.repository.list_replies(id, 1, self.page_size).await;

        let mut state = self.state.write().await;
        if !state.sequencer.complete(&ticket) {
            return Ok(());
        }
        match result {
            Ok(page) => state.tree.finish_expand(id, page),
            Err(e) => {
                state.tree.abort_expand(id);
                tracing::warn!("[CommentThread] loading replies of {} failed: {}", id, e);
                Err(e.into())
            }
        }
    }

    pub async fn collapse(&self, id: CommentId) -> CommentResult<()> {
        self.state.write().await.tree.collapse(id)
    }

    /// Appends the next page of replies under an expanded comment.
    pub async fn load_more_replies(&self, id: CommentId) -> CommentResult<()> {
        let (page, ticket) = {
            let mut state = self.state.write().await;
            if !state.tree.replies_loaded(id) {
                return Err(CommentError::RepliesNotLoaded(id));
            }
            let Some(page) = state.tree.next_reply_page(id) else {
                return Ok(());
            };
            (page, state.sequencer.issue(Slot::Replies(id)))
        };

        let result = self.repository.list_replies(id, page, self.page_size).await;

        let mut state = self.state.write().await;
        if !state.sequencer.complete(&ticket) {
            return Ok(());
        }
        state.tree.append_replies(id, result?)
    }

    /// Toggles the user's reaction and swaps in the server's version of the
    /// node. Nothing else in the tree changes.
    ///
    /// Returns `None` when a newer toggle on the same comment superseded this
    /// one before it completed.
    pub async fn toggle_reaction(
        &self,
        id: CommentId,
        kind: ReactionKind,
    ) -> CommentResult<Option<CommentNode>> {
        let ticket = {
            let mut state = self.state.write().await;
            if state.tree.get(id).is_none() {
                return Err(CommentError::UnknownNode(id));
            }
            state.sequencer.issue(Slot::Reaction(id))
        };

        let result = self.repository.toggle_reaction(id, kind).await;

        let mut state = self.state.write().await;
        if !state.sequencer.complete(&ticket) {
            return Ok(None);
        }
        let node = result?;
        state.tree.replace_node(node.clone())?;
        tracing::debug!(
            "[CommentThread] {} {} -> likes={} dislikes={}",
            kind,
            id,
            node.like_count,
            node.dislike_count
        );
        Ok(Some(node))
    }

    /// Posts a top-level comment and prepends it.
    pub async fn post_comment(&self, content: &str) -> CommentResult<CommentNode> {
        let content = content.trim();
        if content.is_empty() {
            return Err(CommentError::EmptyContent);
        }
        let post_id = self.post_id().await;
        let node = self.repository.create_comment(&post_id, content).await?;
        self.state.write().await.tree.prepend_root(node.clone());
        tracing::info!("[CommentThread] comment {} posted on {}", node.id, post_id);
        Ok(node)
    }

    /// Replies to `target`.
    ///
    /// A target at the depth cap receives the reply on its nearest ancestor
    /// below the cap. The parent's replies are loaded first so the new reply
    /// lands after the existing ones.
    pub async fn reply(&self, target: CommentId, content: &str) -> CommentResult<CommentNode> {
        let content = content.trim();
        if content.is_empty() {
            return Err(CommentError::EmptyContent);
        }
        let parent = self.state.read().await.tree.reply_parent_for(target)?;
        self.ensure_replies_loaded(parent).await?;

        let node = self.repository.create_reply(parent, content).await?;
        self.state
            .write()
            .await
            .tree
            .append_reply(parent, node.clone())?;
        tracing::info!("[CommentThread] reply {} posted under {}", node.id, parent);
        Ok(node)
    }

    async fn ensure_replies_loaded(&self, parent: CommentId) -> CommentResult<()> {
        {
            let mut state = self.state.write().await;
            if state.tree.replies_loaded(parent) {
                return Ok(());
            }
            if state.tree.get(parent).is_some_and(|n| n.reply_count == 0) {
                return state.tree.finish_expand(parent, ReplyPage::default());
            }
        }
        self.expand(parent).await?;
        if self.state.read().await.tree.replies_loaded(parent) {
            Ok(())
        } else {
            // a concurrent expand superseded ours and has not landed yet
            Err(CommentError::RepliesNotLoaded(parent))
        }
    }

    /// Deletes a comment and its loaded replies.
    pub async fn delete_comment(&self, id: CommentId) -> CommentResult<()> {
        if self.get(id).await.is_none() {
            return Err(CommentError::UnknownNode(id));
        }
        self.repository.delete(id).await?;
        self.state.write().await.tree.remove(id)?;
        tracing::info!("[CommentThread] comment {} deleted", id);
        Ok(())
    }
}

#[cfg(test)]
#[path = "comment_thread_service_test.rs"]
mod tests;
