//! Arena of comments and their loaded replies.
//!
//! Nodes are keyed by id. Parent/child links are id lists, so replacing a node
//! never disturbs the structure below it, and traversal uses an explicit
//! stack instead of recursion.

use super::error::{CommentError, CommentResult};
use super::model::{CommentId, CommentNode, CommentPage, ReplyPage, ReplyState, VisibleComment};
use crate::config::DEFAULT_REPLY_DEPTH;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct Entry {
    node: CommentNode,
    depth: u8,
    children: Vec<CommentId>,
    replies_loaded: bool,
    next_page: Option<u32>,
    state: ReplyState,
}

/// What the caller has to do after asking to expand a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandAction {
    /// Replies were cached; the node is expanded now
    Expanded,
    /// Fetch this page and hand it to [`CommentTree::finish_expand`]
    Fetch { page: u32 },
    /// The node has no replies
    Nothing,
}

#[derive(Debug, Clone)]
pub struct CommentTree {
    post_id: String,
    max_depth: u8,
    entries: HashMap<CommentId, Entry>,
    roots: Vec<CommentId>,
    total_count: u64,
    next_root_page: Option<u32>,
}

impl CommentTree {
    pub fn new(post_id: impl Into<String>, max_depth: u8) -> Self {
        Self {
            post_id: post_id.into(),
            max_depth,
            entries: HashMap::new(),
            roots: Vec::new(),
            total_count: 0,
            next_root_page: Some(1),
        }
    }

    pub fn post_id(&self) -> &str {
        &self.post_id
    }

    pub fn max_depth(&self) -> u8 {
        self.max_depth
    }

    /// Comments and replies on the post, as last reported plus local changes.
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn next_root_page(&self) -> Option<u32> {
        self.next_root_page
    }

    pub fn roots(&self) -> &[CommentId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: CommentId) -> Option<&CommentNode> {
        self.entries.get(&id).map(|e| &e.node)
    }

    pub fn depth(&self, id: CommentId) -> Option<u8> {
        self.entries.get(&id).map(|e| e.depth)
    }

    pub fn reply_state(&self, id: CommentId) -> Option<ReplyState> {
        self.entries.get(&id).map(|e| e.state)
    }

    /// Loaded replies of `id`, in display order.
    pub fn children(&self, id: CommentId) -> &[CommentId] {
        self.entries
            .get(&id)
            .map(|e| e.children.as_slice())
            .unwrap_or_default()
    }

    pub fn replies_loaded(&self, id: CommentId) -> bool {
        self.entries.get(&id).is_some_and(|e| e.replies_loaded)
    }

    pub fn next_reply_page(&self, id: CommentId) -> Option<u32> {
        self.entries.get(&id).and_then(|e| e.next_page)
    }

    fn entry(&self, id: CommentId) -> CommentResult<&Entry> {
        self.entries.get(&id).ok_or(CommentError::UnknownNode(id))
    }

    fn entry_mut(&mut self, id: CommentId) -> CommentResult<&mut Entry> {
        self.entries.get_mut(&id).ok_or(CommentError::UnknownNode(id))
    }

    fn below_cap(&self, depth: u8) -> bool {
        depth < self.max_depth
    }

    /// Inserts `node` unless it is already present, in which case the stored
    /// node is refreshed. Returns whether it was new.
    fn insert_entry(&mut self, node: CommentNode, depth: u8) -> bool {
        match self.entries.get_mut(&node.id) {
            Some(existing) => {
                existing.node = node;
                false
            }
            None => {
                self.entries.insert(
                    node.id,
                    Entry {
                        node,
                        depth,
                        children: Vec::new(),
                        replies_loaded: false,
                        next_page: None,
                        state: ReplyState::Collapsed,
                    },
                );
                true
            }
        }
    }

    /// Replaces every top-level comment with the first page.
    pub fn reset_roots(&mut self, page: CommentPage) {
        self.entries.clear();
        self.roots.clear();
        self.next_root_page = Some(1);
        self.append_roots(page);
    }

    /// Appends a further page of top-level comments.
    pub fn append_roots(&mut self, page: CommentPage) {
        for node in page.items {
            let id = node.id;
            if self.insert_entry(node, 0) {
                self.roots.push(id);
            }
        }
        self.total_count = page.total_count;
        self.next_root_page = page.next_page;
    }

    pub fn can_expand(&self, id: CommentId) -> bool {
        self.entries
            .get(&id)
            .is_some_and(|e| self.below_cap(e.depth) && e.node.reply_count > 0)
    }

    /// Starts expanding `id`.
    ///
    /// Cached replies expand immediately. Otherwise the node moves to
    /// `Loading` and the caller fetches the first page.
    pub fn begin_expand(&mut self, id: CommentId) -> CommentResult<ExpandAction> {
        let max_depth = self.max_depth;
        let entry = self.entry_mut(id)?;
        if entry.depth >= max_depth {
            return Err(CommentError::DepthCapReached { id, max_depth });
        }
        if entry.replies_loaded {
            entry.state = ReplyState::Expanded;
            return Ok(ExpandAction::Expanded);
        }
        if entry.node.reply_count == 0 {
            return Ok(ExpandAction::Nothing);
        }
        entry.state = ReplyState::Loading;
        Ok(ExpandAction::Fetch { page: 1 })
    }

    /// Stores the first reply page and expands the node.
    pub fn finish_expand(&mut self, id: CommentId, page: ReplyPage) -> CommentResult<()> {
        {
            let entry = self.entry_mut(id)?;
            entry.children.clear();
            entry.replies_loaded = true;
            entry.state = ReplyState::Expanded;
        }
        self.attach_replies(id, page)
    }

    /// Returns a node stuck in `Loading` to `Collapsed` after a failed fetch.
    pub fn abort_expand(&mut self, id: CommentId) {
        if let Some(entry) = self.entries.get_mut(&id) {
            if entry.state == ReplyState::Loading {
                entry.state = ReplyState::Collapsed;
            }
        }
    }

    pub fn collapse(&mut self, id: CommentId) -> CommentResult<()> {
        self.entry_mut(id)?.state = ReplyState::Collapsed;
        Ok(())
    }

    /// Appends a further page of replies under an expanded node.
    pub fn append_replies(&mut self, id: CommentId, page: ReplyPage) -> CommentResult<()> {
        if !self.entry(id)?.replies_loaded {
            return Err(CommentError::RepliesNotLoaded(id));
        }
        self.attach_replies(id, page)
    }

    fn attach_replies(&mut self, id: CommentId, page: ReplyPage) -> CommentResult<()> {
        let depth = self.entry(id)?.depth + 1;
        let mut ids = Vec::with_capacity(page.items.len());
        for node in page.items {
            ids.push(node.id);
            self.insert_entry(node, depth);
        }
        let entry = self.entry_mut(id)?;
        for child in ids {
            if !entry.children.contains(&child) {
                entry.children.push(child);
            }
        }
        entry.next_page = page.next_page;
        Ok(())
    }

    /// Swaps in the authoritative version of a node (e.g. after a reaction).
    ///
    /// Only the node's own data changes; its position, depth, loaded replies
    /// and expansion state are kept.
    pub fn replace_node(&mut self, node: CommentNode) -> CommentResult<()> {
        let entry = self.entry_mut(node.id)?;
        entry.node = node;
        Ok(())
    }

    /// The node a reply to `target` attaches to: `target` itself, or its
    /// nearest ancestor below the depth cap.
    pub fn reply_parent_for(&self, target: CommentId) -> CommentResult<CommentId> {
        let mut current = target;
        loop {
            let entry = self.entry(current)?;
            if self.below_cap(entry.depth) {
                return Ok(current);
            }
            current = entry
                .node
                .parent_id
                .ok_or(CommentError::DepthCapReached {
                    id: current,
                    max_depth: self.max_depth,
                })?;
        }
    }

    /// Prepends a freshly posted top-level comment.
    pub fn prepend_root(&mut self, node: CommentNode) {
        let id = node.id;
        if self.insert_entry(node, 0) {
            self.roots.insert(0, id);
            self.total_count += 1;
        }
    }

    /// Appends a freshly posted reply under `parent`, expands the parent and
    /// bumps its reply count and the global count.
    ///
    /// The parent's replies must already be loaded so the new reply is not
    /// shown twice once they are fetched.
    pub fn append_reply(&mut self, parent: CommentId, node: CommentNode) -> CommentResult<()> {
        let max_depth = self.max_depth;
        let parent_entry = self.entry(parent)?;
        if parent_entry.depth >= max_depth {
            return Err(CommentError::DepthCapReached {
                id: parent,
                max_depth,
            });
        }
        if !parent_entry.replies_loaded {
            return Err(CommentError::RepliesNotLoaded(parent));
        }
        let depth = parent_entry.depth + 1;
        let id = node.id;
        let is_new = self.insert_entry(node, depth);

        let entry = self.entry_mut(parent)?;
        entry.state = ReplyState::Expanded;
        if is_new {
            entry.children.push(id);
            entry.node.reply_count += 1;
            self.total_count += 1;
        }
        Ok(())
    }

    /// Removes a node with all of its loaded replies.
    ///
    /// The parent's reply count drops by one. The global count drops by the
    /// node itself plus every reply the removed nodes reported, loaded or not.
    pub fn remove(&mut self, id: CommentId) -> CommentResult<()> {
        let parent = self.entry(id)?.node.parent_id;

        let mut removed: u64 = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(entry) = self.entries.remove(&current) {
                removed += 1;
                let unloaded = u64::from(entry.node.reply_count)
                    .saturating_sub(entry.children.len() as u64);
                removed += unloaded;
                stack.extend(entry.children);
            }
        }
        self.total_count = self.total_count.saturating_sub(removed);

        match parent.and_then(|p| self.entries.get_mut(&p)) {
            Some(parent_entry) => {
                parent_entry.children.retain(|c| *c != id);
                parent_entry.node.reply_count = parent_entry.node.reply_count.saturating_sub(1);
            }
            None => self.roots.retain(|r| *r != id),
        }
        Ok(())
    }

    /// Flattened render order: each node followed by the replies of expanded
    /// nodes, depth first.
    pub fn visible(&self) -> Vec<VisibleComment> {
        let mut out = Vec::with_capacity(self.entries.len());
        let mut stack: Vec<CommentId> = self.roots.iter().rev().copied().collect();

        while let Some(id) = stack.pop() {
            let Some(entry) = self.entries.get(&id) else {
                continue;
            };
            out.push(VisibleComment {
                id,
                depth: entry.depth,
                reply_state: entry.state,
                can_expand: self.below_cap(entry.depth) && entry.node.reply_count > 0,
                has_more_replies: entry.next_page.is_some(),
            });
            if entry.state == ReplyState::Expanded {
                stack.extend(entry.children.iter().rev().copied());
            }
        }
        out
    }
}

impl Default for CommentTree {
    fn default() -> Self {
        Self::new(String::new(), DEFAULT_REPLY_DEPTH)
    }
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tests;
