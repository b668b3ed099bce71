use super::*;
use alumni_core::comment::{CommentAuthor, CommentPage};
use alumni_core::error::{AlumniError, Result, TransportError};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use tokio::sync::Notify;

fn node(id: i64, parent: Option<i64>, reply_count: u32) -> CommentNode {
    CommentNode {
        id: CommentId(id),
        parent_id: parent.map(CommentId),
        author: CommentAuthor {
            id: 1,
            name: "Alumni".into(),
            avatar: None,
        },
        content: format!("comment {id}"),
        created_at: Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap(),
        like_count: 0,
        dislike_count: 0,
        user_reaction: None,
        reply_count,
    }
}

/// Post with comments 1 and 2. Comment 1 has replies 3 and 4; 4 has reply 5.
struct MockComments {
    roots: Vec<CommentNode>,
    replies: HashMap<CommentId, Vec<CommentNode>>,
    next_id: Mutex<i64>,
    reactions: Mutex<VecDeque<CommentNode>>,
    reaction_gate: Mutex<Option<(Arc<Notify>, Arc<Notify>)>>,
    fail_replies: Mutex<bool>,
    comment_calls: Mutex<Vec<(u32, u32)>>,
    reply_calls: Mutex<Vec<(CommentId, u32)>>,
    created: Mutex<Vec<(Option<CommentId>, String)>>,
    deleted: Mutex<Vec<CommentId>>,
}

impl MockComments {
    fn new() -> Self {
        let mut replies = HashMap::new();
        replies.insert(
            CommentId(1),
            vec![node(3, Some(1), 0), node(4, Some(1), 1)],
        );
        replies.insert(CommentId(4), vec![node(5, Some(4), 0)]);
        Self {
            roots: vec![node(1, None, 2), node(2, None, 0)],
            replies,
            next_id: Mutex::new(100),
            reactions: Mutex::new(VecDeque::new()),
            reaction_gate: Mutex::new(None),
            fail_replies: Mutex::new(false),
            comment_calls: Mutex::new(Vec::new()),
            reply_calls: Mutex::new(Vec::new()),
            created: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
        }
    }

    fn queue_reaction(&self, node: CommentNode) {
        self.reactions.lock().unwrap().push_back(node);
    }

    fn next_id(&self) -> i64 {
        let mut id = self.next_id.lock().unwrap();
        *id += 1;
        *id
    }
}

#[async_trait]
impl CommentRepository for MockComments {
    async fn list_comments(
        &self,
        _post_id: &str,
        page: u32,
        page_size: u32,
    ) -> Result<CommentPage> {
        self.comment_calls.lock().unwrap().push((page, page_size));
        Ok(CommentPage {
            items: self.roots.clone(),
            next_page: None,
            total_count: 5,
        })
    }

    async fn list_replies(
        &self,
        parent: CommentId,
        page: u32,
        page_size: u32,
    ) -> Result<ReplyPage> {
        self.reply_calls.lock().unwrap().push((parent, page));
        if *self.fail_replies.lock().unwrap() {
            return Err(TransportError::new(Some(503), None).into());
        }
        let all = self.replies.get(&parent).cloned().unwrap_or_default();
        let page_size = page_size as usize;
        let start = (page as usize - 1) * page_size;
        let items: Vec<_> = all.iter().skip(start).take(page_size).cloned().collect();
        let next_page = (start + page_size < all.len()).then_some(page + 1);
        Ok(ReplyPage { items, next_page })
    }

    async fn create_comment(&self, _post_id: &str, content: &str) -> Result<CommentNode> {
        self.created
            .lock()
            .unwrap()
            .push((None, content.to_string()));
        let mut n = node(self.next_id(), None, 0);
        n.content = content.to_string();
        Ok(n)
    }

    async fn create_reply(&self, parent: CommentId, content: &str) -> Result<CommentNode> {
        self.created
            .lock()
            .unwrap()
            .push((Some(parent), content.to_string()));
        let mut n = node(self.next_id(), Some(parent.0), 0);
        n.content = content.to_string();
        Ok(n)
    }

    async fn toggle_reaction(&self, id: CommentId, _kind: ReactionKind) -> Result<CommentNode> {
        let response = self
            .reactions
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AlumniError::not_found("Comment", id.to_string()))?;
        let gate = self.reaction_gate.lock().unwrap().take();
        if let Some((entered, release)) = gate {
            entered.notify_one();
            release.notified().await;
        }
        Ok(response)
    }

    async fn delete(&self, id: CommentId) -> Result<()> {
        self.deleted.lock().unwrap().push(id);
        Ok(())
    }
}

async fn loaded(repo: Arc<MockComments>) -> CommentThreadService {
    loaded_with(repo, &CommentSettings::default()).await
}

async fn loaded_with(repo: Arc<MockComments>, settings: &CommentSettings) -> CommentThreadService {
    let service = CommentThreadService::new(repo, "post-9", settings);
    service.load().await.unwrap();
    service
}

async fn ids(service: &CommentThreadService) -> Vec<i64> {
    service.visible().await.iter().map(|v| v.id.0).collect()
}

#[tokio::test]
async fn like_on_comment_five_updates_only_that_node() {
    let repo = Arc::new(MockComments::new());
    let service = loaded(repo.clone()).await;
    service.expand(CommentId(1)).await.unwrap();
    service.expand(CommentId(4)).await.unwrap();
    assert_eq!(ids(&service).await, vec![1, 3, 4, 5, 2]);

    let mut before = Vec::new();
    for id in [1, 2, 3, 4] {
        before.push(service.get(CommentId(id)).await);
    }

    let mut liked = node(5, Some(4), 0);
    liked.like_count = 1;
    liked.user_reaction = Some(ReactionKind::Like);
    repo.queue_reaction(liked.clone());

    let applied = service
        .toggle_reaction(CommentId(5), ReactionKind::Like)
        .await
        .unwrap();
    assert_eq!(applied, Some(liked.clone()));
    assert_eq!(service.get(CommentId(5)).await, Some(liked));

    for (id, prior) in [1, 2, 3, 4].into_iter().zip(before) {
        assert_eq!(service.get(CommentId(id)).await, prior);
    }
    assert_eq!(ids(&service).await, vec![1, 3, 4, 5, 2]);
    assert_eq!(service.total_count().await, 5);
}

#[tokio::test]
async fn stale_reaction_response_is_discarded() {
    let repo = Arc::new(MockComments::new());
    let service = Arc::new(loaded(repo.clone()).await);

    let mut liked = node(2, None, 0);
    liked.like_count = 1;
    liked.user_reaction = Some(ReactionKind::Like);
    let unliked = node(2, None, 0);
    repo.queue_reaction(liked);
    repo.queue_reaction(unliked.clone());

    let entered = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    *repo.reaction_gate.lock().unwrap() = Some((entered.clone(), release.clone()));

    let first = {
        let service = service.clone();
        tokio::spawn(async move {
            service
                .toggle_reaction(CommentId(2), ReactionKind::Like)
                .await
        })
    };
    entered.notified().await;

    let second = service
        .toggle_reaction(CommentId(2), ReactionKind::Like)
        .await
        .unwrap();
    assert_eq!(second, Some(unliked.clone()));

    release.notify_one();
    let first = first.await.unwrap().unwrap();
    assert_eq!(first, None);
    assert_eq!(service.get(CommentId(2)).await, Some(unliked));
}

#[tokio::test]
async fn cached_replies_expand_without_refetch() {
    let repo = Arc::new(MockComments::new());
    let service = loaded(repo.clone()).await;
    service.expand(CommentId(1)).await.unwrap();
    service.collapse(CommentId(1)).await.unwrap();
    service.expand(CommentId(1)).await.unwrap();

    assert_eq!(repo.reply_calls.lock().unwrap().len(), 1);
    assert_eq!(
        service.reply_state(CommentId(1)).await,
        Some(ReplyState::Expanded)
    );
}

#[tokio::test]
async fn failed_reply_fetch_collapses_again() {
    let repo = Arc::new(MockComments::new());
    let service = loaded(repo.clone()).await;
    *repo.fail_replies.lock().unwrap() = true;

    let err = service.expand(CommentId(1)).await.unwrap_err();
    assert_eq!(err.user_message(), "Failed to save data. Please try again.");
    assert_eq!(
        service.reply_state(CommentId(1)).await,
        Some(ReplyState::Collapsed)
    );
}

#[tokio::test]
async fn replies_load_page_by_page() {
    let repo = Arc::new(MockComments::new());
    let settings = CommentSettings {
        page_size: 1,
        ..CommentSettings::default()
    };
    let service = loaded_with(repo.clone(), &settings).await;
    assert_eq!(*repo.comment_calls.lock().unwrap(), vec![(1, 1)]);
    service.expand(CommentId(1)).await.unwrap();
    assert_eq!(ids(&service).await, vec![1, 3, 2]);

    service.load_more_replies(CommentId(1)).await.unwrap();
    assert_eq!(ids(&service).await, vec![1, 3, 4, 2]);
    service.load_more_replies(CommentId(1)).await.unwrap();
    assert_eq!(
        *repo.reply_calls.lock().unwrap(),
        vec![(CommentId(1), 1), (CommentId(1), 2)]
    );
}

#[tokio::test]
async fn configured_page_size_reaches_repository() {
    let repo = Arc::new(MockComments::new());
    let settings = CommentSettings {
        page_size: 25,
        ..CommentSettings::default()
    };
    let service = loaded_with(repo.clone(), &settings).await;
    service.expand(CommentId(1)).await.unwrap();

    assert_eq!(*repo.comment_calls.lock().unwrap(), vec![(1, 25)]);
    assert_eq!(*repo.reply_calls.lock().unwrap(), vec![(CommentId(1), 1)]);
    assert_eq!(ids(&service).await, vec![1, 3, 4, 2]);
}

#[tokio::test]
async fn reply_to_unloaded_parent_fetches_first() {
    let repo = Arc::new(MockComments::new());
    let service = loaded(repo.clone()).await;

    let reply = service.reply(CommentId(1), "  Selamat!  ").await.unwrap();
    assert_eq!(reply.content, "Selamat!");
    assert_eq!(ids(&service).await, vec![1, 3, 4, reply.id.0, 2]);
    assert_eq!(service.get(CommentId(1)).await.unwrap().reply_count, 3);
    assert_eq!(service.total_count().await, 6);
}

#[tokio::test]
async fn reply_to_node_without_replies_needs_no_fetch() {
    let repo = Arc::new(MockComments::new());
    let service = loaded(repo.clone()).await;

    let reply = service.reply(CommentId(2), "Setuju").await.unwrap();
    assert!(repo.reply_calls.lock().unwrap().is_empty());
    assert_eq!(ids(&service).await, vec![1, 2, reply.id.0]);
    assert_eq!(service.get(CommentId(2)).await.unwrap().reply_count, 1);
}

#[tokio::test]
async fn reply_at_depth_cap_attaches_to_ancestor() {
    let repo = Arc::new(MockComments::new());
    let service = loaded(repo.clone()).await;
    service.expand(CommentId(1)).await.unwrap();
    service.expand(CommentId(4)).await.unwrap();

    let reply = service.reply(CommentId(5), "Betul").await.unwrap();
    assert_eq!(reply.parent_id, Some(CommentId(4)));
    assert_eq!(
        repo.created.lock().unwrap().last().cloned(),
        Some((Some(CommentId(4)), "Betul".to_string()))
    );
    assert_eq!(ids(&service).await, vec![1, 3, 4, 5, reply.id.0, 2]);
    assert_eq!(service.get(CommentId(4)).await.unwrap().reply_count, 2);
}

#[tokio::test]
async fn new_comment_is_prepended_and_blank_rejected() {
    let repo = Arc::new(MockComments::new());
    let service = loaded(repo.clone()).await;

    assert_eq!(
        service.post_comment("   ").await.unwrap_err(),
        CommentError::EmptyContent
    );
    let posted = service.post_comment("Sampai jumpa di reuni").await.unwrap();
    assert_eq!(ids(&service).await, vec![posted.id.0, 1, 2]);
    assert_eq!(service.total_count().await, 6);
}

#[tokio::test]
async fn delete_removes_subtree() {
    let repo = Arc::new(MockComments::new());
    let service = loaded(repo.clone()).await;
    service.expand(CommentId(1)).await.unwrap();
    service.expand(CommentId(4)).await.unwrap();

    service.delete_comment(CommentId(4)).await.unwrap();
    assert_eq!(ids(&service).await, vec![1, 3, 2]);
    assert_eq!(*repo.deleted.lock().unwrap(), vec![CommentId(4)]);
    assert_eq!(service.get(CommentId(1)).await.unwrap().reply_count, 1);

    assert_eq!(
        service.delete_comment(CommentId(4)).await.unwrap_err(),
        CommentError::UnknownNode(CommentId(4))
    );
}
