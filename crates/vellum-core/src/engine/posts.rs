//! The authoritative published-content collection. Every in-place mutation
//! of an existing post snapshots the pre-mutation state into the history
//! log and bumps `version` by one.

use std::sync::Arc;

use crate::domain::{ContentBody, ContentPatch, PostId, PostRecord};
use crate::engine::EngineInner;
use crate::engine::history::{self, HistoryMap};
use crate::error::EngineError;
use crate::ports::Collection;

pub(crate) type Posts = Vec<PostRecord>;

pub struct PostRepository {
    inner: Arc<EngineInner>,
}

impl PostRepository {
    pub(crate) fn new(inner: Arc<EngineInner>) -> Self {
        Self { inner }
    }

    /// All published records, most recent insert first.
    pub async fn list(&self) -> Result<Vec<PostRecord>, EngineError> {
        let _guard = self.inner.lock(Collection::Posts).await;
        self.inner.load(Collection::Posts).await
    }

    /// Absence is routine; it is `Ok(None)`, not an error.
    pub async fn get_by_id(&self, id: PostId) -> Result<Option<PostRecord>, EngineError> {
        let posts = self.list().await?;
        Ok(posts.into_iter().find(|post| post.id == id))
    }

    /// Publish new content directly, bypassing the draft stage (the
    /// "publish immediately" editor action). Version 1, zeroed counters,
    /// no history entry - there is no prior state to snapshot.
    pub async fn create(&self, body: ContentBody) -> Result<PostRecord, EngineError> {
        self.inner.check_mutate()?;
        let _guard = self.inner.lock(Collection::Posts).await;

        let mut posts: Posts = self.inner.load(Collection::Posts).await?;
        let record = PostRecord::published(PostId::new(), body, self.inner.now());
        posts.insert(0, record.clone());
        self.inner.save(Collection::Posts, &posts).await?;

        tracing::info!(post_id = %record.id, "post created");
        Ok(record)
    }

    /// Patch an existing post. The pre-patch record is snapshotted into the
    /// history log within the same batch write, so history always reflects
    /// the state immediately before each overwrite.
    pub async fn update(&self, id: PostId, patch: ContentPatch) -> Result<PostRecord, EngineError> {
        self.inner.check_mutate()?;
        let _posts_guard = self.inner.lock(Collection::Posts).await;
        let _history_guard = self.inner.lock(Collection::History).await;

        let mut posts: Posts = self.inner.load(Collection::Posts).await?;
        let position = posts
            .iter()
            .position(|post| post.id == id)
            .ok_or(EngineError::NotFound {
                entity: "post",
                id: id.as_uuid(),
            })?;

        let now = self.inner.now();
        let before = posts[position].clone();

        let record = &mut posts[position];
        record.body.apply(patch)?;
        record.updated_at = now;
        record.version += 1;
        let updated = record.clone();

        let mut log: HistoryMap = self.inner.load(Collection::History).await?;
        history::push_snapshot(&mut log, before, now);

        self.inner
            .save_batch(vec![
                (Collection::Posts, self.inner.encode(Collection::Posts, &posts)?),
                (
                    Collection::History,
                    self.inner.encode(Collection::History, &log)?,
                ),
            ])
            .await?;

        tracing::debug!(post_id = %id, version = updated.version, "post updated");
        Ok(updated)
    }

    /// Remove a post. History and comments for the id are left in place
    /// (audit trail preserved; see `HistoryLog::clear` for explicit
    /// cleanup). Deleting an absent id is a no-op.
    pub async fn delete(&self, id: PostId) -> Result<(), EngineError> {
        self.inner.check_delete()?;
        let _guard = self.inner.lock(Collection::Posts).await;

        let mut posts: Posts = self.inner.load(Collection::Posts).await?;
        let before = posts.len();
        posts.retain(|post| post.id != id);
        if posts.len() != before {
            self.inner.save(Collection::Posts, &posts).await?;
            tracing::info!(post_id = %id, "post deleted");
        }
        Ok(())
    }

    /// Bump the view counter. Every call increments - deliberately not
    /// idempotent. No-op for an absent id.
    pub async fn increment_views(&self, id: PostId) -> Result<(), EngineError> {
        let _guard = self.inner.lock(Collection::Posts).await;

        let mut posts: Posts = self.inner.load(Collection::Posts).await?;
        if let Some(post) = posts.iter_mut().find(|post| post.id == id) {
            post.views += 1;
            self.inner.save(Collection::Posts, &posts).await?;
        }
        Ok(())
    }
}

/// Mirror the like registry's count onto the denormalized `likes` field.
/// Operates on an already-loaded collection; the caller holds the posts
/// lock and persists the result.
pub(crate) fn mirror_like_count(posts: &mut Posts, id: PostId, count: u64) -> bool {
    match posts.iter_mut().find(|post| post.id == id) {
        Some(post) => {
            post.likes = count;
            true
        }
        None => false,
    }
}
