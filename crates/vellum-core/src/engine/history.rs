//! Per-post capped snapshot log, newest first.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{
    HISTORY_CAPACITY, HistoryDiff, HistoryEntry, HistoryId, PostId, PostRecord, VersionView,
};
use crate::engine::EngineInner;
use crate::engine::posts::Posts;
use crate::error::EngineError;
use crate::ports::Collection;

pub(crate) type HistoryMap = HashMap<PostId, Vec<HistoryEntry>>;

/// Prepend a snapshot and evict beyond capacity. Pure FIFO-by-recency, no
/// importance weighting.
pub(crate) fn push_snapshot(log: &mut HistoryMap, snapshot: PostRecord, now: DateTime<Utc>) {
    let entries = log.entry(snapshot.id).or_default();
    entries.insert(
        0,
        HistoryEntry {
            history_id: HistoryId::new(),
            saved_at: now,
            snapshot,
        },
    );
    entries.truncate(HISTORY_CAPACITY);
}

pub struct HistoryLog {
    inner: Arc<EngineInner>,
}

impl HistoryLog {
    pub(crate) fn new(inner: Arc<EngineInner>) -> Self {
        Self { inner }
    }

    /// Snapshots for one post, newest first. Empty when none exist.
    pub async fn list(&self, post_id: PostId) -> Result<Vec<HistoryEntry>, EngineError> {
        let _guard = self.inner.lock(Collection::History).await;
        let mut log: HistoryMap = self.inner.load(Collection::History).await?;
        Ok(log.remove(&post_id).unwrap_or_default())
    }

    /// Overwrite the post's authored fields from a historical snapshot.
    ///
    /// The pre-restore state is snapshotted first, so it is itself
    /// recoverable. `created_at`, `views` and `likes` are not reverted;
    /// `version` keeps climbing and `restored_from` records the source
    /// snapshot for audit.
    pub async fn restore(
        &self,
        post_id: PostId,
        history_id: HistoryId,
    ) -> Result<PostRecord, EngineError> {
        self.inner.check_mutate()?;
        let _posts_guard = self.inner.lock(Collection::Posts).await;
        let _history_guard = self.inner.lock(Collection::History).await;

        let mut log: HistoryMap = self.inner.load(Collection::History).await?;
        let restored_body = log
            .get(&post_id)
            .and_then(|entries| entries.iter().find(|entry| entry.history_id == history_id))
            .map(|entry| entry.snapshot.body.clone())
            .ok_or(EngineError::NotFound {
                entity: "history entry",
                id: history_id.as_uuid(),
            })?;

        let mut posts: Posts = self.inner.load(Collection::Posts).await?;
        let position = posts
            .iter()
            .position(|post| post.id == post_id)
            .ok_or(EngineError::NotFound {
                entity: "post",
                id: post_id.as_uuid(),
            })?;

        let now = self.inner.now();
        push_snapshot(&mut log, posts[position].clone(), now);

        let record = &mut posts[position];
        record.body = restored_body;
        record.updated_at = now;
        record.version += 1;
        record.restored_from = Some(history_id);
        let restored = record.clone();

        self.inner
            .save_batch(vec![
                (Collection::Posts, self.inner.encode(Collection::Posts, &posts)?),
                (
                    Collection::History,
                    self.inner.encode(Collection::History, &log)?,
                ),
            ])
            .await?;

        tracing::info!(
            post_id = %post_id,
            history_id = %history_id,
            version = restored.version,
            "post restored from history"
        );
        Ok(restored)
    }

    /// Drop all history for a post. Never invoked implicitly - deleting a
    /// post leaves its history in place until a caller opts in here.
    pub async fn clear(&self, post_id: PostId) -> Result<(), EngineError> {
        self.inner.check_delete()?;
        let _guard = self.inner.lock(Collection::History).await;

        let mut log: HistoryMap = self.inner.load(Collection::History).await?;
        if log.remove(&post_id).is_some() {
            self.inner.save(Collection::History, &log).await?;
            tracing::info!(post_id = %post_id, "post history cleared");
        }
        Ok(())
    }

    /// Side-by-side view of the live post against one snapshot. `None` when
    /// either side is missing.
    pub async fn diff(
        &self,
        post_id: PostId,
        history_id: HistoryId,
    ) -> Result<Option<HistoryDiff>, EngineError> {
        let _posts_guard = self.inner.lock(Collection::Posts).await;
        let _history_guard = self.inner.lock(Collection::History).await;

        let posts: Posts = self.inner.load(Collection::Posts).await?;
        let Some(current) = posts.iter().find(|post| post.id == post_id) else {
            return Ok(None);
        };

        let log: HistoryMap = self.inner.load(Collection::History).await?;
        let entry = log
            .get(&post_id)
            .and_then(|entries| entries.iter().find(|entry| entry.history_id == history_id));
        let Some(entry) = entry else {
            return Ok(None);
        };

        Ok(Some(HistoryDiff {
            current: VersionView::of_current(current),
            historical: VersionView::of_entry(entry),
        }))
    }
}
