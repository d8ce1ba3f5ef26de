//! Content pending time-triggered publication, and the sweep that promotes
//! due entries.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{
    ContentBody, ContentPatch, DraftId, DraftRecord, PostId, PostRecord, ScheduledId,
    ScheduledRecord,
};
use crate::engine::EngineInner;
use crate::engine::drafts::Drafts;
use crate::engine::posts::Posts;
use crate::error::EngineError;
use crate::ports::Collection;

pub(crate) type ScheduledEntries = Vec<ScheduledRecord>;

pub struct ScheduledRepository {
    inner: Arc<EngineInner>,
}

impl ScheduledRepository {
    pub(crate) fn new(inner: Arc<EngineInner>) -> Self {
        Self { inner }
    }

    pub async fn list(&self) -> Result<Vec<ScheduledRecord>, EngineError> {
        let _guard = self.inner.lock(Collection::Scheduled).await;
        self.inner.load(Collection::Scheduled).await
    }

    pub async fn get_by_id(&self, id: ScheduledId) -> Result<Option<ScheduledRecord>, EngineError> {
        let entries = self.list().await?;
        Ok(entries.into_iter().find(|entry| entry.id == id))
    }

    /// Schedule content for future publication. The scheduled time must be
    /// strictly in the future - enforced here, regardless of caller.
    pub async fn create(
        &self,
        body: ContentBody,
        scheduled_time: DateTime<Utc>,
    ) -> Result<ScheduledRecord, EngineError> {
        self.inner.check_mutate()?;
        let _guard = self.inner.lock(Collection::Scheduled).await;

        let now = self.inner.now();
        validate_schedule(scheduled_time, now)?;

        let mut entries: ScheduledEntries = self.inner.load(Collection::Scheduled).await?;
        let record = ScheduledRecord::new(ScheduledId::new(), body, scheduled_time, now);
        entries.insert(0, record.clone());
        self.inner.save(Collection::Scheduled, &entries).await?;

        tracing::debug!(scheduled_id = %record.id, scheduled_time = %scheduled_time, "entry scheduled");
        Ok(record)
    }

    /// Patch an entry, optionally rescheduling it. A new scheduled time is
    /// validated against the clock just like creation.
    pub async fn update(
        &self,
        id: ScheduledId,
        patch: ContentPatch,
        scheduled_time: Option<DateTime<Utc>>,
    ) -> Result<ScheduledRecord, EngineError> {
        self.inner.check_mutate()?;
        let _guard = self.inner.lock(Collection::Scheduled).await;

        let now = self.inner.now();
        if let Some(time) = scheduled_time {
            validate_schedule(time, now)?;
        }

        let mut entries: ScheduledEntries = self.inner.load(Collection::Scheduled).await?;
        let record = entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or(EngineError::NotFound {
                entity: "scheduled entry",
                id: id.as_uuid(),
            })?;

        record.body.apply(patch)?;
        if let Some(time) = scheduled_time {
            record.scheduled_time = time;
        }
        record.updated_at = now;
        let updated = record.clone();
        self.inner.save(Collection::Scheduled, &entries).await?;
        Ok(updated)
    }

    /// Deleting an absent id is a no-op.
    pub async fn delete(&self, id: ScheduledId) -> Result<(), EngineError> {
        self.inner.check_delete()?;
        let _guard = self.inner.lock(Collection::Scheduled).await;

        let mut entries: ScheduledEntries = self.inner.load(Collection::Scheduled).await?;
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        if entries.len() != before {
            self.inner.save(Collection::Scheduled, &entries).await?;
        }
        Ok(())
    }

    /// Publish a scheduled entry immediately under a fresh post identity.
    /// `published_at` is now, regardless of the original scheduled time.
    pub async fn publish_now(&self, id: ScheduledId) -> Result<PostRecord, EngineError> {
        self.inner.check_mutate()?;
        let _posts_guard = self.inner.lock(Collection::Posts).await;
        let _scheduled_guard = self.inner.lock(Collection::Scheduled).await;

        let mut entries: ScheduledEntries = self.inner.load(Collection::Scheduled).await?;
        let position = entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or(EngineError::NotFound {
                entity: "scheduled entry",
                id: id.as_uuid(),
            })?;
        let entry = entries.remove(position);

        let mut posts: Posts = self.inner.load(Collection::Posts).await?;
        let post = PostRecord::published(PostId::new(), entry.body, self.inner.now());
        posts.insert(0, post.clone());

        self.inner
            .save_batch(vec![
                (Collection::Posts, self.inner.encode(Collection::Posts, &posts)?),
                (
                    Collection::Scheduled,
                    self.inner.encode(Collection::Scheduled, &entries)?,
                ),
            ])
            .await?;

        tracing::info!(scheduled_id = %id, post_id = %post.id, "scheduled entry published early");
        Ok(post)
    }

    /// Move a scheduled entry back to the drafts collection under a new
    /// draft id, dropping its scheduled time.
    pub async fn to_draft(&self, id: ScheduledId) -> Result<DraftRecord, EngineError> {
        self.inner.check_mutate()?;
        let _drafts_guard = self.inner.lock(Collection::Drafts).await;
        let _scheduled_guard = self.inner.lock(Collection::Scheduled).await;

        let mut entries: ScheduledEntries = self.inner.load(Collection::Scheduled).await?;
        let position = entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or(EngineError::NotFound {
                entity: "scheduled entry",
                id: id.as_uuid(),
            })?;
        let entry = entries.remove(position);

        let mut drafts: Drafts = self.inner.load(Collection::Drafts).await?;
        let draft = DraftRecord::new(DraftId::new(), entry.body, self.inner.now());
        drafts.insert(0, draft.clone());

        self.inner
            .save_batch(vec![
                (
                    Collection::Drafts,
                    self.inner.encode(Collection::Drafts, &drafts)?,
                ),
                (
                    Collection::Scheduled,
                    self.inner.encode(Collection::Scheduled, &entries)?,
                ),
            ])
            .await?;

        tracing::info!(scheduled_id = %id, draft_id = %draft.id, "scheduled entry moved to drafts");
        Ok(draft)
    }

    /// Publish every entry whose scheduled time has passed, exactly once.
    ///
    /// Due entries are removed from the scheduled collection in the same
    /// batch write that inserts the new posts, so repeated or backdated
    /// calls cannot double-publish. Overlapping invocations skip via a
    /// single-flight guard and report zero.
    pub async fn sweep(&self, now: DateTime<Utc>) -> Result<usize, EngineError> {
        let Some(_flight) = self.inner.try_sweep_flight() else {
            tracing::debug!("sweep already in flight, skipping");
            return Ok(0);
        };
        let _posts_guard = self.inner.lock(Collection::Posts).await;
        let _scheduled_guard = self.inner.lock(Collection::Scheduled).await;

        let entries: ScheduledEntries = self.inner.load(Collection::Scheduled).await?;
        let (due, remaining): (Vec<_>, Vec<_>) = entries
            .into_iter()
            .partition(|entry| entry.scheduled_time <= now);
        if due.is_empty() {
            return Ok(0);
        }

        let mut posts: Posts = self.inner.load(Collection::Posts).await?;
        let published = due.len();
        for entry in due {
            let post = PostRecord::published(PostId::new(), entry.body, now);
            tracing::info!(
                scheduled_id = %entry.id,
                post_id = %post.id,
                scheduled_time = %entry.scheduled_time,
                "due entry published"
            );
            posts.insert(0, post);
        }

        self.inner
            .save_batch(vec![
                (Collection::Posts, self.inner.encode(Collection::Posts, &posts)?),
                (
                    Collection::Scheduled,
                    self.inner.encode(Collection::Scheduled, &remaining)?,
                ),
            ])
            .await?;

        Ok(published)
    }
}

fn validate_schedule(scheduled: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), EngineError> {
    if scheduled <= now {
        return Err(EngineError::InvalidScheduleTime { scheduled, now });
    }
    Ok(())
}
